//! OC Transpo live next bus arrival feed.
//!
//! The feed is SOAP over HTTP POST. Responses go through three stages:
//! - [`decode`] turns the body into the literal envelope in [`types`],
//!   whatever character set the server declared
//! - [`convert`] cooks the envelope into [`crate::domain`] values, running
//!   `Error` elements through [`interpret_error_field`]
//! - the query methods on [`Connection`](crate::Connection) tie both to the
//!   dispatcher
//!
//! Key characteristics of the feed:
//! - Every value is element text; empty elements mean "not reported"
//! - The `Error` element holds either a failure code or display text
//! - Timestamps are Ottawa local time with no offset

mod client;
pub mod convert;
pub mod decode;
mod error_code;
pub mod types;

pub use convert::CookError;
pub use error_code::{ApiError, interpret_error_field};
