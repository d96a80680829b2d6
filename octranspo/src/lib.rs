//! Client for the OC Transpo developer API.
//!
//! Two feeds sit behind one [`Connection`]: the real-time SOAP feed of
//! upcoming trips at a stop ([`live`]) and the static GTFS schedule tables
//! served as JSON ([`gtfs`]). Every call passes the connection's
//! [`RateGate`] first, so a key's daily quota can be spread evenly.

pub mod connection;
pub mod domain;
pub mod error;
pub mod gtfs;
pub mod live;
pub mod rate;

pub use connection::{Connection, ConnectionConfig, DEFAULT_BASE_URL};
pub use error::{ConfigError, DecodeError, Error, FieldError, TransportError};
pub use live::ApiError;
pub use rate::{RateGate, RateLimit};
