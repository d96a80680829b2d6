//! The GTFS feed: static schedule tables served as JSON.
//!
//! Rows come back as they are stored, every column as text. The
//! `stops`, `stop_times` and `trips` tables are large, and requests for
//! them must name a row with [`GtfsQuery::id`] or
//! [`GtfsQuery::column_and_value`].

mod client;
mod query;
pub mod types;

pub use query::{GtfsQuery, SortOrder};
pub use types::{
    Agency, CalendarDate, CalendarEntry, GtfsRoute, GtfsRow, GtfsTable, GtfsTrip, QueryEcho, Stop,
    StopTime,
};
