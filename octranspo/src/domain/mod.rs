//! Caller-facing values produced from feed responses.
//!
//! Everything here is fully validated: a value of these types only exists if
//! every mandatory field parsed. Optional feed fields are `Option`s.

mod optional;
mod stop;
mod time;
mod trip;

pub use optional::{WireScalar, parse_optional, parse_required};
pub use stop::{
    NextTripsForStop, NextTripsForStopAllRoutes, Route, RouteSummaryForStop, RouteWithTrips,
};
pub use time::{AGENCY_TZ, parse_agency_timestamp};
pub use trip::{RouteDirection, Trip};
