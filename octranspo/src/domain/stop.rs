//! Per-stop results from the real-time feed.

use super::trip::{RouteDirection, Trip};

/// Routes serving a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummaryForStop {
    pub stop_no: String,
    pub stop_description: String,
    /// Informational text from the feed's error field.
    pub info: String,
    pub routes: Vec<Route>,
}

/// A route serving a stop, in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub route_no: String,
    pub direction_id: String,
    pub direction: String,
    pub route_heading: String,
}

/// Next trips for a single route at a stop.
#[derive(Debug, Clone, PartialEq)]
pub struct NextTripsForStop {
    pub stop_no: String,
    pub stop_label: String,
    pub info: String,
    pub route_directions: Vec<RouteDirection>,
}

/// Next trips for every route at a stop.
#[derive(Debug, Clone, PartialEq)]
pub struct NextTripsForStopAllRoutes {
    pub stop_no: String,
    pub stop_description: String,
    pub info: String,
    pub routes: Vec<RouteWithTrips>,
}

/// A route in one direction, with its next trips.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteWithTrips {
    pub route_no: String,
    pub direction_id: String,
    pub direction: String,
    pub route_heading: String,
    pub trips: Vec<Trip>,
}

impl NextTripsForStopAllRoutes {
    /// Total number of trips across all routes.
    pub fn trip_count(&self) -> usize {
        self.routes.iter().map(|r| r.trips.len()).sum()
    }
}

impl NextTripsForStop {
    /// Total number of trips across all route directions.
    pub fn trip_count(&self) -> usize {
        self.route_directions.iter().map(|r| r.trips.len()).sum()
    }
}
