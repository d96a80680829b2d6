//! Conversion from real-time wire shapes to domain values.
//!
//! Each `cook_*` function consumes a decoded envelope and either returns the
//! complete domain value or the first failure it meets. Nothing is skipped:
//! one bad trip fails the whole response.

use tracing::debug;

use crate::domain::{
    NextTripsForStop, NextTripsForStopAllRoutes, Route, RouteDirection, RouteSummaryForStop,
    RouteWithTrips, Trip, parse_agency_timestamp, parse_optional, parse_required,
};
use crate::error::{Error, FieldError};

use super::error_code::{ApiError, interpret_error_field};
use super::types::{
    RawNextTripsForStop, RawNextTripsForStopAllRoutes, RawRoute, RawRouteDirection,
    RawRouteSummaryForStop, RawRouteWithTrips, RawTrip, RawTrips,
};

/// Error while cooking a decoded response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CookError {
    /// An `Error` element held a failure code.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A field did not parse.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl From<CookError> for Error {
    fn from(err: CookError) -> Self {
        match err {
            CookError::Api(e) => Error::Api(e),
            CookError::Field(e) => Error::Field(e),
        }
    }
}

/// Cook a `GetRouteSummaryForStop` response.
pub fn cook_route_summary(raw: RawRouteSummaryForStop) -> Result<RouteSummaryForStop, CookError> {
    let result = raw.body.response.result;

    let info = interpret_error_field(result.error.text)?;
    let routes: Vec<Route> = result.routes.route.into_iter().map(cook_route).collect();

    debug!(stop_no = %result.stop_no.text, routes = routes.len(), "cooked route summary");

    Ok(RouteSummaryForStop {
        stop_no: result.stop_no.text,
        stop_description: result.stop_description.text,
        info,
        routes,
    })
}

/// Cook a `GetNextTripsForStop` response.
pub fn cook_next_trips(raw: RawNextTripsForStop) -> Result<NextTripsForStop, CookError> {
    let result = raw.body.response.result;

    let info = interpret_error_field(result.error.text)?;
    let route_directions = result
        .route
        .route_direction
        .into_iter()
        .map(cook_route_direction)
        .collect::<Result<Vec<_>, _>>()?;

    let cooked = NextTripsForStop {
        stop_no: result.stop_no.text,
        stop_label: result.stop_label.text,
        info,
        route_directions,
    };
    debug!(
        stop_no = %cooked.stop_no,
        route_directions = cooked.route_directions.len(),
        trips = cooked.trip_count(),
        "cooked next trips"
    );
    Ok(cooked)
}

/// Cook a `GetNextTripsForStopAllRoutes` response.
pub fn cook_next_trips_all_routes(
    raw: RawNextTripsForStopAllRoutes,
) -> Result<NextTripsForStopAllRoutes, CookError> {
    let result = raw.body.response.result;

    let info = interpret_error_field(result.error.text)?;
    let routes = result
        .routes
        .route
        .into_iter()
        .map(cook_route_with_trips)
        .collect::<Result<Vec<_>, _>>()?;

    let cooked = NextTripsForStopAllRoutes {
        stop_no: result.stop_no.text,
        stop_description: result.stop_description.text,
        info,
        routes,
    };
    debug!(
        stop_no = %cooked.stop_no,
        routes = cooked.routes.len(),
        trips = cooked.trip_count(),
        "cooked next trips for all routes"
    );
    Ok(cooked)
}

fn cook_route(raw: RawRoute) -> Route {
    Route {
        route_no: raw.route_no,
        direction_id: raw.direction_id,
        direction: raw.direction,
        route_heading: raw.route_heading,
    }
}

fn cook_route_direction(raw: RawRouteDirection) -> Result<RouteDirection, CookError> {
    let info = interpret_error_field(raw.error)?;
    let request_processing_time =
        parse_agency_timestamp("RequestProcessingTime", &raw.request_processing_time)?;

    Ok(RouteDirection {
        route_no: raw.route_no,
        route_label: raw.route_label,
        direction: raw.direction,
        info,
        request_processing_time,
        trips: cook_trips(raw.trips)?,
    })
}

fn cook_route_with_trips(raw: RawRouteWithTrips) -> Result<RouteWithTrips, CookError> {
    Ok(RouteWithTrips {
        route_no: raw.route_no,
        direction_id: raw.direction_id,
        direction: raw.direction,
        route_heading: raw.route_heading,
        trips: cook_trips(raw.trips)?,
    })
}

fn cook_trips(raw: RawTrips) -> Result<Vec<Trip>, CookError> {
    raw.trip.into_iter().map(cook_trip).collect()
}

/// Convert one trip, in wire order.
pub fn cook_trip(raw: RawTrip) -> Result<Trip, CookError> {
    Ok(Trip {
        adjusted_schedule_time: parse_required("AdjustedScheduleTime", &raw.adjusted_schedule_time)?,
        adjustment_age: parse_required("AdjustmentAge", &raw.adjustment_age)?,
        last_trip_of_schedule: parse_optional("LastTripOfSchedule", &raw.last_trip_of_schedule)?,
        latitude: parse_optional("Latitude", &raw.latitude)?,
        longitude: parse_optional("Longitude", &raw.longitude)?,
        gps_speed: parse_optional("GPSSpeed", &raw.gps_speed)?,
        trip_destination: raw.trip_destination,
        trip_start_time: raw.trip_start_time,
        bus_type: raw.bus_type,
    })
}
