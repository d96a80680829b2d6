//! Real-time trip predictions.

use chrono::DateTime;
use chrono_tz::Tz;

/// One predicted trip arriving at a stop.
///
/// Position, speed and the last-trip flag are only reported by some
/// vehicles, so they are `None` when the feed leaves them empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub trip_destination: String,
    /// Scheduled start of the trip as the feed prints it (e.g. "11:13").
    /// Kept as text; it is not a reliable clock value.
    pub trip_start_time: String,
    /// Minutes until the bus reaches the stop.
    pub adjusted_schedule_time: i32,
    /// Minutes since the GPS fix behind the estimate. Negative when the
    /// estimate comes from the schedule alone.
    pub adjustment_age: f64,
    pub last_trip_of_schedule: Option<bool>,
    pub bus_type: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Kilometres per hour.
    pub gps_speed: Option<f64>,
}

impl Trip {
    /// Whether the estimate is backed by live GPS data.
    pub fn is_live(&self) -> bool {
        self.adjustment_age >= 0.0
    }
}

/// One direction of one route at a stop, with its next trips.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDirection {
    pub route_no: String,
    pub route_label: String,
    pub direction: String,
    /// Informational text from the feed's error field. Failure codes never
    /// reach here.
    pub info: String,
    pub request_processing_time: DateTime<Tz>,
    /// Next trips in the order the feed sent them.
    pub trips: Vec<Trip>,
}
