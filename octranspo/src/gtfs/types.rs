//! GTFS table rows as served by the `Gtfs` endpoint.
//!
//! The endpoint returns every column as a JSON string, so every field here
//! is a `String`. Flag columns (service days, pickup and drop-off types,
//! location types) are left for the caller to interpret. Columns missing
//! from a row read as empty.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A row type for one GTFS table.
pub trait GtfsRow: DeserializeOwned {
    /// Value of the `table` request parameter.
    const TABLE: &'static str;

    /// Whether the table is too large to request without `id` or
    /// `column`+`value`.
    const NEEDS_SELECTOR: bool = false;
}

/// Response body: the echoed query plus the rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "R: DeserializeOwned")]
pub struct RawGtfsResponse<R> {
    #[serde(rename = "Query", default)]
    pub query: QueryEcho,
    #[serde(rename = "Gtfs", default = "Vec::new")]
    pub gtfs: Vec<R>,
}

/// The query parameters as the server understood them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryEcho {
    pub table: String,
    pub direction: String,
    pub column: String,
    pub value: String,
    pub format: String,
}

/// A GTFS table fetched from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtfsTable<R> {
    pub query: QueryEcho,
    /// Rows in the order the server sent them.
    pub rows: Vec<R>,
}

impl<R> From<RawGtfsResponse<R>> for GtfsTable<R> {
    fn from(raw: RawGtfsResponse<R>) -> Self {
        Self {
            query: raw.query,
            rows: raw.gtfs,
        }
    }
}

/// `agency` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Agency {
    pub id: String,
    pub agency_name: String,
    pub agency_url: String,
    pub agency_timezone: String,
    pub agency_lang: String,
    pub agency_phone: String,
}

impl GtfsRow for Agency {
    const TABLE: &'static str = "agency";
}

/// `calendar` table. Day columns are `"1"` or `"0"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarEntry {
    pub id: String,
    pub service_id: String,
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
    /// `YYYYMMDD`
    pub start_date: String,
    /// `YYYYMMDD`
    pub end_date: String,
}

impl GtfsRow for CalendarEntry {
    const TABLE: &'static str = "calendar";
}

/// `calendar_dates` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarDate {
    pub id: String,
    pub service_id: String,
    pub date: String,
    pub exception_type: String,
}

impl GtfsRow for CalendarDate {
    const TABLE: &'static str = "calendar_dates";
}

/// `routes` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GtfsRoute {
    pub id: String,
    pub route_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
    pub route_desc: String,
    pub route_type: String,
}

impl GtfsRow for GtfsRoute {
    const TABLE: &'static str = "routes";
}

/// `stops` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stop {
    pub id: String,
    pub stop_id: String,
    pub stop_code: String,
    pub stop_name: String,
    pub stop_desc: String,
    pub stop_lat: String,
    pub stop_lon: String,
    pub zone_id: String,
    pub stop_url: String,
    pub location_type: String,
    pub parent_station: String,
}

impl GtfsRow for Stop {
    const TABLE: &'static str = "stops";
    const NEEDS_SELECTOR: bool = true;
}

/// `stop_times` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopTime {
    pub id: String,
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: String,
    pub pickup_type: String,
    pub drop_off_type: String,
}

impl GtfsRow for StopTime {
    const TABLE: &'static str = "stop_times";
    const NEEDS_SELECTOR: bool = true;
}

/// `trips` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GtfsTrip {
    pub id: String,
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    pub trip_headsign: String,
    pub direction_id: String,
    pub block_id: String,
}

impl GtfsRow for GtfsTrip {
    const TABLE: &'static str = "trips";
    const NEEDS_SELECTOR: bool = true;
}
