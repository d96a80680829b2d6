//! Real-time feed response shapes.
//!
//! These types are a literal transcription of the SOAP envelopes the API
//! returns, namespace attributes included. Every field defaults so that a
//! missing element reads as empty text; deciding whether empty is acceptable
//! is the job of [`convert`](super::convert). Unknown elements and
//! attributes are ignored.
//!
//! The three endpoints share pieces but nest differently, so each has its
//! own body type.

use serde::Deserialize;

/// Outer `soap:Envelope`, generic over the endpoint body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SoapEnvelope<B> {
    #[serde(rename = "@xmlns:soap")]
    pub xmlns_soap: String,
    #[serde(rename = "@xmlns:xsi")]
    pub xmlns_xsi: String,
    #[serde(rename = "@xmlns:xsd")]
    pub xmlns_xsd: String,
    #[serde(rename = "Body", alias = "soap:Body")]
    pub body: B,
}

/// Element text together with the `xmlns` attribute the API puts on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NsText {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "$text")]
    pub text: String,
}

/// Response to `GetRouteSummaryForStop`.
pub type RawRouteSummaryForStop = SoapEnvelope<RouteSummaryBody>;

/// Response to `GetNextTripsForStop`.
pub type RawNextTripsForStop = SoapEnvelope<NextTripsBody>;

/// Response to `GetNextTripsForStopAllRoutes`.
pub type RawNextTripsForStopAllRoutes = SoapEnvelope<AllRoutesBody>;

// --- GetRouteSummaryForStop ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteSummaryBody {
    #[serde(rename = "GetRouteSummaryForStopResponse")]
    pub response: RouteSummaryResponse,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteSummaryResponse {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "GetRouteSummaryForStopResult")]
    pub result: RouteSummaryResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RouteSummaryResult {
    pub stop_no: NsText,
    pub stop_description: NsText,
    pub error: NsText,
    pub routes: RawRoutes,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRoutes {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "Route")]
    pub route: Vec<RawRoute>,
}

/// A `Route` element in a route summary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawRoute {
    pub route_no: String,
    #[serde(rename = "DirectionID")]
    pub direction_id: String,
    pub direction: String,
    pub route_heading: String,
}

// --- GetNextTripsForStop ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NextTripsBody {
    #[serde(rename = "GetNextTripsForStopResponse")]
    pub response: NextTripsResponse,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NextTripsResponse {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "GetNextTripsForStopResult")]
    pub result: NextTripsResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NextTripsResult {
    pub stop_no: NsText,
    pub stop_label: NsText,
    pub error: NsText,
    /// Despite the name, a container of route directions.
    pub route: RawRouteDirections,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRouteDirections {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "RouteDirection")]
    pub route_direction: Vec<RawRouteDirection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawRouteDirection {
    pub route_no: String,
    pub route_label: String,
    pub direction: String,
    /// Carries its own error code, independent of the stop-level one.
    pub error: String,
    /// `YYYYMMDDhhmmss`, Ottawa local time.
    pub request_processing_time: String,
    pub trips: RawTrips,
}

// --- GetNextTripsForStopAllRoutes ---
//
// The API answers this endpoint with the route summary element names.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AllRoutesBody {
    #[serde(rename = "GetRouteSummaryForStopResponse")]
    pub response: AllRoutesResponse,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AllRoutesResponse {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "GetRouteSummaryForStopResult")]
    pub result: AllRoutesResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AllRoutesResult {
    pub stop_no: NsText,
    pub stop_description: NsText,
    pub error: NsText,
    pub routes: RawRoutesWithTrips,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRoutesWithTrips {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "Route")]
    pub route: Vec<RawRouteWithTrips>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawRouteWithTrips {
    pub route_no: String,
    #[serde(rename = "DirectionID")]
    pub direction_id: String,
    pub direction: String,
    pub route_heading: String,
    pub trips: RawTrips,
}

// --- shared ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTrips {
    #[serde(rename = "Trip")]
    pub trip: Vec<RawTrip>,
}

/// A `Trip` element. Every value is text; empty elements read as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawTrip {
    pub trip_destination: String,
    pub trip_start_time: String,
    pub adjusted_schedule_time: String,
    pub adjustment_age: String,
    pub last_trip_of_schedule: String,
    pub bus_type: String,
    pub latitude: String,
    pub longitude: String,
    #[serde(rename = "GPSSpeed")]
    pub gps_speed: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_trip_with_empty_elements() {
        let xml = r#"<Trip>
            <TripDestination>LeBreton</TripDestination>
            <TripStartTime>13:01</TripStartTime>
            <AdjustedScheduleTime>26</AdjustedScheduleTime>
            <AdjustmentAge>0.44</AdjustmentAge>
            <LastTripOfSchedule/>
            <BusType>6EAB - 60</BusType>
            <Latitude/>
            <Longitude/>
            <GPSSpeed/>
        </Trip>"#;

        let trip: RawTrip = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(trip.trip_destination, "LeBreton");
        assert_eq!(trip.adjusted_schedule_time, "26");
        assert_eq!(trip.bus_type, "6EAB - 60");
        assert_eq!(trip.last_trip_of_schedule, "");
        assert_eq!(trip.latitude, "");
        assert_eq!(trip.longitude, "");
        assert_eq!(trip.gps_speed, "");
    }

    #[test]
    fn deserialize_trip_missing_elements_as_empty() {
        let xml = "<Trip><TripDestination>Bayshore</TripDestination></Trip>";
        let trip: RawTrip = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(trip.trip_destination, "Bayshore");
        assert_eq!(trip.adjustment_age, "");
        assert_eq!(trip.gps_speed, "");
    }

    #[test]
    fn deserialize_namespaced_text() {
        let xml = r#"<StopNo xmlns="http://tempuri.org/">7659</StopNo>"#;
        let text: NsText = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(text.text, "7659");
        assert_eq!(text.xmlns, "http://tempuri.org/");

        let xml = r#"<Error xmlns="http://tempuri.org/"/>"#;
        let text: NsText = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(text.text, "");
    }

    #[test]
    fn unknown_elements_are_ignored() {
        let xml = r#"<Route>
            <RouteNo>6</RouteNo>
            <Extra><Nested>x</Nested></Extra>
            <DirectionID>1</DirectionID>
            <Direction>Northbound</Direction>
            <RouteHeading>Rockcliffe</RouteHeading>
        </Route>"#;
        let route: RawRoute = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(route.route_no, "6");
        assert_eq!(route.direction_id, "1");
        assert_eq!(route.route_heading, "Rockcliffe");
    }
}
