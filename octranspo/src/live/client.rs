//! Real-time endpoints on [`Connection`].

use reqwest::Method;

use crate::connection::{Connection, require};
use crate::domain::{NextTripsForStop, NextTripsForStopAllRoutes, RouteSummaryForStop};
use crate::error::Error;

use super::convert::{cook_next_trips, cook_next_trips_all_routes, cook_route_summary};
use super::decode::decode_xml;
use super::types::{RawNextTripsForStop, RawNextTripsForStopAllRoutes, RawRouteSummaryForStop};

const ROUTE_SUMMARY_FOR_STOP: &str = "GetRouteSummaryForStop";
const NEXT_TRIPS_FOR_STOP: &str = "GetNextTripsForStop";
const NEXT_TRIPS_FOR_STOP_ALL_ROUTES: &str = "GetNextTripsForStopAllRoutes";

impl Connection {
    /// Routes serving a stop.
    pub async fn get_route_summary_for_stop(
        &self,
        stop_no: &str,
    ) -> Result<RouteSummaryForStop, Error> {
        let mut params = self.credentials();
        params.push(("stopNo", require("stopNo", stop_no)?));

        let raw: RawRouteSummaryForStop = self.post_soap(ROUTE_SUMMARY_FOR_STOP, &params).await?;
        Ok(cook_route_summary(raw)?)
    }

    /// The next trips for one route at a stop.
    pub async fn get_next_trips_for_stop(
        &self,
        route_no: &str,
        stop_no: &str,
    ) -> Result<NextTripsForStop, Error> {
        let mut params = self.credentials();
        params.push(("routeNo", require("routeNo", route_no)?));
        params.push(("stopNo", require("stopNo", stop_no)?));

        let raw: RawNextTripsForStop = self.post_soap(NEXT_TRIPS_FOR_STOP, &params).await?;
        Ok(cook_next_trips(raw)?)
    }

    /// The next trips for every route at a stop.
    pub async fn get_next_trips_for_stop_all_routes(
        &self,
        stop_no: &str,
    ) -> Result<NextTripsForStopAllRoutes, Error> {
        let mut params = self.credentials();
        params.push(("stopNo", require("stopNo", stop_no)?));

        let raw: RawNextTripsForStopAllRoutes = self
            .post_soap(NEXT_TRIPS_FOR_STOP_ALL_ROUTES, &params)
            .await?;
        Ok(cook_next_trips_all_routes(raw)?)
    }

    /// POST a form to a SOAP endpoint and decode the envelope.
    async fn post_soap<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&'static str, String)],
    ) -> Result<T, Error> {
        self.bounded(async {
            let response = self.dispatch(Method::POST, endpoint, params).await?;
            let body = response.bytes().await?;
            Ok::<T, Error>(decode_xml(&body)?)
        })
        .await
    }
}
