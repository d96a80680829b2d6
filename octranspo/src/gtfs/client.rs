//! GTFS endpoint on [`Connection`].

use reqwest::Method;
use tracing::debug;

use crate::connection::Connection;
use crate::error::{ConfigError, DecodeError, Error};

use super::query::GtfsQuery;
use super::types::{
    Agency, CalendarDate, CalendarEntry, GtfsRoute, GtfsRow, GtfsTable, GtfsTrip,
    RawGtfsResponse, Stop, StopTime,
};

const GTFS: &str = "Gtfs";

impl Connection {
    /// Fetch rows of the GTFS table `R`.
    ///
    /// Tables that need a selector fail with
    /// [`ConfigError::MissingSelector`] before any request is made.
    pub async fn get_gtfs<R: GtfsRow>(&self, query: &GtfsQuery) -> Result<GtfsTable<R>, Error> {
        if R::NEEDS_SELECTOR && !query.has_selector() {
            return Err(ConfigError::MissingSelector(R::TABLE).into());
        }

        let mut params = self.credentials();
        params.push(("table", R::TABLE.to_string()));
        params.push(("format", "json".to_string()));
        query.append_params(&mut params);

        let table: GtfsTable<R> = self
            .bounded(async {
                let response = self.dispatch(Method::GET, GTFS, &params).await?;
                let body = response.bytes().await?;
                let raw: RawGtfsResponse<R> =
                    serde_json::from_slice(&body).map_err(DecodeError::from)?;
                Ok::<_, Error>(raw.into())
            })
            .await?;

        debug!(table = R::TABLE, rows = table.rows.len(), "gtfs table");
        Ok(table)
    }

    pub async fn get_gtfs_agency(&self, query: &GtfsQuery) -> Result<GtfsTable<Agency>, Error> {
        self.get_gtfs(query).await
    }

    pub async fn get_gtfs_calendar(
        &self,
        query: &GtfsQuery,
    ) -> Result<GtfsTable<CalendarEntry>, Error> {
        self.get_gtfs(query).await
    }

    pub async fn get_gtfs_calendar_dates(
        &self,
        query: &GtfsQuery,
    ) -> Result<GtfsTable<CalendarDate>, Error> {
        self.get_gtfs(query).await
    }

    pub async fn get_gtfs_routes(&self, query: &GtfsQuery) -> Result<GtfsTable<GtfsRoute>, Error> {
        self.get_gtfs(query).await
    }

    /// Requires a selector.
    pub async fn get_gtfs_stops(&self, query: &GtfsQuery) -> Result<GtfsTable<Stop>, Error> {
        self.get_gtfs(query).await
    }

    /// Requires a selector.
    pub async fn get_gtfs_stop_times(
        &self,
        query: &GtfsQuery,
    ) -> Result<GtfsTable<StopTime>, Error> {
        self.get_gtfs(query).await
    }

    /// Requires a selector.
    pub async fn get_gtfs_trips(&self, query: &GtfsQuery) -> Result<GtfsTable<GtfsTrip>, Error> {
        self.get_gtfs(query).await
    }
}
