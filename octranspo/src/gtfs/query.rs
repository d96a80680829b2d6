use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Row order for a GTFS request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ConfigError::InvalidOrderBy(other.to_string())),
        }
    }
}

/// Optional modifiers for a GTFS table request.
///
/// ```
/// use octranspo::gtfs::GtfsQuery;
///
/// let query = GtfsQuery::new()
///     .column_and_value("stop_code", "3017")
///     .order_by("desc")?
///     .limit(5);
/// assert!(query.has_selector());
/// # Ok::<(), octranspo::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GtfsQuery {
    id: Option<String>,
    column: Option<(String, String)>,
    order: Option<SortOrder>,
    limit: Option<u32>,
}

impl GtfsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the row with this `id`.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Select rows where `column` equals `value`.
    pub fn column_and_value(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.column = Some((column.into(), value.into()));
        self
    }

    /// Set the row order from its wire spelling, `"asc"` or `"desc"`.
    pub fn order_by(self, direction: &str) -> Result<Self, ConfigError> {
        Ok(self.sorted(direction.parse()?))
    }

    pub fn sorted(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Return at most `n` rows.
    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    /// Whether an `id` or `column`+`value` filter is set.
    pub fn has_selector(&self) -> bool {
        self.id.is_some() || self.column.is_some()
    }

    /// Append the request parameters for the set modifiers.
    pub(crate) fn append_params(&self, params: &mut Vec<(&'static str, String)>) {
        if let Some(id) = &self.id {
            params.push(("id", id.clone()));
        }
        if let Some((column, value)) = &self.column {
            params.push(("column", column.clone()));
            params.push(("value", value.clone()));
        }
        if let Some(order) = self.order {
            params.push(("orderBy", order.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
    }
}
