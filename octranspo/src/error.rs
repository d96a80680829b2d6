//! Error types shared by both feeds.
//!
//! Every request ends in exactly one of these outcomes. Nothing here is
//! retried internally; callers decide whether a failure is worth repeating.

use crate::live::ApiError;

/// Any failure from a [`Connection`](crate::Connection) query.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid caller-supplied option, detected before any network call.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request did not produce a 200 response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be read into the wire shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The API reported one of its failure codes.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A mandatory field did not parse as its expected type.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::Http(err))
    }
}

/// Invalid configuration or query options.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `orderBy` only accepts `asc` or `desc`.
    #[error("invalid sort direction {0:?}: expected \"asc\" or \"desc\"")]
    InvalidOrderBy(String),

    /// The table is too large to fetch without `id` or `column`+`value`.
    #[error("table {0} requires an id or column/value selector")]
    MissingSelector(&'static str),

    /// A required request parameter was blank.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// Steady rate must be finite and positive.
    #[error("invalid rate limit: {0} calls per second")]
    InvalidRate(f64),

    /// A limited gate needs room for at least one call.
    #[error("invalid burst size {0}: must be at least 1")]
    InvalidBurst(u32),

    /// A required environment variable is not set.
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    /// An environment variable holds an unparsable value.
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Transport-level failures.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The API answered with something other than 200.
    #[error("non 200 HTTP response from API: {status} {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Connection, DNS or body read failure.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The request timeout elapsed, either waiting on the rate gate or on the
    /// network.
    #[error("request cancelled: timed out after {0:?}")]
    Cancelled(std::time::Duration),
}

/// The body was not a well-formed payload for the endpoint.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("XML decode error: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload declared a character set we cannot decode.
    #[error("unsupported character set {0:?}")]
    Charset(String),
}

/// A mandatory (or present optional) field failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field {field}: cannot parse {value:?} as {expected}")]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl FieldError {
    pub(crate) fn new(field: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::from(ConfigError::InvalidOrderBy("up".into()));
        assert_eq!(
            err.to_string(),
            "invalid sort direction \"up\": expected \"asc\" or \"desc\""
        );

        let err = Error::from(ConfigError::MissingSelector("stops"));
        assert_eq!(
            err.to_string(),
            "table stops requires an id or column/value selector"
        );

        let err = Error::from(FieldError::new("AdjustmentAge", "soon", "a number"));
        assert_eq!(
            err.to_string(),
            "field AdjustmentAge: cannot parse \"soon\" as a number"
        );

        let err = Error::from(TransportError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            url: "https://api.octranspo1.com/v1.2/GetRouteSummaryForStop".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("GetRouteSummaryForStop"));
    }
}
