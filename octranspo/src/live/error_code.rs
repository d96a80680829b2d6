//! The feed's overloaded `Error` element.
//!
//! The same element carries either a numeric failure code or free text
//! meant for display. Only the codes below are failures; everything else,
//! including other numbers and the empty string, is passed through.

/// A failure reported by the API in an `Error` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ApiError {
    #[error("error returned from API - Invalid API key")]
    InvalidApiKey,

    #[error("error returned from API - Unable to query data source")]
    DataSourceUnavailable,

    #[error("error returned from API - Invalid stop number")]
    InvalidStopNumber,

    #[error("error returned from API - Invalid route number")]
    InvalidRouteNumber,

    #[error("error returned from API - Stop does not service route")]
    StopDoesNotServiceRoute,
}

impl ApiError {
    /// Look up a failure code. Returns `None` for anything that is not one
    /// of the documented codes.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(ApiError::InvalidApiKey),
            "2" => Some(ApiError::DataSourceUnavailable),
            "10" => Some(ApiError::InvalidStopNumber),
            "11" => Some(ApiError::InvalidRouteNumber),
            "12" => Some(ApiError::StopDoesNotServiceRoute),
            _ => None,
        }
    }

    /// The code as it appears on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidApiKey => "1",
            ApiError::DataSourceUnavailable => "2",
            ApiError::InvalidStopNumber => "10",
            ApiError::InvalidRouteNumber => "11",
            ApiError::StopDoesNotServiceRoute => "12",
        }
    }
}

/// Split an `Error` element into informational text or a failure.
///
/// ```
/// use octranspo::live::{ApiError, interpret_error_field};
///
/// assert_eq!(interpret_error_field(String::new()), Ok(String::new()));
/// assert_eq!(interpret_error_field("10".into()), Err(ApiError::InvalidStopNumber));
/// ```
pub fn interpret_error_field(text: String) -> Result<String, ApiError> {
    match ApiError::from_code(&text) {
        Some(err) => Err(err),
        None => Ok(text),
    }
}
