//! Parsing of scalar fields that arrive as text.
//!
//! The SOAP feed sends every value as element text. A field is either
//! mandatory, in which case it must parse, or optional, in which case an
//! empty element means "not reported" and anything else must still parse.
//! There is no third "present but ignored" outcome: bad text fails the
//! whole response.

use crate::error::FieldError;

/// A scalar type that can be read from feed text.
pub trait WireScalar: Sized {
    /// Human description used in error messages.
    const EXPECTED: &'static str;

    fn parse_wire(text: &str) -> Option<Self>;
}

impl WireScalar for i32 {
    const EXPECTED: &'static str = "an integer";

    fn parse_wire(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl WireScalar for f64 {
    const EXPECTED: &'static str = "a number";

    fn parse_wire(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl WireScalar for bool {
    const EXPECTED: &'static str = "a boolean";

    /// Accepts the spellings the feed has been seen to use.
    ///
    /// ```
    /// use octranspo::domain::WireScalar;
    ///
    /// assert_eq!(bool::parse_wire("false"), Some(false));
    /// assert_eq!(bool::parse_wire("True"), Some(true));
    /// assert_eq!(bool::parse_wire("1"), Some(true));
    /// assert_eq!(bool::parse_wire("yes"), None);
    /// ```
    fn parse_wire(text: &str) -> Option<Self> {
        match text {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
            _ => None,
        }
    }
}

/// Parse a field that must always be present.
///
/// Empty text is an error like any other unparsable text.
pub fn parse_required<T: WireScalar>(field: &'static str, text: &str) -> Result<T, FieldError> {
    T::parse_wire(text).ok_or_else(|| FieldError::new(field, text, T::EXPECTED))
}

/// Parse a field the feed may leave empty.
///
/// Returns `Ok(None)` for empty text, `Ok(Some(_))` for parsable text and an
/// error otherwise.
pub fn parse_optional<T: WireScalar>(
    field: &'static str,
    text: &str,
) -> Result<Option<T>, FieldError> {
    if text.is_empty() {
        return Ok(None);
    }
    parse_required(field, text).map(Some)
}
