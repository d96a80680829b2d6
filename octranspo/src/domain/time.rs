//! Agency-local timestamps.
//!
//! The real-time feed stamps each route direction with the time the request
//! was processed, as a bare `YYYYMMDDhhmmss` string in Ottawa local time.
//! It carries no offset, so the zone is fixed here rather than taken from
//! the caller or the host.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::error::FieldError;

/// The zone all agency timestamps are expressed in.
pub const AGENCY_TZ: Tz = chrono_tz::America::Toronto;

const PROCESSING_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Parse a 14-digit `YYYYMMDDhhmmss` timestamp in [`AGENCY_TZ`].
///
/// During the autumn DST overlap the earlier instant is chosen. Times that
/// fall in the spring-forward gap do not exist and are rejected, where a
/// lenient parser would shift them forward by an hour.
///
/// ```
/// use chrono::{Datelike, Timelike};
/// use octranspo::domain::parse_agency_timestamp;
///
/// let t = parse_agency_timestamp("RequestProcessingTime", "20180831114042").unwrap();
/// assert_eq!((t.year(), t.month(), t.day()), (2018, 8, 31));
/// assert_eq!((t.hour(), t.minute(), t.second()), (11, 40, 42));
///
/// assert!(parse_agency_timestamp("RequestProcessingTime", "2018-08-31").is_err());
/// ```
pub fn parse_agency_timestamp(field: &'static str, text: &str) -> Result<DateTime<Tz>, FieldError> {
    let invalid = || FieldError::new(field, text, "a YYYYMMDDhhmmss timestamp");

    // chrono accepts shorter numeric fields; the feed layout is fixed width.
    if text.len() != 14 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let naive = NaiveDateTime::parse_from_str(text, PROCESSING_TIME_FORMAT).map_err(|_| invalid())?;

    match AGENCY_TZ.from_local_datetime(&naive) {
        LocalResult::Single(t) => Ok(t),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn parse(text: &str) -> Result<DateTime<Tz>, FieldError> {
        parse_agency_timestamp("RequestProcessingTime", text)
    }

    #[test]
    fn parses_in_agency_zone() {
        let t = parse("20180831114042").unwrap();
        let expected = AGENCY_TZ.with_ymd_and_hms(2018, 8, 31, 11, 40, 42).unwrap();
        assert_eq!(t, expected);

        // EDT is UTC-4.
        let utc = Utc.with_ymd_and_hms(2018, 8, 31, 15, 40, 42).unwrap();
        assert_eq!(t.with_timezone(&Utc), utc);
    }

    #[test]
    fn winter_timestamps_use_standard_time() {
        let t = parse("20190115080000").unwrap();
        let utc = Utc.with_ymd_and_hms(2019, 1, 15, 13, 0, 0).unwrap();
        assert_eq!(t.with_timezone(&Utc), utc);
    }

    #[test]
    fn rejects_wrong_width_and_non_digits() {
        assert!(parse("").is_err());
        assert!(parse("2018083111404").is_err());
        assert!(parse("201808311140420").is_err());
        assert!(parse("2018083111404x").is_err());
        assert!(parse("+0180831114042").is_err());
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(parse("20180231114042").is_err());
        assert!(parse("20180831254042").is_err());
    }

    #[test]
    fn dst_overlap_picks_earlier_instant() {
        // 2018-11-04 01:30 happened twice in Ottawa.
        let t = parse("20181104013000").unwrap();
        let utc = Utc.with_ymd_and_hms(2018, 11, 4, 5, 30, 0).unwrap();
        assert_eq!(t.with_timezone(&Utc), utc);
    }

    #[test]
    fn dst_gap_is_rejected() {
        // 2018-03-11 02:30 never happened in Ottawa.
        let err = parse("20180311023000").unwrap_err();
        assert_eq!(err.field, "RequestProcessingTime");
    }
}
