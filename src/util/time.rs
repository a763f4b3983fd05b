//! Date and timestamp utilities.
//!
//! Stored dates are read leniently: anything unparseable is "no date" rather
//! than an error. User input (`--due`, `--as-of`) is parsed strictly.

use crate::error::{Result, SignalError};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Canonical stored timestamp layout (`2026-02-08T10:00:00Z`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Canonical stored date layout.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current UTC date.
#[must_use]
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a timestamp in the stored layout (second precision, `Z` suffix).
#[must_use]
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Leniently parse a stored timestamp.
///
/// Accepts RFC3339, `YYYY-MM-DDTHH:MM:SSZ`, `YYYY-MM-DD HH:MM:SS` and a bare
/// date (midnight UTC). Returns `None` for empty or malformed text.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for layout in [TIMESTAMP_FORMAT, "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    parse_date(s)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Leniently parse a stored calendar date (`YYYY-MM-DD`).
///
/// A trailing time component is ignored so timestamp text still yields its date.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let s = value.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

/// Strictly parse a user-supplied date.
///
/// # Errors
///
/// Returns a validation error naming `field` if the value is not `YYYY-MM-DD`.
pub fn parse_date_arg(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| SignalError::validation(field, format!("expected YYYY-MM-DD, got '{value}'")))
}

/// Monday on or before `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Signed whole days from `from` to `to`.
#[must_use]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Fractional days between two instants.
#[must_use]
pub fn fractional_days(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / 86_400.0
}

/// Round to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_timestamp_canonical() {
        let dt = parse_timestamp("2026-02-02T10:00:00Z").unwrap();
        assert_eq!(dt.date_naive(), date(2026, 2, 2));
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn parse_timestamp_with_offset_normalises_to_utc() {
        let dt = parse_timestamp("2026-02-02T23:30:00-05:00").unwrap();
        assert_eq!(dt.date_naive(), date(2026, 2, 3));
    }

    #[test]
    fn parse_timestamp_space_separated() {
        let dt = parse_timestamp("2026-02-02 08:15:00").unwrap();
        assert_eq!(dt.minute(), 15);
    }

    #[test]
    fn parse_timestamp_bare_date_is_midnight() {
        let dt = parse_timestamp("2026-02-02").unwrap();
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn parse_timestamp_malformed_is_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2026-13-40T00:00:00Z").is_none());
    }

    #[test]
    fn parse_date_lenient() {
        assert_eq!(parse_date("2026-03-05"), Some(date(2026, 3, 5)));
        assert_eq!(parse_date("2026-03-05T10:00:00Z"), Some(date(2026, 3, 5)));
        assert_eq!(parse_date("next week"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn parse_date_arg_strict() {
        assert_eq!(parse_date_arg("2026-03-05", "due").unwrap(), date(2026, 3, 5));
        let err = parse_date_arg("03/05/2026", "due").unwrap_err();
        assert!(err.to_string().contains("due"));
    }

    #[test]
    fn format_timestamp_layout() {
        let dt = Utc.with_ymd_and_hms(2026, 2, 8, 9, 5, 7).unwrap();
        assert_eq!(format_timestamp(&dt), "2026-02-08T09:05:07Z");
        assert_eq!(parse_timestamp(&format_timestamp(&dt)), Some(dt));
    }

    #[test]
    fn week_start_is_monday() {
        // 2026-02-04 is a Wednesday.
        assert_eq!(week_start(date(2026, 2, 4)), date(2026, 2, 2));
        assert_eq!(week_start(date(2026, 2, 2)), date(2026, 2, 2));
        assert_eq!(week_start(date(2026, 2, 8)), date(2026, 2, 2));
        assert_eq!(week_start(date(2026, 2, 8)).weekday(), Weekday::Mon);
    }

    #[test]
    fn days_between_is_signed() {
        assert_eq!(days_between(date(2026, 1, 1), date(2026, 1, 21)), 20);
        assert_eq!(days_between(date(2026, 1, 21), date(2026, 1, 1)), -20);
    }

    #[test]
    fn round1_rounds_half_away() {
        assert!((round1(2.25) - 2.3).abs() < f64::EPSILON);
        assert!((round1(4.0 / 3.0) - 1.3).abs() < f64::EPSILON);
    }
}
