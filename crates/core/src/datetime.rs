//! Instant parsing and the two timestamp dialects.
//!
//! The wire dialect carries RFC 3339 strings with a trailing `Z`; the
//! internal dialect (what the store sees) carries naive UTC timestamps. The
//! suffix is stripped on write and restored on read, and both directions go
//! through this module.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses an instant from a string.
///
/// Accepts RFC 3339 (offset or `Z`), naive date-times, and bare dates; naive
/// values are stamped as UTC.
///
/// # Examples
///
/// ```
/// let instant = mf::datetime::parse("2011-07-14T22:01:01Z").unwrap();
/// let same = mf::datetime::parse("2011-07-14 22:01:01").unwrap();
/// assert_eq!(instant, same);
/// ```
pub fn parse(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Ok(datetime.with_timezone(&Utc));
    }
    // The store abbreviates offsets ("+00"), which RFC 3339 does not allow.
    for format in ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"] {
        if let Ok(datetime) = DateTime::parse_from_str(s, format) {
            return Ok(datetime.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(Error::InvalidInstant(s.to_string()))
}

/// Parses an instant from a JSON value.
///
/// Strings go through [parse]; integers are interpreted as Unix epoch
/// milliseconds, a tolerance carried over from the source data sets.
pub fn parse_value(value: &Value) -> Result<DateTime<Utc>> {
    match value {
        Value::String(s) => parse(s),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .ok_or_else(|| Error::InvalidInstant(number.to_string())),
        _ => Err(Error::InvalidInstant(value.to_string())),
    }
}

/// Formats an instant in the internal dialect, `YYYY-MM-DD HH:MM:SS.ffffff`.
pub fn format_internal(datetime: DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Formats an instant in the wire dialect, RFC 3339 with a trailing `Z`.
pub fn format_wire(datetime: DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Formats an instant as a naive ISO 8601 string, the spelling MF-JSON
/// documents carry once the `Z` suffix has been stripped.
pub fn format_naive_iso(datetime: DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// The smallest representable instant, used for open-ended interval sides.
pub fn min() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// The largest representable instant, used for open-ended interval sides.
pub fn max() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
        .single()
        .expect("valid timestamp")
        + chrono::Duration::microseconds(999_999)
}
