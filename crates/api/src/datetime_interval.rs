use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use mf::{Period, datetime};
use std::str::FromStr;

/// The validated `datetime` parameter: a closed interval, possibly
/// degenerate.
///
/// A single instant is an interval whose start and end coincide. Open
/// sides (`..` or an empty side) are mapped to the minimum or maximum
/// representable instant. Each side is parsed with default fields that
/// lean toward the side's bound, so `2020-01-01` as an end means the last
/// microsecond of that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatetimeInterval {
    /// The interval's start, inclusive.
    pub start: DateTime<Utc>,

    /// The interval's end, inclusive.
    pub end: DateTime<Utc>,
}

impl DatetimeInterval {
    /// Renders this interval in the validated internal form,
    /// `YYYY-MM-DD HH:MM:SS.ffffff,YYYY-MM-DD HH:MM:SS.ffffff`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf_api::DatetimeInterval;
    /// let interval: DatetimeInterval = "2020-01-01/2020-01-02".parse().unwrap();
    /// assert_eq!(
    ///     interval.to_internal(),
    ///     "2020-01-01 00:00:00.000000,2020-01-02 23:59:59.999999"
    /// );
    /// ```
    pub fn to_internal(&self) -> String {
        format!(
            "{},{}",
            datetime::format_internal(self.start),
            datetime::format_internal(self.end)
        )
    }

    /// Returns this interval as a [Period].
    pub fn period(&self) -> Period {
        Period {
            lower: self.start,
            upper: self.end,
        }
    }
}

impl FromStr for DatetimeInterval {
    type Err = Error;

    fn from_str(s: &str) -> Result<DatetimeInterval> {
        let (start, end) = if let Some((start, end)) = s.split_once('/') {
            (
                parse_side(start, false)?.unwrap_or_else(datetime::min),
                parse_side(end, true)?.unwrap_or_else(datetime::max),
            )
        } else {
            let instant =
                parse_side(s, false)?.ok_or_else(|| mf::Error::InvalidInstant(s.to_string()))?;
            (instant, instant)
        };
        if start > end {
            Err(Error::StartIsAfterEnd(start, end))
        } else {
            Ok(DatetimeInterval { start, end })
        }
    }
}

fn parse_side(s: &str, end: bool) -> Result<Option<DateTime<Utc>>> {
    let s = s.trim();
    if s.is_empty() || s == ".." {
        return Ok(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let time = if end {
            NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).expect("valid time")
        } else {
            NaiveTime::MIN
        };
        return Ok(Some(Utc.from_utc_datetime(&date.and_time(time))));
    }
    datetime::parse(s).map(Some).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::DatetimeInterval;
    use mf::datetime;

    #[test]
    fn single_instant() {
        let interval: DatetimeInterval = "2020-01-01T12:00:00Z".parse().unwrap();
        assert_eq!(interval.start, interval.end);
    }

    #[test]
    fn open_end() {
        let interval: DatetimeInterval = "2020-01-01/".parse().unwrap();
        assert_eq!(interval.start, datetime::parse("2020-01-01").unwrap());
        assert_eq!(interval.end, datetime::max());
        let dotted: DatetimeInterval = "2020-01-01/..".parse().unwrap();
        assert_eq!(interval, dotted);
    }

    #[test]
    fn open_start() {
        let interval: DatetimeInterval = "/2020-01-01".parse().unwrap();
        assert_eq!(interval.start, datetime::min());
        assert_eq!(
            datetime::format_internal(interval.end),
            "2020-01-01 23:59:59.999999"
        );
    }

    #[test]
    fn reversed_range_fails() {
        assert!("2020-01-02/2020-01-01".parse::<DatetimeInterval>().is_err());
    }

    #[test]
    fn garbage_fails() {
        assert!("soon/later".parse::<DatetimeInterval>().is_err());
    }
}
