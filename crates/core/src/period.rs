use crate::{Error, Result, datetime};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A closed time interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// The lower bound, inclusive.
    pub lower: DateTime<Utc>,

    /// The upper bound, inclusive.
    pub upper: DateTime<Utc>,
}

impl Period {
    /// Creates a new period.
    ///
    /// Returns an error if the lower bound is after the upper bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf::{Period, datetime};
    /// let lower = datetime::parse("2011-07-14T22:01:01Z").unwrap();
    /// let upper = datetime::parse("2011-07-15T22:01:01Z").unwrap();
    /// let period = Period::new(lower, upper).unwrap();
    /// assert!(Period::new(upper, lower).is_err());
    /// ```
    pub fn new(lower: DateTime<Utc>, upper: DateTime<Utc>) -> Result<Period> {
        if lower > upper {
            Err(Error::InvalidPeriod { lower, upper })
        } else {
            Ok(Period { lower, upper })
        }
    }

    /// Creates a degenerate period containing a single instant.
    pub fn instant(instant: DateTime<Utc>) -> Period {
        Period {
            lower: instant,
            upper: instant,
        }
    }

    /// Returns true if this period contains the instant.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.lower <= instant && instant <= self.upper
    }

    /// Returns true if this period intersects the other.
    ///
    /// Both periods are closed, so touching bounds intersect.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf::{Period, datetime};
    /// let a = Period::new(
    ///     datetime::parse("2011-07-14").unwrap(),
    ///     datetime::parse("2011-07-16").unwrap(),
    /// ).unwrap();
    /// let b = Period::new(
    ///     datetime::parse("2011-07-16").unwrap(),
    ///     datetime::parse("2011-07-18").unwrap(),
    /// ).unwrap();
    /// assert!(a.intersects(&b));
    /// ```
    pub fn intersects(&self, other: &Period) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }

    /// Returns true if this period contains the other entirely.
    pub fn contains_period(&self, other: &Period) -> bool {
        self.lower <= other.lower && other.upper <= self.upper
    }

    /// Extends this period to cover the other.
    pub fn extend(&mut self, other: &Period) {
        if other.lower < self.lower {
            self.lower = other.lower;
        }
        if other.upper > self.upper {
            self.upper = other.upper;
        }
    }

    /// Renders this period as a wire-dialect interval.
    pub fn wire_interval(&self) -> [String; 2] {
        [
            datetime::format_wire(self.lower),
            datetime::format_wire(self.upper),
        ]
    }

    /// Renders this period in the internal dialect, `lower,upper`.
    ///
    /// This is the form the store's `period('[...]')` constructor expects
    /// between its brackets.
    pub fn to_internal(&self) -> String {
        format!(
            "{},{}",
            datetime::format_internal(self.lower),
            datetime::format_internal(self.upper)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Period;
    use crate::datetime;

    fn period(lower: &str, upper: &str) -> Period {
        Period::new(datetime::parse(lower).unwrap(), datetime::parse(upper).unwrap()).unwrap()
    }

    #[test]
    fn intersects() {
        let a = period("2011-07-14", "2011-07-16");
        assert!(a.intersects(&period("2011-07-15", "2011-07-18")));
        assert!(a.intersects(&period("2011-07-16", "2011-07-18")));
        assert!(!a.intersects(&period("2011-07-17", "2011-07-18")));
    }

    #[test]
    fn extend() {
        let mut a = period("2011-07-14", "2011-07-16");
        a.extend(&period("2011-07-10", "2011-07-15"));
        assert_eq!(a, period("2011-07-10", "2011-07-16"));
    }

    #[test]
    fn to_internal() {
        assert_eq!(
            period("2011-07-14", "2011-07-16").to_internal(),
            "2011-07-14 00:00:00.000000,2011-07-16 00:00:00.000000"
        );
    }
}
