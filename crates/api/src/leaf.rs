use crate::{Error, Result};
use chrono::{DateTime, Utc};
use mf::datetime;
use std::str::FromStr;

/// The validated `leaf` parameter: a strictly ascending list of instants
/// at which to sample temporal sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf(Vec<DateTime<Utc>>);

impl Leaf {
    /// Returns the instants.
    pub fn instants(&self) -> &[DateTime<Utc>] {
        &self.0
    }

    /// Renders this leaf in the internal form: comma-separated
    /// `YYYY-MM-DD HH:MM:SS.ffffff`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf_api::Leaf;
    /// let leaf: Leaf = "2020-01-01T00:00:00Z,2020-01-02T00:00:00Z".parse().unwrap();
    /// assert_eq!(
    ///     leaf.to_internal(),
    ///     "2020-01-01 00:00:00.000000,2020-01-02 00:00:00.000000"
    /// );
    /// ```
    pub fn to_internal(&self) -> String {
        self.0
            .iter()
            .map(|instant| datetime::format_internal(*instant))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for Leaf {
    type Err = Error;

    fn from_str(s: &str) -> Result<Leaf> {
        let instants = s
            .split(',')
            .map(|instant| datetime::parse(instant).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;
        if instants.windows(2).any(|pair| pair[0] >= pair[1]) {
            Err(Error::LeafNotAscending)
        } else {
            Ok(Leaf(instants))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Leaf;

    #[test]
    fn ascending() {
        let leaf: Leaf = "2020-01-01,2020-01-02,2020-01-03".parse().unwrap();
        assert_eq!(leaf.instants().len(), 3);
    }

    #[test]
    fn non_ascending_fails() {
        assert!("2020-01-02,2020-01-01".parse::<Leaf>().is_err());
        assert!("2020-01-01,2020-01-01".parse::<Leaf>().is_err());
    }

    #[test]
    fn garbage_fails() {
        assert!("2020-01-01,tomorrow".parse::<Leaf>().is_err());
    }
}
