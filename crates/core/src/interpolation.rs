use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How a temporal sequence behaves between samples.
///
/// The wire dialect spells stepwise interpolation `"Step"`; the internal
/// dialect spells it `"Stepwise"`. This is the single place where the two
/// spellings meet: parse with [Interpolation::from_str] (which accepts
/// both), render with [Interpolation::wire_name] or
/// [Interpolation::internal_name].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    /// No interpolation; the sequence is defined only at its samples.
    Discrete,

    /// Linear interpolation between samples.
    #[default]
    Linear,

    /// The value of the earlier sample holds until the next one.
    Stepwise,
}

impl Interpolation {
    /// Returns the wire-dialect name.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf::Interpolation;
    /// assert_eq!(Interpolation::Stepwise.wire_name(), "Step");
    /// ```
    pub fn wire_name(&self) -> &'static str {
        match self {
            Interpolation::Discrete => "Discrete",
            Interpolation::Linear => "Linear",
            Interpolation::Stepwise => "Step",
        }
    }

    /// Returns the internal-dialect name.
    pub fn internal_name(&self) -> &'static str {
        match self {
            Interpolation::Discrete => "Discrete",
            Interpolation::Linear => "Linear",
            Interpolation::Stepwise => "Stepwise",
        }
    }
}

impl FromStr for Interpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Interpolation> {
        match s {
            "Discrete" => Ok(Interpolation::Discrete),
            "Linear" => Ok(Interpolation::Linear),
            "Step" | "Stepwise" => Ok(Interpolation::Stepwise),
            _ => Err(Error::UnsupportedInterpolation(s.to_string())),
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.internal_name())
    }
}

#[cfg(test)]
mod tests {
    use super::Interpolation;

    #[test]
    fn both_dialects_parse() {
        assert_eq!(
            "Step".parse::<Interpolation>().unwrap(),
            "Stepwise".parse::<Interpolation>().unwrap()
        );
        assert!("Cubic".parse::<Interpolation>().is_err());
    }

    #[test]
    fn round_trip() {
        for interpolation in [
            Interpolation::Discrete,
            Interpolation::Linear,
            Interpolation::Stepwise,
        ] {
            assert_eq!(
                interpolation.wire_name().parse::<Interpolation>().unwrap(),
                interpolation
            );
            assert_eq!(
                interpolation.internal_name().parse::<Interpolation>().unwrap(),
                interpolation
            );
        }
    }
}
