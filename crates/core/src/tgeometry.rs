//! Temporal geometries: time-indexed point trajectories.

use crate::{Bbox, Error, Interpolation, Period, Result, Stbox, datetime};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;

/// The wire-dialect temporal geometry type.
pub const MOVING_POINT: &str = "MovingPoint";

/// The internal-dialect temporal geometry type.
pub const MOVING_GEOM_POINT: &str = "MovingGeomPoint";

/// A time-indexed point trajectory.
///
/// The struct holds the internal dialect; [TemporalGeometry::from_mfjson]
/// accepts either dialect and [TemporalGeometry::to_wire] /
/// [TemporalGeometry::to_internal] render them.
///
/// Invariants, enforced on construction: at least one sample, one
/// coordinate per datetime, strictly ascending datetimes, and a consistent
/// coordinate dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalGeometry {
    /// The sample instants, strictly ascending.
    pub datetimes: Vec<DateTime<Utc>>,

    /// One 2D or 3D position per instant.
    pub coordinates: Vec<Vec<f64>>,

    /// How the trajectory behaves between samples.
    pub interpolation: Interpolation,

    /// An optional coordinate reference system object.
    pub crs: Option<Value>,

    /// An optional temporal reference system object.
    pub trs: Option<Value>,

    /// Whether the first instant is included.
    pub lower_inc: bool,

    /// Whether the last instant is included.
    pub upper_inc: bool,
}

impl TemporalGeometry {
    /// Parses a temporal geometry from an MF-JSON object in either dialect.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// let geometry = mf::TemporalGeometry::from_mfjson(&json!({
    ///     "type": "MovingPoint",
    ///     "datetimes": ["2011-07-14T22:01:01Z", "2011-07-14T23:01:01Z"],
    ///     "coordinates": [[139.757083, 35.627701], [139.757399, 35.627701]],
    ///     "interpolation": "Linear",
    /// })).unwrap();
    /// assert_eq!(geometry.coordinates.len(), 2);
    /// ```
    pub fn from_mfjson(value: &Value) -> Result<TemporalGeometry> {
        let object = value.as_object().ok_or(Error::NotAnObject)?;
        let r#type = member(object, "type")?
            .as_str()
            .ok_or_else(|| Error::UnsupportedGeometryType(object["type"].to_string()))?;
        if r#type != MOVING_POINT && r#type != MOVING_GEOM_POINT {
            return Err(Error::UnsupportedGeometryType(r#type.to_string()));
        }
        let datetimes = member(object, "datetimes")?
            .as_array()
            .ok_or(Error::MissingMember("datetimes".to_string()))?
            .iter()
            .map(datetime::parse_value)
            .collect::<Result<Vec<_>>>()?;
        let coordinates = member(object, "coordinates")?
            .as_array()
            .ok_or(Error::MissingMember("coordinates".to_string()))?
            .iter()
            .map(position)
            .collect::<Result<Vec<_>>>()?;
        let geometry = TemporalGeometry {
            datetimes,
            coordinates,
            interpolation: interpolation(object)?,
            crs: object.get("crs").cloned(),
            trs: object.get("trs").cloned(),
            lower_inc: object
                .get("lower_inc")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            upper_inc: object
                .get("upper_inc")
                .and_then(Value::as_bool)
                .unwrap_or(true),
        };
        geometry.validate()
    }

    fn validate(self) -> Result<TemporalGeometry> {
        if self.datetimes.is_empty() {
            return Err(Error::EmptySequence);
        }
        if self.datetimes.len() != self.coordinates.len() {
            return Err(Error::LengthMismatch("coordinates"));
        }
        if self.datetimes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::NotAscending);
        }
        let dimension = self.coordinates[0].len();
        if self
            .coordinates
            .iter()
            .any(|position| position.len() != dimension)
        {
            return Err(Error::InconsistentDimensions);
        }
        Ok(self)
    }

    /// Returns true if the trajectory carries a vertical component.
    pub fn is_three_dimensional(&self) -> bool {
        self.coordinates[0].len() == 3
    }

    /// Returns the period spanned by this trajectory.
    pub fn period(&self) -> Period {
        Period {
            lower: self.datetimes[0],
            upper: self.datetimes[self.datetimes.len() - 1],
        }
    }

    /// Returns the spatiotemporal extent of this trajectory.
    pub fn extent(&self) -> Stbox {
        let mut xmin = f64::INFINITY;
        let mut ymin = f64::INFINITY;
        let mut zmin = f64::INFINITY;
        let mut xmax = f64::NEG_INFINITY;
        let mut ymax = f64::NEG_INFINITY;
        let mut zmax = f64::NEG_INFINITY;
        for position in &self.coordinates {
            xmin = xmin.min(position[0]);
            xmax = xmax.max(position[0]);
            ymin = ymin.min(position[1]);
            ymax = ymax.max(position[1]);
            if let Some(z) = position.get(2) {
                zmin = zmin.min(*z);
                zmax = zmax.max(*z);
            }
        }
        let bbox = if self.is_three_dimensional() {
            Bbox::ThreeDimensional([xmin, ymin, zmin, xmax, ymax, zmax])
        } else {
            Bbox::TwoDimensional([xmin, ymin, xmax, ymax])
        };
        Stbox::new(bbox, self.period())
    }

    /// Restricts this trajectory to the samples inside the period, the pure
    /// counterpart of the store's `atperiod`.
    ///
    /// Returns `None` when no sample falls inside the period.
    pub fn at_period(&self, period: &Period) -> Option<TemporalGeometry> {
        self.restrict(|instant| period.contains(instant))
    }

    /// Restricts this trajectory to the samples at the given instants, the
    /// pure counterpart of the store's `attimestampset`.
    ///
    /// Returns `None` when no sample matches.
    pub fn at_timestamps(&self, instants: &[DateTime<Utc>]) -> Option<TemporalGeometry> {
        let instants: BTreeSet<_> = instants.iter().copied().collect();
        self.restrict(|instant| instants.contains(&instant))
    }

    fn restrict<F>(&self, keep: F) -> Option<TemporalGeometry>
    where
        F: Fn(DateTime<Utc>) -> bool,
    {
        let (datetimes, coordinates): (Vec<_>, Vec<_>) = self
            .datetimes
            .iter()
            .zip(&self.coordinates)
            .filter(|(datetime, _)| keep(**datetime))
            .map(|(datetime, position)| (*datetime, position.clone()))
            .unzip();
        if datetimes.is_empty() {
            None
        } else {
            Some(TemporalGeometry {
                datetimes,
                coordinates,
                ..self.clone()
            })
        }
    }

    /// Renders this trajectory in the wire dialect.
    ///
    /// `MovingPoint`, a singular `interpolation` member, `Z`-suffixed
    /// timestamps, and no inclusivity flags.
    pub fn to_wire(&self) -> Value {
        let mut object = Map::new();
        let _ = object.insert("type".to_string(), MOVING_POINT.into());
        let _ = object.insert(
            "datetimes".to_string(),
            self.datetimes
                .iter()
                .map(|instant| Value::String(datetime::format_wire(*instant)))
                .collect(),
        );
        let _ = object.insert("coordinates".to_string(), json!(self.coordinates));
        let _ = object.insert(
            "interpolation".to_string(),
            self.interpolation.wire_name().into(),
        );
        if let Some(crs) = &self.crs {
            let _ = object.insert("crs".to_string(), crs.clone());
        }
        if let Some(trs) = &self.trs {
            let _ = object.insert("trs".to_string(), trs.clone());
        }
        Value::Object(object)
    }

    /// Renders this trajectory in the internal dialect.
    ///
    /// `MovingGeomPoint`, an `interpolations` array, naive timestamps, and
    /// explicit inclusivity flags: the form the store's MF-JSON constructor
    /// accepts.
    pub fn to_internal(&self) -> Value {
        json!({
            "type": MOVING_GEOM_POINT,
            "datetimes": self
                .datetimes
                .iter()
                .map(|instant| Value::String(datetime::format_naive_iso(*instant)))
                .collect::<Vec<_>>(),
            "coordinates": self.coordinates,
            "interpolations": [self.interpolation.internal_name()],
            "lower_inc": self.lower_inc,
            "upper_inc": self.upper_inc,
        })
    }
}

fn member<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    object
        .get(key)
        .ok_or_else(|| Error::MissingMember(key.to_string()))
}

fn position(value: &Value) -> Result<Vec<f64>> {
    let coordinates: Vec<f64> = value
        .as_array()
        .map(|values| values.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default();
    if (coordinates.len() == 2 || coordinates.len() == 3)
        && value.as_array().map(Vec::len) == Some(coordinates.len())
    {
        Ok(coordinates)
    } else {
        Err(Error::InvalidPosition(value.clone()))
    }
}

fn interpolation(object: &Map<String, Value>) -> Result<Interpolation> {
    let name = if let Some(interpolations) = object.get("interpolations") {
        interpolations.as_array().and_then(|values| values.first())
    } else {
        object.get("interpolation")
    };
    match name {
        Some(Value::String(name)) => name.parse(),
        Some(other) => Err(Error::UnsupportedInterpolation(other.to_string())),
        None => Ok(Interpolation::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::TemporalGeometry;
    use crate::{Bbox, Interpolation, Period, datetime};
    use serde_json::json;

    fn trajectory() -> TemporalGeometry {
        TemporalGeometry::from_mfjson(&json!({
            "type": "MovingPoint",
            "datetimes": [
                "2011-07-14T22:01:01Z",
                "2011-07-14T23:01:01Z",
                "2011-07-15T00:01:01Z",
            ],
            "coordinates": [
                [139.757083, 35.627701],
                [139.757399, 35.627701],
                [139.757555, 35.627688],
            ],
            "interpolation": "Step",
        }))
        .unwrap()
    }

    #[test]
    fn from_mfjson_wire() {
        let geometry = trajectory();
        assert_eq!(geometry.interpolation, Interpolation::Stepwise);
        assert!(geometry.lower_inc);
        assert!(geometry.upper_inc);
        assert!(!geometry.is_three_dimensional());
    }

    #[test]
    fn from_mfjson_internal() {
        let geometry = TemporalGeometry::from_mfjson(&json!({
            "type": "MovingGeomPoint",
            "datetimes": ["2011-07-14T22:01:01", "2011-07-14T23:01:01"],
            "coordinates": [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            "interpolations": ["Stepwise"],
            "lower_inc": false,
            "upper_inc": true,
        }))
        .unwrap();
        assert_eq!(geometry.interpolation, Interpolation::Stepwise);
        assert!(!geometry.lower_inc);
        assert!(geometry.is_three_dimensional());
    }

    #[test]
    fn dialect_round_trip() {
        let geometry = trajectory();
        let wire = geometry.to_wire();
        assert_eq!(wire["type"], "MovingPoint");
        assert_eq!(wire["interpolation"], "Step");
        assert_eq!(wire["datetimes"][0], "2011-07-14T22:01:01Z");
        assert_eq!(TemporalGeometry::from_mfjson(&wire).unwrap(), geometry);

        let internal = geometry.to_internal();
        assert_eq!(internal["type"], "MovingGeomPoint");
        assert_eq!(internal["interpolations"], json!(["Stepwise"]));
        assert_eq!(internal["datetimes"][0], "2011-07-14T22:01:01");
        assert_eq!(TemporalGeometry::from_mfjson(&internal).unwrap(), geometry);
    }

    #[test]
    fn invariants() {
        assert!(
            TemporalGeometry::from_mfjson(&json!({
                "type": "MovingPoint",
                "datetimes": ["2011-07-14T22:01:01Z"],
                "coordinates": [],
            }))
            .is_err()
        );
        assert!(
            TemporalGeometry::from_mfjson(&json!({
                "type": "MovingPoint",
                "datetimes": ["2011-07-14T23:01:01Z", "2011-07-14T22:01:01Z"],
                "coordinates": [[0.0, 0.0], [1.0, 1.0]],
            }))
            .is_err()
        );
        assert!(
            TemporalGeometry::from_mfjson(&json!({
                "type": "LineString",
                "datetimes": ["2011-07-14T22:01:01Z"],
                "coordinates": [[0.0, 0.0]],
            }))
            .is_err()
        );
        assert!(
            TemporalGeometry::from_mfjson(&json!({
                "type": "MovingPoint",
                "datetimes": ["2011-07-14T22:01:01Z", "2011-07-14T23:01:01Z"],
                "coordinates": [[0.0, 0.0], [1.0, 1.0, 1.0]],
            }))
            .is_err()
        );
    }

    #[test]
    fn at_period() {
        let geometry = trajectory();
        let period = Period::new(
            datetime::parse("2011-07-14T22:30:00Z").unwrap(),
            datetime::parse("2011-07-15T01:00:00Z").unwrap(),
        )
        .unwrap();
        let clipped = geometry.at_period(&period).unwrap();
        assert_eq!(clipped.datetimes.len(), 2);
        assert_eq!(clipped.coordinates[0], vec![139.757399, 35.627701]);

        let empty = Period::new(
            datetime::parse("2012-01-01").unwrap(),
            datetime::parse("2012-01-02").unwrap(),
        )
        .unwrap();
        assert!(geometry.at_period(&empty).is_none());
    }

    #[test]
    fn at_timestamps() {
        let geometry = trajectory();
        let sampled = geometry
            .at_timestamps(&[
                datetime::parse("2011-07-14T22:01:01Z").unwrap(),
                datetime::parse("2011-07-15T00:01:01Z").unwrap(),
            ])
            .unwrap();
        assert_eq!(sampled.datetimes.len(), 2);
        assert!(
            geometry
                .at_timestamps(&[datetime::parse("2012-01-01").unwrap()])
                .is_none()
        );
    }

    #[test]
    fn extent() {
        let extent = trajectory().extent();
        assert_eq!(
            extent.bbox,
            Bbox::new(139.757083, 35.627688, 139.757555, 35.627701)
        );
    }
}
