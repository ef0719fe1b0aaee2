use crate::{Error, Period, Result, Stbox, TemporalGeometry, datetime};
use serde_json::{Map, Value};

/// One moving entity within a collection.
#[derive(Debug, Clone)]
pub struct MovingFeature {
    /// The feature id.
    pub id: String,

    /// The id of the owning collection.
    pub collection: String,

    /// An optional static GeoJSON geometry.
    pub geometry: Option<geojson::Geometry>,

    /// The free-form property document.
    pub properties: Map<String, Value>,

    /// The feature's lifespan, when declared.
    pub lifespan: Option<Period>,

    /// The aggregated extent of the feature's temporal geometries, when it
    /// has any.
    pub extent: Option<Stbox>,

    /// The feature's trajectories, populated only when a sub-trajectory
    /// selection asked for them.
    pub trajectories: Vec<TemporalGeometry>,
}

/// A submitted moving-feature payload, dissected for ingestion.
///
/// Splitting pulls the nested temporal members and the statically-typed
/// members out of the document; whatever remains is the feature's residual
/// property document.
#[derive(Debug, Clone, Default)]
pub struct FeatureParts {
    /// The static GeoJSON geometry, when submitted.
    pub geometry: Option<geojson::Geometry>,

    /// The lifespan, when the payload carried a two-element `time` array.
    pub lifespan: Option<Period>,

    /// The residual property document.
    pub properties: Map<String, Value>,

    /// The submitted temporal geometries, one MF-JSON object each.
    pub temporal_geometries: Vec<Value>,

    /// The submitted `temporalProperties` entries.
    pub temporal_properties: Vec<Value>,
}

impl FeatureParts {
    /// Splits a submitted MF-JSON feature.
    ///
    /// A bare object and a one-element array are both accepted for the
    /// temporal members, so a single trajectory does not need wrapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf::FeatureParts;
    /// use serde_json::json;
    ///
    /// let parts = FeatureParts::split(json!({
    ///     "type": "Feature",
    ///     "temporalGeometry": {
    ///         "type": "MovingPoint",
    ///         "datetimes": ["2011-07-14T22:01:01Z"],
    ///         "coordinates": [[139.757083, 35.627701]],
    ///     },
    ///     "properties": {"name": "car1"},
    /// })).unwrap();
    /// assert_eq!(parts.temporal_geometries.len(), 1);
    /// assert_eq!(parts.properties["name"], "car1");
    /// ```
    pub fn split(payload: Value) -> Result<FeatureParts> {
        let Value::Object(mut object) = payload else {
            return Err(Error::NotAnObject);
        };
        let temporal_geometries = object
            .remove("temporalGeometry")
            .map(one_or_many)
            .unwrap_or_default();
        let temporal_properties = object
            .remove("temporalProperties")
            .map(one_or_many)
            .unwrap_or_default();
        let geometry = object
            .remove("geometry")
            .map(|geometry| serde_json::from_value(geometry).map_err(Error::from))
            .transpose()?;
        let lifespan = object
            .remove("time")
            .map(|time| lifespan(&time))
            .transpose()?;
        let _ = object.remove("type");
        // A payload that nests everything else under "properties" is
        // flattened so the residual document is the property document.
        let properties = match object.remove("properties") {
            Some(Value::Object(properties)) if object.is_empty() => properties,
            Some(properties) => {
                let _ = object.insert("properties".to_string(), properties);
                object
            }
            None => object,
        };
        Ok(FeatureParts {
            geometry,
            lifespan,
            properties,
            temporal_geometries,
            temporal_properties,
        })
    }
}

fn one_or_many(value: Value) -> Vec<Value> {
    match value {
        Value::Array(values) => values,
        value => vec![value],
    }
}

fn lifespan(time: &Value) -> Result<Period> {
    let interval = time
        .as_array()
        .filter(|interval| interval.len() == 2)
        .ok_or_else(|| Error::InvalidInstant(time.to_string()))?;
    Period::new(
        datetime::parse_value(&interval[0])?,
        datetime::parse_value(&interval[1])?,
    )
}

#[cfg(test)]
mod tests {
    use super::FeatureParts;
    use serde_json::json;

    #[test]
    fn split_full_payload() {
        let parts = FeatureParts::split(json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [139.757083, 35.627701]},
            "time": ["2011-07-14T22:01:01Z", "2011-07-15T01:11:22Z"],
            "temporalGeometry": [
                {
                    "type": "MovingPoint",
                    "datetimes": ["2011-07-14T22:01:01Z"],
                    "coordinates": [[139.757083, 35.627701]],
                },
            ],
            "temporalProperties": {
                "datetimes": ["2011-07-14T22:01:01Z"],
                "speed": {"values": [1.0], "interpolation": "Linear"},
            },
            "properties": {"name": "car1"},
        }))
        .unwrap();
        assert!(parts.geometry.is_some());
        assert!(parts.lifespan.is_some());
        assert_eq!(parts.temporal_geometries.len(), 1);
        assert_eq!(parts.temporal_properties.len(), 1);
        assert_eq!(parts.properties["name"], "car1");
    }

    #[test]
    fn split_rejects_non_object() {
        assert!(FeatureParts::split(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn split_rejects_bad_lifespan() {
        assert!(
            FeatureParts::split(json!({
                "type": "Feature",
                "time": ["2011-07-15T01:11:22Z", "2011-07-14T22:01:01Z"],
            }))
            .is_err()
        );
    }

    #[test]
    fn residual_keeps_extra_members() {
        let parts = FeatureParts::split(json!({
            "type": "Feature",
            "properties": {"name": "car1"},
            "crs": {"type": "Name", "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}},
        }))
        .unwrap();
        assert!(parts.properties.contains_key("properties"));
        assert!(parts.properties.contains_key("crs"));
    }
}
