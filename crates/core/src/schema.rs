//! Structural validation of incoming MF-JSON payloads.
//!
//! These checks only assert that the required members are present and of
//! the right shape; value-level validation (instants, ordering, lengths)
//! happens when the payload is parsed into its typed form.

use crate::{Error, Result};
use serde_json::Value;

/// Validates a moving-feature payload: `type` and `temporalGeometry` are
/// required, `temporalProperties`, `geometry`, `crs`, and `trs` are checked
/// when present.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// assert!(mf::schema::validate_feature(&json!({
///     "type": "Feature",
///     "temporalGeometry": {
///         "type": "MovingPoint",
///         "datetimes": ["2011-07-14T22:01:01Z"],
///         "coordinates": [[139.757083, 35.627701]],
///     },
/// })).is_ok());
/// assert!(mf::schema::validate_feature(&json!({"type": "Feature"})).is_err());
/// ```
pub fn validate_feature(value: &Value) -> Result<()> {
    let object = value.as_object().ok_or(Error::NotAnObject)?;
    require(value, "type")?;
    validate_temporal_geometry(require(value, "temporalGeometry")?)?;
    if let Some(properties) = object.get("temporalProperties") {
        validate_temporal_properties(properties)?;
    }
    if let Some(geometry) = object.get("geometry") {
        validate_geometry(geometry)?;
    }
    for key in ["crs", "trs"] {
        if let Some(value) = object.get(key) {
            validate_crs(value)?;
        }
    }
    Ok(())
}

/// Validates a temporal geometry: either a single prism with `type`,
/// `datetimes`, and `coordinates`, or a collection whose every prism
/// satisfies the single-prism schema. An array of geometries is accepted
/// and validated element-wise.
pub fn validate_temporal_geometry(value: &Value) -> Result<()> {
    if let Some(values) = value.as_array() {
        for value in values {
            validate_temporal_geometry(value)?;
        }
        return Ok(());
    }
    let object = value.as_object().ok_or(Error::NotAnObject)?;
    require(value, "type")?;
    if let Some(prisms) = object.get("prisms") {
        for prism in prisms.as_array().ok_or(Error::NotAnObject)? {
            require(prism, "type")?;
            require(prism, "datetimes")?;
            require(prism, "coordinates")?;
        }
    } else {
        require(value, "datetimes")?;
        require(value, "coordinates")?;
    }
    Ok(())
}

/// Validates a static geometry: `{type, coordinates}`, or a multi geometry
/// `{type, geometries}` whose members each validate.
pub fn validate_geometry(value: &Value) -> Result<()> {
    let object = value.as_object().ok_or(Error::NotAnObject)?;
    require(value, "type")?;
    if let Some(geometries) = object.get("geometries") {
        for geometry in geometries.as_array().ok_or(Error::NotAnObject)? {
            validate_geometry(geometry)?;
        }
        Ok(())
    } else {
        require(value, "coordinates").map(|_| ())
    }
}

/// Validates a `temporalProperties` payload: the envelope
/// `{temporalProperties: [...]}` or a bare entry array; each entry needs
/// `datetimes` and, for every other member, a nested object with `values`
/// and `interpolation`.
pub fn validate_temporal_properties(value: &Value) -> Result<()> {
    let entries = if let Some(entries) = value.as_array() {
        entries
    } else {
        require(value, "temporalProperties")?
            .as_array()
            .ok_or(Error::NotAnObject)?
    };
    for entry in entries {
        let object = entry.as_object().ok_or(Error::NotAnObject)?;
        require(entry, "datetimes")?;
        for (name, member) in object {
            if name == "datetimes" {
                continue;
            }
            require(member, "values")?;
            require(member, "interpolation")?;
        }
    }
    Ok(())
}

/// Validates a temporal value payload: `datetimes`, `values`, and
/// `interpolation` are all required.
pub fn validate_temporal_value(value: &Value) -> Result<()> {
    require(value, "datetimes")?;
    require(value, "values")?;
    require(value, "interpolation").map(|_| ())
}

/// Validates a CRS or TRS object: `type` and `properties` are required.
pub fn validate_crs(value: &Value) -> Result<()> {
    require(value, "type")?;
    require(value, "properties").map(|_| ())
}

fn require<'a>(value: &'a Value, key: &str) -> Result<&'a Value> {
    value
        .as_object()
        .ok_or(Error::NotAnObject)?
        .get(key)
        .ok_or_else(|| Error::MissingMember(key.to_string()))
}
