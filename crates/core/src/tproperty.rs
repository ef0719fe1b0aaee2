//! Temporal properties: named streams of time-indexed scalar or text values.

use crate::{Error, Interpolation, Period, Result, datetime};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;

/// The internal type tag for numeric sequences.
pub const MOVING_FLOAT: &str = "MovingFloat";

/// The internal type tag for text sequences.
pub const MOVING_TEXT: &str = "MovingText";

/// The values of one sequence, homogeneous by construction.
///
/// A sequence whose submitted values are all numeric becomes a float
/// stream; anything else becomes a text stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceValues {
    /// A numeric stream.
    Float(Vec<f64>),

    /// A text stream.
    Text(Vec<String>),
}

impl SequenceValues {
    fn from_values(values: &[Value]) -> SequenceValues {
        if values.iter().all(Value::is_number) {
            SequenceValues::Float(values.iter().filter_map(Value::as_f64).collect())
        } else {
            SequenceValues::Text(
                values
                    .iter()
                    .map(|value| match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            )
        }
    }

    fn len(&self) -> usize {
        match self {
            SequenceValues::Float(values) => values.len(),
            SequenceValues::Text(values) => values.len(),
        }
    }

    fn get(&self, index: usize) -> Value {
        match self {
            SequenceValues::Float(values) => json!(values[index]),
            SequenceValues::Text(values) => json!(values[index]),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            SequenceValues::Float(values) => json!(values),
            SequenceValues::Text(values) => json!(values),
        }
    }
}

/// One contiguous `(datetimes, values, interpolation)` segment of a
/// temporal property.
///
/// Invariants mirror [TemporalGeometry](crate::TemporalGeometry): at least
/// one sample, one value per datetime, strictly ascending datetimes.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSequence {
    /// The sample instants, strictly ascending.
    pub datetimes: Vec<DateTime<Utc>>,

    /// One value per instant.
    pub values: SequenceValues,

    /// How the stream behaves between samples.
    pub interpolation: Interpolation,

    /// Whether the first instant is included.
    pub lower_inc: bool,

    /// Whether the last instant is included.
    pub upper_inc: bool,
}

impl ValueSequence {
    /// Builds a sequence from the dissected members of a wire payload.
    pub fn from_parts(datetimes: &Value, values: &Value, interpolation: &Value) -> Result<ValueSequence> {
        let datetimes = datetimes
            .as_array()
            .ok_or_else(|| Error::MissingMember("datetimes".to_string()))?
            .iter()
            .map(datetime::parse_value)
            .collect::<Result<Vec<_>>>()?;
        let values = values
            .as_array()
            .ok_or_else(|| Error::MissingMember("values".to_string()))?;
        let interpolation = match interpolation {
            Value::String(name) => name.parse()?,
            Value::Null => Interpolation::default(),
            other => return Err(Error::UnsupportedInterpolation(other.to_string())),
        };
        let sequence = ValueSequence {
            datetimes,
            values: SequenceValues::from_values(values),
            interpolation,
            lower_inc: true,
            upper_inc: true,
        };
        sequence.validate()
    }

    /// Parses a sequence from an MF-JSON object in either dialect.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// let sequence = mf::ValueSequence::from_mfjson(&json!({
    ///     "datetimes": ["2011-07-14T22:01:01Z", "2011-07-14T23:01:01Z"],
    ///     "values": [1.0, 2.5],
    ///     "interpolation": "Linear",
    /// })).unwrap();
    /// assert_eq!(sequence.type_name(), "MovingFloat");
    /// ```
    pub fn from_mfjson(value: &Value) -> Result<ValueSequence> {
        let object = value.as_object().ok_or(Error::NotAnObject)?;
        let interpolation = if let Some(interpolations) =
            object.get("interpolations").and_then(Value::as_array)
        {
            interpolations.first().cloned().unwrap_or(Value::Null)
        } else {
            object.get("interpolation").cloned().unwrap_or(Value::Null)
        };
        let mut sequence = ValueSequence::from_parts(
            object
                .get("datetimes")
                .ok_or_else(|| Error::MissingMember("datetimes".to_string()))?,
            object
                .get("values")
                .ok_or_else(|| Error::MissingMember("values".to_string()))?,
            &interpolation,
        )?;
        if let Some(lower_inc) = object.get("lower_inc").and_then(Value::as_bool) {
            sequence.lower_inc = lower_inc;
        }
        if let Some(upper_inc) = object.get("upper_inc").and_then(Value::as_bool) {
            sequence.upper_inc = upper_inc;
        }
        Ok(sequence)
    }

    fn validate(self) -> Result<ValueSequence> {
        if self.datetimes.is_empty() {
            return Err(Error::EmptySequence);
        }
        if self.datetimes.len() != self.values.len() {
            return Err(Error::LengthMismatch("values"));
        }
        if self.datetimes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::NotAscending);
        }
        Ok(self)
    }

    /// Returns the internal type tag, `MovingFloat` or `MovingText`.
    pub fn type_name(&self) -> &'static str {
        match self.values {
            SequenceValues::Float(_) => MOVING_FLOAT,
            SequenceValues::Text(_) => MOVING_TEXT,
        }
    }

    /// Returns the period spanned by this sequence.
    pub fn period(&self) -> Period {
        Period {
            lower: self.datetimes[0],
            upper: self.datetimes[self.datetimes.len() - 1],
        }
    }

    /// Restricts this sequence to the samples inside the period.
    ///
    /// Returns `None` when no sample falls inside the period.
    pub fn at_period(&self, period: &Period) -> Option<ValueSequence> {
        self.restrict(|instant| period.contains(instant))
    }

    /// Restricts this sequence to the samples at the given instants.
    ///
    /// Returns `None` when no sample matches.
    pub fn at_timestamps(&self, instants: &[DateTime<Utc>]) -> Option<ValueSequence> {
        let instants: BTreeSet<_> = instants.iter().copied().collect();
        self.restrict(|instant| instants.contains(&instant))
    }

    fn restrict<F>(&self, keep: F) -> Option<ValueSequence>
    where
        F: Fn(DateTime<Utc>) -> bool,
    {
        let indices: Vec<_> = self
            .datetimes
            .iter()
            .enumerate()
            .filter(|(_, datetime)| keep(**datetime))
            .map(|(index, _)| index)
            .collect();
        if indices.is_empty() {
            return None;
        }
        let values = match &self.values {
            SequenceValues::Float(values) => {
                SequenceValues::Float(indices.iter().map(|index| values[*index]).collect())
            }
            SequenceValues::Text(values) => {
                SequenceValues::Text(indices.iter().map(|index| values[*index].clone()).collect())
            }
        };
        Some(ValueSequence {
            datetimes: indices.iter().map(|index| self.datetimes[*index]).collect(),
            values,
            ..self.clone()
        })
    }

    /// Renders this sequence in the wire dialect.
    pub fn to_wire(&self) -> Value {
        json!({
            "datetimes": self
                .datetimes
                .iter()
                .map(|instant| Value::String(datetime::format_wire(*instant)))
                .collect::<Vec<_>>(),
            "values": self.values.to_json(),
            "interpolation": self.interpolation.wire_name(),
        })
    }

    /// Renders this sequence in the internal dialect the store's MF-JSON
    /// constructor accepts.
    pub fn to_internal(&self) -> Value {
        json!({
            "type": self.type_name(),
            "datetimes": self
                .datetimes
                .iter()
                .map(|instant| Value::String(datetime::format_naive_iso(*instant)))
                .collect::<Vec<_>>(),
            "values": self.values.to_json(),
            "interpolations": [self.interpolation.internal_name()],
            "lower_inc": self.lower_inc,
            "upper_inc": self.upper_inc,
        })
    }

    /// Returns the value at a sample index as JSON.
    pub fn value_at(&self, index: usize) -> Value {
        self.values.get(index)
    }
}

/// One named member of a `temporalProperties` entry: its residual
/// descriptor document plus, when the member carried `values` and
/// `interpolation`, the parsed sequence.
#[derive(Debug, Clone)]
pub struct PropertySequence {
    /// The property name.
    pub name: String,

    /// The descriptor: every member except `values` and `interpolation`.
    pub descriptor: Map<String, Value>,

    /// The parsed value sequence, when one was submitted.
    pub sequence: Option<ValueSequence>,
}

/// Splits one `temporalProperties` entry into its named sequences.
///
/// An entry is an object with a shared `datetimes` array and one member
/// per property name; members carrying `values` and `interpolation`
/// produce sequences over the shared datetimes.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// let sequences = mf::split_properties_entry(&json!({
///     "datetimes": ["2011-07-14T22:01:01Z", "2011-07-14T23:01:01Z"],
///     "speed": {
///         "type": "Measure",
///         "form": "KMH",
///         "values": [55.0, 62.0],
///         "interpolation": "Linear",
///     },
/// })).unwrap();
/// assert_eq!(sequences.len(), 1);
/// assert_eq!(sequences[0].name, "speed");
/// assert!(sequences[0].sequence.is_some());
/// ```
pub fn split_properties_entry(entry: &Value) -> Result<Vec<PropertySequence>> {
    let object = entry.as_object().ok_or(Error::NotAnObject)?;
    let datetimes = object
        .get("datetimes")
        .ok_or_else(|| Error::MissingMember("datetimes".to_string()))?;
    let mut sequences = Vec::new();
    for (name, member) in object {
        if name == "datetimes" {
            continue;
        }
        let Some(member) = member.as_object() else {
            continue;
        };
        let mut descriptor = member.clone();
        let values = descriptor.remove("values");
        let interpolation = descriptor.remove("interpolation").unwrap_or(Value::Null);
        let sequence = values
            .map(|values| ValueSequence::from_parts(datetimes, &values, &interpolation))
            .transpose()?;
        sequences.push(PropertySequence {
            name: name.clone(),
            descriptor,
            sequence,
        });
    }
    Ok(sequences)
}
