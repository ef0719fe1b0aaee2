use mf::Link;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The return value of the temporal-geometry sequence endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct GeometrySequence {
    /// The wire-rendered temporal geometries, each carrying its id.
    #[serde(rename = "geometrySequence")]
    pub geometry_sequence: Vec<Value>,

    /// The coordinate reference system shared by the sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crs: Option<Value>,

    /// The temporal reference system shared by the sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trs: Option<Value>,

    /// The link relations for this response.
    pub links: Vec<Link>,

    /// When this response was generated.
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,

    /// The number of geometries that meet the selection parameters.
    #[serde(rename = "numberMatched")]
    pub number_matched: u64,

    /// The number of geometries in the sequence array.
    #[serde(rename = "numberReturned")]
    pub number_returned: u64,
}

/// The return value of the temporal-properties list endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct TemporalProperties {
    /// The property summaries; grouped value sequences are attached when
    /// `subTemporalValue` was requested.
    #[serde(rename = "temporalProperties")]
    pub temporal_properties: Vec<Value>,

    /// The link relations for this response.
    pub links: Vec<Link>,

    /// When this response was generated.
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,

    /// The number of properties that meet the selection parameters.
    #[serde(rename = "numberMatched")]
    pub number_matched: u64,

    /// The number of properties in the array.
    #[serde(rename = "numberReturned")]
    pub number_returned: u64,
}

/// The return value of the temporal-property values endpoint: the
/// property's descriptor document with its value sequences attached.
#[derive(Debug, Serialize, Deserialize)]
pub struct TemporalPropertyValue {
    /// The property descriptor members, inlined.
    #[serde(flatten)]
    pub property: Map<String, Value>,

    /// The wire-rendered value sequences.
    #[serde(rename = "valueSequence")]
    pub value_sequence: Vec<Value>,

    /// The link relations for this response.
    pub links: Vec<Link>,

    /// When this response was generated.
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,

    /// The number of sequences that meet the selection parameters.
    #[serde(rename = "numberMatched")]
    pub number_matched: u64,

    /// The number of sequences in the array.
    #[serde(rename = "numberReturned")]
    pub number_returned: u64,
}
