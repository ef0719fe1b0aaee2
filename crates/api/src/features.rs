use mf::Link;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const FEATURE_COLLECTION_TYPE: &str = "FeatureCollection";

fn feature_collection_type() -> String {
    FEATURE_COLLECTION_TYPE.to_string()
}

const FEATURE_TYPE: &str = "Feature";

fn feature_type() -> String {
    FEATURE_TYPE.to_string()
}

/// The return value of the items endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default = "feature_collection_type", rename = "type")]
    r#type: String,

    /// A possibly-empty array of features.
    pub features: Vec<Feature>,

    /// The coordinate reference system shared by the features.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crs: Option<Value>,

    /// The temporal reference system shared by the features.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trs: Option<Value>,

    /// The link relations for this collection.
    pub links: Vec<Link>,

    /// When this response was generated, ISO 8601 with millisecond
    /// precision.
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,

    /// The number of features that meet the selection parameters.
    #[serde(rename = "numberMatched")]
    pub number_matched: u64,

    /// The number of features in the features array.
    #[serde(rename = "numberReturned")]
    pub number_returned: u64,
}

impl FeatureCollection {
    /// Creates a new feature collection envelope.
    pub fn new(features: Vec<Feature>, number_matched: u64, time_stamp: String) -> FeatureCollection {
        let number_returned = features.len() as u64;
        FeatureCollection {
            r#type: feature_collection_type(),
            features,
            crs: None,
            trs: None,
            links: Vec::new(),
            time_stamp,
            number_matched,
            number_returned,
        }
    }
}

/// One moving feature on the wire.
#[derive(Debug, Serialize, Deserialize)]
pub struct Feature {
    /// The feature id.
    pub id: String,

    #[serde(default = "feature_type", rename = "type")]
    r#type: String,

    /// The optional static GeoJSON geometry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,

    /// The free-form property document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,

    /// The feature's spatial extent, 4 or 6 components.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,

    /// The feature's temporal extent, two `Z`-suffixed instants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<[String; 2]>,

    /// The feature's coordinate reference system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crs: Option<Value>,

    /// The feature's temporal reference system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trs: Option<Value>,

    /// The feature's trajectory, included when a sub-trajectory was
    /// requested.
    #[serde(rename = "temporalGeometry", skip_serializing_if = "Option::is_none")]
    pub temporal_geometry: Option<Value>,
}

impl Feature {
    /// Creates a new, empty feature with the given id.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf_api::Feature;
    /// let feature = Feature::new("an-id");
    /// assert_eq!(feature.id, "an-id");
    /// ```
    pub fn new(id: impl ToString) -> Feature {
        Feature {
            id: id.to_string(),
            r#type: feature_type(),
            geometry: None,
            properties: None,
            bbox: None,
            time: None,
            crs: None,
            trs: None,
            temporal_geometry: None,
        }
    }
}
