use serde::{Deserialize, Serialize};

/// The OGC API - Common core conformance uri.
pub const CORE_URI: &str = "http://www.opengis.net/spec/ogcapi-common-1/1.0/conf/core";

/// The OGC API - Common landing page conformance uri.
pub const LANDING_PAGE_URI: &str =
    "http://www.opengis.net/spec/ogcapi-common-1/1.0/conf/landing-page";

/// The OGC API - Common JSON conformance uri.
pub const JSON_URI: &str = "http://www.opengis.net/spec/ogcapi-common-1/1.0/conf/json";

/// The OGC API - Common OpenAPI 3.0 conformance uri.
pub const OAS30_URI: &str = "http://www.opengis.net/spec/ogcapi-common-1/1.0/conf/oas30";

/// The OGC API - Common collections conformance uri.
pub const COLLECTIONS_URI: &str =
    "http://www.opengis.net/spec/ogcapi-common-2/1.0/conf/collections";

/// The moving-features common conformance uri.
pub const MF_COMMON_URI: &str =
    "http://www.opengis.net/spec/ogcapi-movingfeatures-1/1.0/conf/common";

/// The moving-features collection conformance uri.
pub const MF_COLLECTION_URI: &str =
    "http://www.opengis.net/spec/ogcapi-movingfeatures-1/1.0/conf/mf-collection";

/// The moving-features conformance uri.
pub const MOVING_FEATURES_URI: &str =
    "http://www.opengis.net/spec/ogcapi-movingfeatures-1/1.0/conf/movingfeatures";

/// To support "generic" clients that want to access multiple OGC API
/// implementations - and not "just" a specific API / server, the server
/// has to declare the conformance classes it implements and conforms to.
#[derive(Debug, Serialize, Deserialize)]
pub struct Conformance {
    /// The conformance classes it implements and conforms to.
    #[serde(rename = "conformsTo")]
    pub conforms_to: Vec<String>,
}

impl Conformance {
    /// Creates a new conformance structure with the common conformance
    /// classes.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf_api::Conformance;
    /// let conformance = Conformance::new();
    /// ```
    pub fn new() -> Conformance {
        Conformance {
            conforms_to: vec![
                CORE_URI.to_string(),
                LANDING_PAGE_URI.to_string(),
                JSON_URI.to_string(),
                OAS30_URI.to_string(),
                COLLECTIONS_URI.to_string(),
            ],
        }
    }

    /// Adds the moving-features conformance classes.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf_api::Conformance;
    /// let conformance = Conformance::new().moving_features();
    /// ```
    pub fn moving_features(mut self) -> Conformance {
        self.conforms_to.push(MF_COMMON_URI.to_string());
        self.conforms_to.push(MF_COLLECTION_URI.to_string());
        self.conforms_to.push(MOVING_FEATURES_URI.to_string());
        self
    }
}

impl Default for Conformance {
    fn default() -> Self {
        Self::new()
    }
}
