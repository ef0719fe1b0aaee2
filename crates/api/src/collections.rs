use mf::Link;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Object containing an array of collections and an array of links.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Collections {
    /// The wire-rendered collection objects.
    pub collections: Vec<Value>,

    /// The link relations.
    pub links: Vec<Link>,
}

impl From<Vec<Value>> for Collections {
    fn from(collections: Vec<Value>) -> Collections {
        Collections {
            collections,
            links: Vec::new(),
        }
    }
}
