use mf::Link;
use serde::{Deserialize, Serialize};

/// The landing page of a moving-features API.
#[derive(Debug, Serialize, Deserialize)]
pub struct LandingPage {
    /// The title of this API.
    pub title: String,

    /// The text description of this API.
    pub description: String,

    /// The link relations: self, the OpenAPI document, the conformance
    /// declaration, and the collections.
    pub links: Vec<Link>,
}
