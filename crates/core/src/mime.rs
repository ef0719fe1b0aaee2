//! Media types used by the moving-features API surface.

/// JSON, the default response format.
pub const APPLICATION_JSON: &str = "application/json";

/// JSON-LD.
pub const APPLICATION_LD_JSON: &str = "application/ld+json";

/// HTML.
pub const TEXT_HTML: &str = "text/html";

/// OpenAPI 3.0 documents.
pub const APPLICATION_OPENAPI_3_0: &str = "application/vnd.oai.openapi+json;version=3.0";
