//! OGC-style problem objects.
//!
//! Every error leaves the server as `{code, description}` JSON with the
//! HTTP status carried alongside.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// A malformed parameter, body, or format token.
pub const INVALID_PARAMETER_VALUE: &str = "InvalidParameterValue";

/// An absent required body or a missing MF-JSON required member.
pub const MISSING_PARAMETER_VALUE: &str = "MissingParameterValue";

/// An unknown collection, feature, or property name.
pub const NOT_FOUND: &str = "NotFound";

/// A storage failure, propagated verbatim.
pub const CONNECTING_ERROR: &str = "ConnectingError";

/// An OGC-style problem object.
#[derive(Debug, Serialize)]
pub struct Exception {
    /// The exception code.
    pub code: String,

    /// A human readable description.
    pub description: String,
}

impl Exception {
    /// Creates a new exception.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf_server::exception::{Exception, NOT_FOUND};
    /// let exception = Exception::new(NOT_FOUND, "no collection with id='foo'");
    /// ```
    pub fn new(code: impl ToString, description: impl ToString) -> Exception {
        Exception {
            code: code.to_string(),
            description: description.to_string(),
        }
    }
}

/// Builds the response for an exception.
pub fn response(status: StatusCode, code: &str, description: impl ToString) -> Response {
    (status, Json(Exception::new(code, description))).into_response()
}
