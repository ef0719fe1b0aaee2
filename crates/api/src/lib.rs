//! Rust implementation of the [OGC API — Moving
//! Features](https://docs.ogc.org/is/22-003r3/22-003r3.html) specification.
//!
//! This crate **is**:
//!
//! - Query-parameter types and their validation
//! - Response envelope data structures
//!
//! This crate **is not**:
//!
//! - A server implementation
//!
//! For a moving-features server built on this crate, see the sibling
//! `mf-server` crate.
//!
//! Each GET endpoint deserializes its raw query parameters into
//! [GetParams], then converts them into the validated [Params]:
//!
//! ```
//! use mf_api::{GetParams, Params};
//!
//! let get_params = GetParams {
//!     bbox: Some("139.7,35.6,139.8,35.7".to_string()),
//!     ..Default::default()
//! };
//! let params = Params::try_from(get_params).and_then(Params::valid).unwrap();
//! assert!(params.bbox.is_some());
//! ```

#![deny(
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    missing_debug_implementations,
    non_ascii_idents,
    noop_method_call,
    trivial_casts,
    unsafe_code,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications
)]

mod collections;
mod conformance;
mod datetime_interval;
mod error;
mod features;
mod leaf;
mod params;
mod root;
mod sequences;

pub use {
    collections::Collections,
    conformance::{
        COLLECTIONS_URI, CORE_URI, Conformance, JSON_URI, LANDING_PAGE_URI, MF_COLLECTION_URI,
        MF_COMMON_URI, MOVING_FEATURES_URI, OAS30_URI,
    },
    datetime_interval::DatetimeInterval,
    error::Error,
    features::{Feature, FeatureCollection},
    leaf::Leaf,
    params::{GetParams, MAX_LIMIT, Params},
    root::LandingPage,
    sequences::{GeometrySequence, TemporalProperties, TemporalPropertyValue},
};

/// A crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;
