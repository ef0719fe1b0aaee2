//! Rust implementation of the [MF-JSON](https://docs.ogc.org/is/19-045r3/19-045r3.html)
//! moving-features data model.
//!
//! A *moving feature* is an entity whose geometry and/or properties vary with
//! time. This crate provides the temporal data structures shared by the rest
//! of the workspace:
//!
//! - [TemporalGeometry] is a time-indexed point trajectory
//! - [ValueSequence] is one contiguous segment of a time-indexed scalar or
//!   text attribute stream
//! - [Collection] and [MovingFeature] are the containers above them
//!
//! The wire dialect (`MovingPoint`, `interpolation: "Step"`, `Z`-suffixed
//! timestamps) and the internal dialect (`MovingGeomPoint`,
//! `interpolations: ["Stepwise"]`, naive timestamps) differ in a handful of
//! spellings; the mapping is centralized in [Interpolation] and the
//! [datetime] module so every producer and consumer agrees.
//!
//! Each temporal structure carries the pure forms of the store's sequence
//! operations (`at_period`, `at_timestamps`, `extent`), so non-database
//! backends can honor the same query semantics.

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

mod bbox;
mod collection;
pub mod datetime;
mod error;
mod feature;
mod interpolation;
mod link;
pub mod mime;
mod page;
mod period;
pub mod schema;
mod stbox;
mod tgeometry;
mod tproperty;

pub use {
    bbox::Bbox,
    collection::{Collection, Extent},
    error::Error,
    feature::{FeatureParts, MovingFeature},
    interpolation::Interpolation,
    link::Link,
    page::Page,
    period::Period,
    stbox::Stbox,
    tgeometry::{MOVING_GEOM_POINT, MOVING_POINT, TemporalGeometry},
    tproperty::{
        MOVING_FLOAT, MOVING_TEXT, PropertySequence, SequenceValues, ValueSequence,
        split_properties_entry,
    },
};

/// A crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The default coordinate reference system for moving features.
pub const DEFAULT_CRS: &str = "urn:ogc:def:crs:OGC:1.3:CRS84";

/// The default temporal reference system for moving features.
pub const DEFAULT_TRS: &str = "urn:ogc:data:time:iso8601";
