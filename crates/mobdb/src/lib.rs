//! Rust interface for a [MobilityDB](https://mobilitydb.com/) moving-features
//! store.
//!
//! The store keeps collections, moving features, temporal geometries, and
//! temporal property value sequences in the relational schema shipped in
//! `sql/mf.sql`. This crate composes the parametric queries against it:
//! spatiotemporal predicates (`stbox` intersection, `period` overlap),
//! sub-sequence presentation (`atperiod`, `attimestampset`), two-pass
//! pagination, writes, and child-first cascading deletes.
//!
//! Every request-derived value is bound as a `$n` parameter; the SQL text
//! contains only compile-time identifiers.

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

mod client;
mod error;
mod sql;

pub use {client::Client, error::Error};

/// A crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;
