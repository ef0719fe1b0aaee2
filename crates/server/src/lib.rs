//! An [OGC API — Moving
//! Features](https://docs.ogc.org/is/22-003r3/22-003r3.html) server written
//! in Rust.
//!
//! The server exposes collections of moving features, their temporal
//! geometries, and their temporal properties over HTTP, persisting them
//! through a pluggable [Backend]: an in-process [MemoryBackend] for tests
//! and toy servers, or (behind the `mobilitydb` feature) a
//! [MobilitydbBackend] over a MobilityDB store.

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

mod api;
mod backend;
mod config;
mod error;
#[cfg(feature = "axum")]
pub mod exception;
mod negotiation;
#[cfg(feature = "axum")]
pub mod routes;

pub use api::Api;
#[cfg(feature = "mobilitydb")]
pub use backend::MobilitydbBackend;
pub use backend::{Backend, MemoryBackend};
pub use config::{Bind, Config, Datasource, ServerConfig};
pub use error::Error;
pub use negotiation::{Format, Negotiation};

/// A crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The default API title.
pub const DEFAULT_TITLE: &str = "mf-server";

/// The default API description.
pub const DEFAULT_DESCRIPTION: &str =
    "An OGC API - Moving Features server written in Rust";

/// The default page size.
pub const DEFAULT_LIMIT: u64 = 10;
