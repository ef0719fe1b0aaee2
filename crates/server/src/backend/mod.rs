mod memory;
#[cfg(feature = "mobilitydb")]
mod mobilitydb;

use crate::Result;
pub use memory::MemoryBackend;
use mf::{
    Collection, FeatureParts, MovingFeature, Page, PropertySequence, TemporalGeometry,
    ValueSequence,
};
use mf_api::Params;
#[cfg(feature = "mobilitydb")]
pub use mobilitydb::MobilitydbBackend;
use serde_json::{Map, Value};
use std::future::Future;

/// Storage backend for a moving-features API.
///
/// Backends answer the spatiotemporal selections the controllers build
/// from request parameters, and own identifier generation for every
/// resource they store. Mutations are per-statement atomic only:
/// [Backend::add_feature] writes the feature and its nested temporal
/// members one statement at a time, and a mid-compound failure leaves the
/// rows already written in place.
pub trait Backend: Clone + Send + Sync + 'static {
    /// Returns the collections with their aggregated extents, restricted
    /// and paged by the parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf_server::{Backend, MemoryBackend};
    /// use mf_api::Params;
    /// # tokio_test::block_on(async {
    /// let backend = MemoryBackend::new();
    /// let page = backend.collections(&Params::default()).await.unwrap();
    /// assert!(page.items.is_empty());
    /// # })
    /// ```
    fn collections(&self, params: &Params) -> impl Future<Output = Result<Page<Collection>>> + Send;

    /// Returns a single collection, or `None` if the id is unknown.
    fn collection(&self, id: &str) -> impl Future<Output = Result<Option<Collection>>> + Send;

    /// Adds a collection with the given descriptor document, returning the
    /// generated id.
    fn add_collection(
        &mut self,
        property: Map<String, Value>,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Replaces a collection's descriptor document. Returns false if the
    /// id is unknown.
    fn update_collection(
        &mut self,
        id: &str,
        property: Map<String, Value>,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Deletes a collection and, strictly child-first, everything it
    /// contains. Returns false if the id is unknown.
    fn delete_collection(&mut self, id: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Returns a collection's features, or `None` if the collection is
    /// unknown.
    ///
    /// With `subTrajectory=true` and a `datetime`, each returned feature
    /// carries its trajectories clipped to the interval.
    fn features(
        &self,
        collection_id: &str,
        params: &Params,
    ) -> impl Future<Output = Result<Option<Page<MovingFeature>>>> + Send;

    /// Returns a single feature, or `None` if either id is unknown.
    fn feature(
        &self,
        collection_id: &str,
        feature_id: &str,
    ) -> impl Future<Output = Result<Option<MovingFeature>>> + Send;

    /// Adds a moving feature and its nested temporal members, returning
    /// the generated id, or `None` if the collection is unknown.
    fn add_feature(
        &mut self,
        collection_id: &str,
        parts: FeatureParts,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Deletes a feature and its temporal members. Returns false if either
    /// id is unknown.
    fn delete_feature(
        &mut self,
        collection_id: &str,
        feature_id: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Returns a feature's temporal geometries with their ids, or `None`
    /// if either id is unknown.
    ///
    /// Presentation follows the parameters: raw, sampled at `leaf`, or
    /// clipped to `datetime` when `subTrajectory=true`.
    fn temporal_geometries(
        &self,
        collection_id: &str,
        feature_id: &str,
        params: &Params,
    ) -> impl Future<Output = Result<Option<Page<(String, TemporalGeometry)>>>> + Send;

    /// Adds a temporal geometry, returning the generated id, or `None` if
    /// either id is unknown.
    fn add_temporal_geometry(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        geometry: TemporalGeometry,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Deletes a temporal geometry. Returns false if any id is unknown.
    fn delete_temporal_geometry(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        geometry_id: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Returns a feature's temporal property summaries, or `None` if
    /// either id is unknown.
    ///
    /// With `subTemporalValue=true`, each summary carries its value
    /// sequences, grouped by `datetime_group`.
    fn temporal_properties(
        &self,
        collection_id: &str,
        feature_id: &str,
        params: &Params,
    ) -> impl Future<Output = Result<Option<Page<Value>>>> + Send;

    /// Adds a batch of co-submitted property sequences, returning the
    /// property names written, or `None` if either id is unknown.
    ///
    /// Fails with [Error::OverlappingSequence](crate::Error) when a
    /// submitted sequence intersects an existing one for the same name.
    fn add_temporal_properties(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        sequences: Vec<PropertySequence>,
    ) -> impl Future<Output = Result<Option<Vec<String>>>> + Send;

    /// Returns a property's value sequences as
    /// `(id, datetime_group, sequence)` rows, or `None` if the property is
    /// unknown.
    fn temporal_property_values(
        &self,
        collection_id: &str,
        feature_id: &str,
        name: &str,
        params: &Params,
    ) -> impl Future<Output = Result<Option<Page<(String, i32, ValueSequence)>>>> + Send;

    /// Appends a value sequence to an existing property, returning the
    /// generated id, or `None` if the property is unknown.
    ///
    /// Fails with [Error::OverlappingSequence](crate::Error) when the
    /// sequence intersects an existing one.
    fn add_temporal_value(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        name: &str,
        sequence: ValueSequence,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Deletes a temporal property and its value sequences. Returns false
    /// if any id is unknown.
    fn delete_temporal_property(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        name: &str,
    ) -> impl Future<Output = Result<bool>> + Send;
}
