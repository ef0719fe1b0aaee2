use crate::{Backend, DEFAULT_DESCRIPTION, DEFAULT_LIMIT, DEFAULT_TITLE, Result};
use chrono::{SecondsFormat, Utc};
use mf::{
    DEFAULT_CRS, DEFAULT_TRS, FeatureParts, Link, MovingFeature, TemporalGeometry, ValueSequence,
    mime::APPLICATION_OPENAPI_3_0, split_properties_entry,
};
use mf_api::{
    Collections, Conformance, Feature, FeatureCollection, GeometrySequence, GetParams, LandingPage,
    MAX_LIMIT, Params, TemporalProperties, TemporalPropertyValue,
};
use serde_json::{Map, Value, json};
use url::Url;

/// A moving-features server API.
///
/// One controller per resource kind: each validates referenced
/// identifiers through the backend, invokes the backend's query, and
/// assembles the MF-JSON envelope with links, `timeStamp`, counts, and
/// reference-system defaults.
#[derive(Clone, Debug)]
pub struct Api<B: Backend> {
    /// The backend storage for this API.
    pub backend: B,

    /// The title of this API.
    pub title: String,

    /// The text description of this API.
    pub description: String,

    /// The root url of this API.
    pub root: Url,

    /// The default page size.
    pub limit: u64,

    /// The supported locales, most preferred first.
    pub locales: Vec<String>,
}

impl<B: Backend> Api<B> {
    /// Creates a new API with the given backend.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf_server::{Api, MemoryBackend};
    ///
    /// let api = Api::new(MemoryBackend::new(), "http://mf.test").unwrap();
    /// ```
    pub fn new(backend: B, root: &str) -> Result<Api<B>> {
        Ok(Api {
            backend,
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            root: root.parse()?,
            limit: DEFAULT_LIMIT,
            locales: vec!["en".to_string()],
        })
    }

    /// Sets this API's title.
    pub fn title(mut self, title: impl ToString) -> Api<B> {
        self.title = title.to_string();
        self
    }

    /// Sets this API's description.
    pub fn description(mut self, description: impl ToString) -> Api<B> {
        self.description = description.to_string();
        self
    }

    /// Sets this API's default page size.
    pub fn limit(mut self, limit: u64) -> Api<B> {
        self.limit = limit;
        self
    }

    /// Sets this API's supported locales.
    pub fn locales(mut self, locales: Vec<String>) -> Api<B> {
        self.locales = locales;
        self
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.root.join(path).map_err(crate::Error::from)
    }

    /// Returns the landing page.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf_server::{Api, MemoryBackend};
    ///
    /// let api = Api::new(MemoryBackend::new(), "http://mf.test").unwrap();
    /// let landing_page = api.landing_page().unwrap();
    /// assert!(!landing_page.links.is_empty());
    /// ```
    pub fn landing_page(&self) -> Result<LandingPage> {
        Ok(LandingPage {
            title: self.title.clone(),
            description: self.description.clone(),
            links: vec![
                Link::self_(self.root.clone()).json(),
                Link::new(self.url("/openapi")?, "service-desc")
                    .title("OpenAPI document")
                    .with_type(APPLICATION_OPENAPI_3_0),
                Link::new(self.url("/conformance")?, "conformance").json(),
                Link::new(self.url("/collections")?, "data").json(),
            ],
        })
    }

    /// Returns the conformance classes.
    pub fn conformance(&self) -> Conformance {
        Conformance::new().moving_features()
    }

    /// Returns the collections, with their derived extents and links.
    pub async fn collections(&self, get: &GetParams, params: Params) -> Result<Collections> {
        let params = self.normalize(params);
        let page = self.backend.collections(&params).await?;
        let mut collections = Vec::with_capacity(page.items.len());
        for collection in &page.items {
            let mut wire = collection.to_wire();
            if let Value::Object(object) = &mut wire {
                let _ = object.insert(
                    "links".to_string(),
                    json!([
                        Link::self_(self.url(&format!("/collections/{}", collection.id))?).json()
                    ]),
                );
            }
            collections.push(wire);
        }
        let mut envelope = Collections::from(collections);
        envelope.links = self.list_links("/collections", get, &params, &page)?;
        Ok(envelope)
    }

    /// Returns a single collection, or `None` if the id is unknown.
    pub async fn collection(&self, id: &str) -> Result<Option<Value>> {
        let Some(collection) = self.backend.collection(id).await? else {
            return Ok(None);
        };
        let mut wire = collection.to_wire();
        if let Value::Object(object) = &mut wire {
            let _ = object.insert(
                "links".to_string(),
                json!([Link::self_(self.url(&format!("/collections/{}", id))?).json()]),
            );
        }
        Ok(Some(wire))
    }

    /// Creates a collection, returning its id.
    pub async fn create_collection(&mut self, property: Map<String, Value>) -> Result<String> {
        self.backend.add_collection(property).await
    }

    /// Replaces a collection's descriptor document.
    pub async fn update_collection(
        &mut self,
        id: &str,
        property: Map<String, Value>,
    ) -> Result<bool> {
        self.backend.update_collection(id, property).await
    }

    /// Deletes a collection.
    pub async fn delete_collection(&mut self, id: &str) -> Result<bool> {
        self.backend.delete_collection(id).await
    }

    /// Returns a collection's features, or `None` if the collection is
    /// unknown.
    pub async fn features(
        &self,
        collection_id: &str,
        get: &GetParams,
        params: Params,
    ) -> Result<Option<FeatureCollection>> {
        let params = self.normalize(params);
        let Some(page) = self.backend.features(collection_id, &params).await? else {
            return Ok(None);
        };
        let features = page.items.iter().map(feature_to_wire).collect();
        let mut envelope = FeatureCollection::new(features, page.number_matched, timestamp());
        envelope.crs = Some(DEFAULT_CRS.into());
        envelope.trs = Some(DEFAULT_TRS.into());
        envelope.links = self.list_links(
            &format!("/collections/{}/items", collection_id),
            get,
            &params,
            &page,
        )?;
        Ok(envelope.into())
    }

    /// Returns a single feature, or `None` if either id is unknown.
    pub async fn feature(&self, collection_id: &str, feature_id: &str) -> Result<Option<Feature>> {
        Ok(self
            .backend
            .feature(collection_id, feature_id)
            .await?
            .as_ref()
            .map(feature_to_wire))
    }

    /// Creates a feature from a submitted MF-JSON payload, returning its
    /// id, or `None` if the collection is unknown.
    pub async fn create_feature(
        &mut self,
        collection_id: &str,
        payload: Value,
    ) -> Result<Option<String>> {
        let parts = FeatureParts::split(payload)?;
        self.backend.add_feature(collection_id, parts).await
    }

    /// Deletes a feature.
    pub async fn delete_feature(&mut self, collection_id: &str, feature_id: &str) -> Result<bool> {
        self.backend.delete_feature(collection_id, feature_id).await
    }

    /// Returns a feature's temporal geometries, or `None` if either id is
    /// unknown.
    pub async fn temporal_geometries(
        &self,
        collection_id: &str,
        feature_id: &str,
        get: &GetParams,
        params: Params,
    ) -> Result<Option<GeometrySequence>> {
        let params = self.normalize(params);
        let Some(page) = self
            .backend
            .temporal_geometries(collection_id, feature_id, &params)
            .await?
        else {
            return Ok(None);
        };
        let mut crs = None;
        let mut trs = None;
        let mut geometry_sequence = Vec::with_capacity(page.items.len());
        for (id, geometry) in &page.items {
            if crs.is_none() {
                crs = geometry.crs.clone();
            }
            if trs.is_none() {
                trs = geometry.trs.clone();
            }
            let mut wire = geometry.to_wire();
            if let Value::Object(object) = &mut wire {
                let _ = object.insert("id".to_string(), id.clone().into());
            }
            geometry_sequence.push(wire);
        }
        Ok(Some(GeometrySequence {
            geometry_sequence,
            crs: Some(crs.unwrap_or_else(|| DEFAULT_CRS.into())),
            trs: Some(trs.unwrap_or_else(|| DEFAULT_TRS.into())),
            links: self.list_links(
                &format!("/collections/{}/items/{}/tgsequence", collection_id, feature_id),
                get,
                &params,
                &page,
            )?,
            time_stamp: timestamp(),
            number_matched: page.number_matched,
            number_returned: page.number_returned,
        }))
    }

    /// Creates a temporal geometry, returning its id, or `None` if either
    /// id is unknown.
    pub async fn create_temporal_geometry(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        payload: &Value,
    ) -> Result<Option<String>> {
        let geometry = TemporalGeometry::from_mfjson(payload)?;
        self.backend
            .add_temporal_geometry(collection_id, feature_id, geometry)
            .await
    }

    /// Deletes a temporal geometry.
    pub async fn delete_temporal_geometry(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        geometry_id: &str,
    ) -> Result<bool> {
        self.backend
            .delete_temporal_geometry(collection_id, feature_id, geometry_id)
            .await
    }

    /// Returns a feature's temporal property summaries, or `None` if
    /// either id is unknown.
    pub async fn temporal_properties(
        &self,
        collection_id: &str,
        feature_id: &str,
        get: &GetParams,
        params: Params,
    ) -> Result<Option<TemporalProperties>> {
        let params = self.normalize(params);
        let Some(page) = self
            .backend
            .temporal_properties(collection_id, feature_id, &params)
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(TemporalProperties {
            temporal_properties: page.items.clone(),
            links: self.list_links(
                &format!(
                    "/collections/{}/items/{}/tProperties",
                    collection_id, feature_id
                ),
                get,
                &params,
                &page,
            )?,
            time_stamp: timestamp(),
            number_matched: page.number_matched,
            number_returned: page.number_returned,
        }))
    }

    /// Creates temporal properties from a submitted envelope, returning
    /// the property names, or `None` if either id is unknown.
    pub async fn create_temporal_properties(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        payload: &Value,
    ) -> Result<Option<Vec<String>>> {
        let entries = match payload {
            Value::Array(entries) => entries.as_slice(),
            Value::Object(object) => match object.get("temporalProperties") {
                Some(Value::Array(entries)) => entries.as_slice(),
                _ => std::slice::from_ref(payload),
            },
            _ => std::slice::from_ref(payload),
        };
        let mut sequences = Vec::new();
        for entry in entries {
            sequences.extend(split_properties_entry(entry)?);
        }
        self.backend
            .add_temporal_properties(collection_id, feature_id, sequences)
            .await
    }

    /// Returns a property's value sequences, or `None` if the property is
    /// unknown.
    pub async fn temporal_property_values(
        &self,
        collection_id: &str,
        feature_id: &str,
        name: &str,
        get: &GetParams,
        params: Params,
    ) -> Result<Option<TemporalPropertyValue>> {
        let params = self.normalize(params);
        let Some(page) = self
            .backend
            .temporal_property_values(collection_id, feature_id, name, &params)
            .await?
        else {
            return Ok(None);
        };
        let mut property = Map::new();
        let _ = property.insert("name".to_string(), name.into());
        if let Some(summaries) = self
            .backend
            .temporal_properties(
                collection_id,
                feature_id,
                &Params {
                    limit: Some(MAX_LIMIT),
                    ..Default::default()
                },
            )
            .await?
        {
            if let Some(Value::Object(summary)) = summaries
                .items
                .iter()
                .find(|summary| summary.get("name").and_then(Value::as_str) == Some(name))
            {
                property = summary.clone();
            }
        }
        Ok(Some(TemporalPropertyValue {
            property,
            value_sequence: page
                .items
                .iter()
                .map(|(_, _, sequence)| sequence.to_wire())
                .collect(),
            links: self.list_links(
                &format!(
                    "/collections/{}/items/{}/tProperties/{}",
                    collection_id, feature_id, name
                ),
                get,
                &params,
                &page,
            )?,
            time_stamp: timestamp(),
            number_matched: page.number_matched,
            number_returned: page.number_returned,
        }))
    }

    /// Appends a value sequence to a property, returning the sequence id,
    /// or `None` if the property is unknown.
    pub async fn create_temporal_value(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        name: &str,
        payload: &Value,
    ) -> Result<Option<String>> {
        let sequence = ValueSequence::from_mfjson(payload)?;
        self.backend
            .add_temporal_value(collection_id, feature_id, name, sequence)
            .await
    }

    /// Deletes a temporal property.
    pub async fn delete_temporal_property(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        name: &str,
    ) -> Result<bool> {
        self.backend
            .delete_temporal_property(collection_id, feature_id, name)
            .await
    }

    /// Applies the server's default page size when the request did not
    /// carry one.
    fn normalize(&self, mut params: Params) -> Params {
        params.limit = Some(params.limit.unwrap_or(self.limit));
        params
    }

    /// Builds a list endpoint's links: a self link preserving the query,
    /// and a next link when the page is full, with the original query
    /// parameters preserved except `f` and `offset`.
    fn list_links<T>(
        &self,
        path: &str,
        get: &GetParams,
        params: &Params,
        page: &mf::Page<T>,
    ) -> Result<Vec<Link>> {
        let mut url = self.url(path)?;
        let query = serde_urlencoded::to_string(get).map_err(crate::Error::from)?;
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        let mut links = vec![Link::self_(url).json()];
        let limit = params.limit.unwrap_or(self.limit);
        if page.number_returned == limit {
            let mut next = self.url(path)?;
            let next_params = get.next_page(params.offset + limit);
            next.set_query(Some(
                &serde_urlencoded::to_string(next_params).map_err(crate::Error::from)?,
            ));
            links.push(Link::next(next).json());
        }
        Ok(links)
    }
}

/// Renders a feature for the wire: `bbox` from the aggregated extent,
/// `time` from the lifespan, and the clipped trajectories when a
/// sub-trajectory selection attached them.
fn feature_to_wire(feature: &MovingFeature) -> Feature {
    let mut wire = Feature::new(&feature.id);
    wire.geometry = feature
        .geometry
        .as_ref()
        .and_then(|geometry| serde_json::to_value(geometry).ok());
    if !feature.properties.is_empty() {
        wire.properties = Some(Value::Object(feature.properties.clone()));
    }
    wire.bbox = feature.extent.map(|stbox| stbox.bbox.into());
    wire.time = feature.lifespan.map(|lifespan| lifespan.wire_interval());
    wire.crs = Some(DEFAULT_CRS.into());
    wire.trs = Some(DEFAULT_TRS.into());
    wire.temporal_geometry = match feature.trajectories.len() {
        0 => None,
        1 => Some(feature.trajectories[0].to_wire()),
        _ => Some(Value::Array(
            feature
                .trajectories
                .iter()
                .map(TemporalGeometry::to_wire)
                .collect(),
        )),
    };
    wire
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
