use crate::{Backend, DEFAULT_LIMIT, Error, Result};
use mf::{
    Collection, Extent, FeatureParts, MovingFeature, Page, Period, PropertySequence, Stbox,
    TemporalGeometry, ValueSequence, split_properties_entry,
};
use mf_api::Params;
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};
use uuid::Uuid;

/// A naive backend that stores everything in memory.
///
/// This backend is meant for testing and toy servers, not for production.
/// It honors the same selection semantics as the store-backed backend by
/// going through the pure sequence operations on the temporal types.
#[derive(Clone, Debug)]
pub struct MemoryBackend {
    state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    collections: BTreeMap<String, Map<String, Value>>,
    features: BTreeMap<String, BTreeMap<String, StoredFeature>>,
}

#[derive(Debug, Default)]
struct StoredFeature {
    geometry: Option<geojson::Geometry>,
    properties: Map<String, Value>,
    lifespan: Option<Period>,
    geometries: BTreeMap<String, TemporalGeometry>,
    temporal_properties: BTreeMap<String, StoredProperty>,
}

#[derive(Debug, Default)]
struct StoredProperty {
    descriptor: Map<String, Value>,
    sequences: Vec<StoredSequence>,
}

#[derive(Debug)]
struct StoredSequence {
    id: String,
    datetime_group: i32,
    sequence: ValueSequence,
}

impl MemoryBackend {
    /// Creates a new memory backend.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf_server::MemoryBackend;
    /// let backend = MemoryBackend::new();
    /// ```
    pub fn new() -> MemoryBackend {
        MemoryBackend {
            state: Arc::new(RwLock::new(State::default())),
        }
    }
}

impl Backend for MemoryBackend {
    async fn collections(&self, params: &Params) -> Result<Page<Collection>> {
        let state = self.state.read().unwrap();
        let collections = state
            .collections
            .iter()
            .map(|(id, property)| Collection {
                id: id.clone(),
                property: property.clone(),
                extent: state.collection_extent(id),
            })
            .filter(|collection| extent_matches(&collection.extent, params))
            .collect();
        Ok(paginate(collections, params))
    }

    async fn collection(&self, id: &str) -> Result<Option<Collection>> {
        let state = self.state.read().unwrap();
        Ok(state.collections.get(id).map(|property| Collection {
            id: id.to_string(),
            property: property.clone(),
            extent: state.collection_extent(id),
        }))
    }

    async fn add_collection(&mut self, property: Map<String, Value>) -> Result<String> {
        let mut state = self.state.write().unwrap();
        let id = Uuid::new_v4().to_string();
        let _ = state.collections.insert(id.clone(), property);
        let _ = state.features.insert(id.clone(), BTreeMap::new());
        Ok(id)
    }

    async fn update_collection(&mut self, id: &str, property: Map<String, Value>) -> Result<bool> {
        let mut state = self.state.write().unwrap();
        match state.collections.get_mut(id) {
            Some(stored) => {
                *stored = property;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_collection(&mut self, id: &str) -> Result<bool> {
        let mut state = self.state.write().unwrap();
        let _ = state.features.remove(id);
        Ok(state.collections.remove(id).is_some())
    }

    async fn features(
        &self,
        collection_id: &str,
        params: &Params,
    ) -> Result<Option<Page<MovingFeature>>> {
        let state = self.state.read().unwrap();
        let Some(features) = state.features.get(collection_id) else {
            return Ok(None);
        };
        let features: Vec<_> = features
            .iter()
            .map(|(id, stored)| stored.to_feature(collection_id, id))
            .filter(|feature| {
                extent_matches(
                    &Extent {
                        stbox: feature.extent,
                        lifespan: feature.lifespan,
                    },
                    params,
                )
            })
            .collect();
        let mut page = paginate(features, params);
        if params.sub_trajectory {
            if let Some(datetime) = &params.datetime {
                let period = datetime.period();
                for feature in page.items.iter_mut() {
                    let stored = &state.features[collection_id][&feature.id];
                    feature.trajectories = stored
                        .geometries
                        .values()
                        .filter_map(|geometry| geometry.at_period(&period))
                        .collect();
                }
            }
        }
        Ok(Some(page))
    }

    async fn feature(&self, collection_id: &str, feature_id: &str) -> Result<Option<MovingFeature>> {
        let state = self.state.read().unwrap();
        Ok(state
            .features
            .get(collection_id)
            .and_then(|features| features.get(feature_id))
            .map(|stored| stored.to_feature(collection_id, feature_id)))
    }

    async fn add_feature(
        &mut self,
        collection_id: &str,
        parts: FeatureParts,
    ) -> Result<Option<String>> {
        let mut geometries = BTreeMap::new();
        for value in &parts.temporal_geometries {
            let _ = geometries.insert(
                Uuid::new_v4().to_string(),
                TemporalGeometry::from_mfjson(value)?,
            );
        }
        let mut sequences = Vec::new();
        for entry in &parts.temporal_properties {
            sequences.extend(split_properties_entry(entry)?);
        }
        let mut stored = StoredFeature {
            geometry: parts.geometry,
            properties: parts.properties,
            lifespan: parts.lifespan,
            geometries,
            temporal_properties: BTreeMap::new(),
        };
        for property in sequences {
            let entry = stored
                .temporal_properties
                .entry(property.name.clone())
                .or_default();
            entry.descriptor = property.descriptor;
            if let Some(sequence) = property.sequence {
                let datetime_group = stored.datetime_group(&sequence);
                stored_push(
                    stored
                        .temporal_properties
                        .get_mut(&property.name)
                        .expect("just inserted"),
                    datetime_group,
                    sequence,
                );
            }
        }
        let mut state = self.state.write().unwrap();
        let Some(features) = state.features.get_mut(collection_id) else {
            return Ok(None);
        };
        let id = Uuid::new_v4().to_string();
        let _ = features.insert(id.clone(), stored);
        Ok(Some(id))
    }

    async fn delete_feature(&mut self, collection_id: &str, feature_id: &str) -> Result<bool> {
        let mut state = self.state.write().unwrap();
        Ok(state
            .features
            .get_mut(collection_id)
            .map(|features| features.remove(feature_id).is_some())
            .unwrap_or(false))
    }

    async fn temporal_geometries(
        &self,
        collection_id: &str,
        feature_id: &str,
        params: &Params,
    ) -> Result<Option<Page<(String, TemporalGeometry)>>> {
        let state = self.state.read().unwrap();
        let Some(stored) = state
            .features
            .get(collection_id)
            .and_then(|features| features.get(feature_id))
        else {
            return Ok(None);
        };
        let mut geometries = Vec::new();
        for (id, geometry) in &stored.geometries {
            if let Some(bbox) = &params.bbox {
                if !geometry.extent().bbox.intersects(bbox) {
                    continue;
                }
            }
            if let Some(datetime) = &params.datetime {
                if geometry.at_period(&datetime.period()).is_none() {
                    continue;
                }
            }
            let presented = if let Some(leaf) = &params.leaf {
                match geometry.at_timestamps(leaf.instants()) {
                    Some(sampled) => sampled,
                    None => continue,
                }
            } else if params.sub_trajectory && params.datetime.is_some() {
                let period = params.datetime.as_ref().expect("checked above").period();
                match geometry.at_period(&period) {
                    Some(clipped) => clipped,
                    None => continue,
                }
            } else {
                geometry.clone()
            };
            geometries.push((id.clone(), presented));
        }
        Ok(Some(paginate(geometries, params)))
    }

    async fn add_temporal_geometry(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        geometry: TemporalGeometry,
    ) -> Result<Option<String>> {
        let mut state = self.state.write().unwrap();
        let Some(stored) = state
            .features
            .get_mut(collection_id)
            .and_then(|features| features.get_mut(feature_id))
        else {
            return Ok(None);
        };
        let id = Uuid::new_v4().to_string();
        let _ = stored.geometries.insert(id.clone(), geometry);
        Ok(Some(id))
    }

    async fn delete_temporal_geometry(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        geometry_id: &str,
    ) -> Result<bool> {
        let mut state = self.state.write().unwrap();
        Ok(state
            .features
            .get_mut(collection_id)
            .and_then(|features| features.get_mut(feature_id))
            .map(|stored| stored.geometries.remove(geometry_id).is_some())
            .unwrap_or(false))
    }

    async fn temporal_properties(
        &self,
        collection_id: &str,
        feature_id: &str,
        params: &Params,
    ) -> Result<Option<Page<Value>>> {
        let state = self.state.read().unwrap();
        let Some(stored) = state
            .features
            .get(collection_id)
            .and_then(|features| features.get(feature_id))
        else {
            return Ok(None);
        };
        let mut summaries = Vec::new();
        for (name, property) in &stored.temporal_properties {
            if let Some(datetime) = &params.datetime {
                let period = datetime.period();
                if !property
                    .sequences
                    .iter()
                    .any(|stored| stored.sequence.at_period(&period).is_some())
                {
                    continue;
                }
            }
            let mut summary = Map::new();
            let _ = summary.insert("name".to_string(), name.clone().into());
            for (key, value) in &property.descriptor {
                let _ = summary.insert(key.clone(), value.clone());
            }
            if params.sub_temporal_value {
                let mut sequences: Vec<_> = property
                    .sequences
                    .iter()
                    .filter_map(|stored| {
                        let sequence = match &params.datetime {
                            Some(datetime) => stored.sequence.at_period(&datetime.period())?,
                            None => stored.sequence.clone(),
                        };
                        Some((stored.datetime_group, sequence))
                    })
                    .collect();
                sequences.sort_by_key(|(datetime_group, _)| *datetime_group);
                let _ = summary.insert(
                    "valueSequence".to_string(),
                    Value::Array(
                        sequences
                            .into_iter()
                            .map(|(_, sequence)| sequence.to_wire())
                            .collect(),
                    ),
                );
            }
            summaries.push(Value::Object(summary));
        }
        Ok(Some(paginate(summaries, params)))
    }

    async fn add_temporal_properties(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        sequences: Vec<PropertySequence>,
    ) -> Result<Option<Vec<String>>> {
        let mut state = self.state.write().unwrap();
        let Some(stored) = state
            .features
            .get_mut(collection_id)
            .and_then(|features| features.get_mut(feature_id))
        else {
            return Ok(None);
        };
        for property in &sequences {
            if let Some(sequence) = &property.sequence {
                stored.check_disjoint(&property.name, sequence)?;
            }
        }
        let mut names = Vec::with_capacity(sequences.len());
        for property in sequences {
            let entry = stored
                .temporal_properties
                .entry(property.name.clone())
                .or_default();
            entry.descriptor = property.descriptor;
            if let Some(sequence) = property.sequence {
                let datetime_group = stored.datetime_group(&sequence);
                stored_push(
                    stored
                        .temporal_properties
                        .get_mut(&property.name)
                        .expect("just inserted"),
                    datetime_group,
                    sequence,
                );
            }
            names.push(property.name);
        }
        Ok(Some(names))
    }

    async fn temporal_property_values(
        &self,
        collection_id: &str,
        feature_id: &str,
        name: &str,
        params: &Params,
    ) -> Result<Option<Page<(String, i32, ValueSequence)>>> {
        let state = self.state.read().unwrap();
        let Some(property) = state
            .features
            .get(collection_id)
            .and_then(|features| features.get(feature_id))
            .and_then(|stored| stored.temporal_properties.get(name))
        else {
            return Ok(None);
        };
        let mut rows = Vec::new();
        for stored in &property.sequences {
            if let Some(datetime) = &params.datetime {
                if stored.sequence.at_period(&datetime.period()).is_none() {
                    continue;
                }
            }
            let presented = if let Some(leaf) = &params.leaf {
                match stored.sequence.at_timestamps(leaf.instants()) {
                    Some(sampled) => sampled,
                    None => continue,
                }
            } else if let Some(datetime) = &params.datetime {
                match stored.sequence.at_period(&datetime.period()) {
                    Some(clipped) => clipped,
                    None => continue,
                }
            } else {
                stored.sequence.clone()
            };
            rows.push((stored.id.clone(), stored.datetime_group, presented));
        }
        rows.sort_by(|a, b| (a.1, &a.0).cmp(&(b.1, &b.0)));
        Ok(Some(paginate(rows, params)))
    }

    async fn add_temporal_value(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        name: &str,
        sequence: ValueSequence,
    ) -> Result<Option<String>> {
        let mut state = self.state.write().unwrap();
        let Some(stored) = state
            .features
            .get_mut(collection_id)
            .and_then(|features| features.get_mut(feature_id))
        else {
            return Ok(None);
        };
        if !stored.temporal_properties.contains_key(name) {
            return Ok(None);
        }
        stored.check_disjoint(name, &sequence)?;
        let datetime_group = stored.datetime_group(&sequence);
        let id = Uuid::new_v4().to_string();
        let property = stored
            .temporal_properties
            .get_mut(name)
            .expect("checked above");
        property.sequences.push(StoredSequence {
            id: id.clone(),
            datetime_group,
            sequence,
        });
        Ok(Some(id))
    }

    async fn delete_temporal_property(
        &mut self,
        collection_id: &str,
        feature_id: &str,
        name: &str,
    ) -> Result<bool> {
        let mut state = self.state.write().unwrap();
        Ok(state
            .features
            .get_mut(collection_id)
            .and_then(|features| features.get_mut(feature_id))
            .map(|stored| stored.temporal_properties.remove(name).is_some())
            .unwrap_or(false))
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    fn collection_extent(&self, collection_id: &str) -> Extent {
        let mut extent = Extent::default();
        if let Some(features) = self.features.get(collection_id) {
            for feature in features.values() {
                for geometry in feature.geometries.values() {
                    Stbox::accumulate(&mut extent.stbox, &geometry.extent());
                }
                if let Some(lifespan) = &feature.lifespan {
                    match &mut extent.lifespan {
                        Some(current) => current.extend(lifespan),
                        None => extent.lifespan = Some(*lifespan),
                    }
                }
            }
        }
        extent
    }
}

impl StoredFeature {
    fn to_feature(&self, collection_id: &str, id: &str) -> MovingFeature {
        let mut extent = None;
        for geometry in self.geometries.values() {
            Stbox::accumulate(&mut extent, &geometry.extent());
        }
        MovingFeature {
            id: id.to_string(),
            collection: collection_id.to_string(),
            geometry: self.geometry.clone(),
            properties: self.properties.clone(),
            lifespan: self.lifespan,
            extent,
            trajectories: Vec::new(),
        }
    }

    /// The disjointness check behind `canPost`: a new sequence may not
    /// overlap any existing sequence of the same property in time.
    fn check_disjoint(&self, name: &str, sequence: &ValueSequence) -> Result<()> {
        if let Some(property) = self.temporal_properties.get(name) {
            if property
                .sequences
                .iter()
                .any(|stored| stored.sequence.period().intersects(&sequence.period()))
            {
                return Err(Error::OverlappingSequence(name.to_string()));
            }
        }
        Ok(())
    }

    /// An identical timestamp set joins its group; anything else opens a
    /// fresh one.
    fn datetime_group(&self, sequence: &ValueSequence) -> i32 {
        let mut max = 0;
        for property in self.temporal_properties.values() {
            for stored in &property.sequences {
                if stored.sequence.datetimes == sequence.datetimes {
                    return stored.datetime_group;
                }
                max = max.max(stored.datetime_group);
            }
        }
        max + 1
    }
}

fn stored_push(property: &mut StoredProperty, datetime_group: i32, sequence: ValueSequence) {
    property.sequences.push(StoredSequence {
        id: Uuid::new_v4().to_string(),
        datetime_group,
        sequence,
    });
}

fn extent_matches(extent: &Extent, params: &Params) -> bool {
    if let Some(bbox) = &params.bbox {
        match &extent.stbox {
            Some(stbox) => {
                if !stbox.bbox.intersects(bbox) {
                    return false;
                }
            }
            None => return false,
        }
    }
    if let Some(datetime) = &params.datetime {
        let period = datetime.period();
        let intersects = extent
            .stbox
            .map(|stbox| stbox.period.intersects(&period))
            .unwrap_or(false)
            || extent
                .lifespan
                .map(|lifespan| lifespan.intersects(&period))
                .unwrap_or(false);
        if !intersects {
            return false;
        }
    }
    true
}

fn paginate<T>(items: Vec<T>, params: &Params) -> Page<T> {
    let number_matched = items.len() as u64;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let items = items
        .into_iter()
        .skip(params.offset as usize)
        .take(limit as usize)
        .collect();
    Page::new(items, number_matched)
}

#[cfg(test)]
mod tests {
    use super::MemoryBackend;
    use crate::Backend;
    use mf::{FeatureParts, TemporalGeometry, ValueSequence, split_properties_entry};
    use mf_api::{GetParams, Params};
    use serde_json::{Map, json};

    fn feature_payload() -> serde_json::Value {
        json!({
            "type": "Feature",
            "temporalGeometry": {
                "type": "MovingPoint",
                "datetimes": [
                    "2011-07-14T22:01:01Z",
                    "2011-07-14T23:01:01Z",
                    "2011-07-15T00:01:01Z",
                ],
                "coordinates": [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]],
                "interpolation": "Linear",
            },
            "properties": {"name": "car1"},
        })
    }

    async fn backend_with_feature() -> (MemoryBackend, String, String) {
        let mut backend = MemoryBackend::new();
        let collection_id = backend.add_collection(Map::new()).await.unwrap();
        let parts = FeatureParts::split(feature_payload()).unwrap();
        let feature_id = backend
            .add_feature(&collection_id, parts)
            .await
            .unwrap()
            .unwrap();
        (backend, collection_id, feature_id)
    }

    fn params(get_params: GetParams) -> Params {
        Params::try_from(get_params).and_then(Params::valid).unwrap()
    }

    #[tokio::test]
    async fn unknown_collection_is_none() {
        let backend = MemoryBackend::new();
        assert!(
            backend
                .features("no-such-collection", &Params::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn bbox_filters_features() {
        let (backend, collection_id, _) = backend_with_feature().await;
        let page = backend
            .features(
                &collection_id,
                &params(GetParams {
                    bbox: Some("0.5,0.5,3,3".to_string()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.number_matched, 1);

        let page = backend
            .features(
                &collection_id,
                &params(GetParams {
                    bbox: Some("10,10,20,20".to_string()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.number_matched, 0);
    }

    #[tokio::test]
    async fn sub_trajectory_clips_to_interval() {
        let (backend, collection_id, _) = backend_with_feature().await;
        let page = backend
            .features(
                &collection_id,
                &params(GetParams {
                    datetime: Some("2011-07-14T22:30:00Z/2011-07-14T23:30:00Z".to_string()),
                    sub_trajectory: Some("true".to_string()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.items.len(), 1);
        let trajectories = &page.items[0].trajectories;
        assert_eq!(trajectories.len(), 1);
        assert_eq!(trajectories[0].datetimes.len(), 1);
        assert_eq!(trajectories[0].coordinates[0], vec![1.0, 1.0]);
    }

    #[tokio::test]
    async fn leaf_samples_geometries() {
        let (backend, collection_id, feature_id) = backend_with_feature().await;
        let page = backend
            .temporal_geometries(
                &collection_id,
                &feature_id,
                &params(GetParams {
                    leaf: Some("2011-07-14T22:01:01Z,2011-07-15T00:01:01Z".to_string()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.items.len(), 1);
        let (_, geometry) = &page.items[0];
        assert_eq!(geometry.datetimes.len(), 2);
    }

    #[tokio::test]
    async fn pagination() {
        let mut backend = MemoryBackend::new();
        let collection_id = backend.add_collection(Map::new()).await.unwrap();
        for _ in 0..5 {
            let parts = FeatureParts::split(feature_payload()).unwrap();
            let _ = backend.add_feature(&collection_id, parts).await.unwrap();
        }
        let page = backend
            .features(
                &collection_id,
                &params(GetParams {
                    limit: Some("2".to_string()),
                    offset: Some("4".to_string()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.number_matched, 5);
        assert_eq!(page.number_returned, 1);
    }

    #[tokio::test]
    async fn overlapping_sequence_is_rejected() {
        let (mut backend, collection_id, feature_id) = backend_with_feature().await;
        let entry = json!({
            "datetimes": ["2011-07-14T22:01:01Z", "2011-07-14T23:01:01Z"],
            "speed": {"values": [1.0, 2.0], "interpolation": "Linear"},
        });
        let sequences = split_properties_entry(&entry).unwrap();
        let names = backend
            .add_temporal_properties(&collection_id, &feature_id, sequences)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(names, vec!["speed".to_string()]);

        let overlapping = ValueSequence::from_mfjson(&json!({
            "datetimes": ["2011-07-14T22:30:00Z", "2011-07-14T23:30:00Z"],
            "values": [3.0, 4.0],
            "interpolation": "Linear",
        }))
        .unwrap();
        assert!(
            backend
                .add_temporal_value(&collection_id, &feature_id, "speed", overlapping)
                .await
                .is_err()
        );

        let disjoint = ValueSequence::from_mfjson(&json!({
            "datetimes": ["2011-07-16T00:00:00Z", "2011-07-17T00:00:00Z"],
            "values": [5.0, 6.0],
            "interpolation": "Linear",
        }))
        .unwrap();
        assert!(
            backend
                .add_temporal_value(&collection_id, &feature_id, "speed", disjoint)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn co_timestamped_sequences_share_a_group() {
        let (mut backend, collection_id, feature_id) = backend_with_feature().await;
        let entry = json!({
            "datetimes": ["2011-07-14T22:01:01Z", "2011-07-14T23:01:01Z"],
            "speed": {"values": [1.0, 2.0], "interpolation": "Linear"},
            "state": {"values": ["walking", "running"], "interpolation": "Step"},
        });
        let sequences = split_properties_entry(&entry).unwrap();
        let _ = backend
            .add_temporal_properties(&collection_id, &feature_id, sequences)
            .await
            .unwrap()
            .unwrap();
        let speed = backend
            .temporal_property_values(&collection_id, &feature_id, "speed", &Params::default())
            .await
            .unwrap()
            .unwrap();
        let state = backend
            .temporal_property_values(&collection_id, &feature_id, "state", &Params::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(speed.items[0].1, state.items[0].1);
    }

    #[tokio::test]
    async fn cascade_delete() {
        let (mut backend, collection_id, feature_id) = backend_with_feature().await;
        assert!(backend.delete_collection(&collection_id).await.unwrap());
        assert!(
            backend
                .feature(&collection_id, &feature_id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            backend
                .temporal_geometries(&collection_id, &feature_id, &Params::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn dialect_survives_storage() {
        let (backend, collection_id, feature_id) = backend_with_feature().await;
        let page = backend
            .temporal_geometries(&collection_id, &feature_id, &Params::default())
            .await
            .unwrap()
            .unwrap();
        let (_, geometry) = &page.items[0];
        let wire = geometry.to_wire();
        assert_eq!(
            TemporalGeometry::from_mfjson(&wire).unwrap(),
            geometry.clone()
        );
    }
}
