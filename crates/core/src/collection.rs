use crate::{DEFAULT_CRS, DEFAULT_TRS, Period, Stbox};
use serde_json::{Map, Value, json};

/// A named grouping of moving features.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// The collection id.
    pub id: String,

    /// The free-form descriptor document.
    pub property: Map<String, Value>,

    /// The derived extent.
    pub extent: Extent,
}

/// A collection's derived extent: the union over its features' temporal
/// geometry extents and lifespans.
#[derive(Debug, Clone, Default)]
pub struct Extent {
    /// The aggregated spatiotemporal extent, when any feature has a
    /// trajectory.
    pub stbox: Option<Stbox>,

    /// The aggregated lifespan, when any feature declares one.
    pub lifespan: Option<Period>,
}

impl Collection {
    /// Creates a new collection with an empty extent.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf::Collection;
    /// let collection = Collection::new("an-id");
    /// assert_eq!(collection.id, "an-id");
    /// ```
    pub fn new(id: impl ToString) -> Collection {
        Collection {
            id: id.to_string(),
            property: Map::new(),
            extent: Extent::default(),
        }
    }

    /// Renders this collection as a wire object: the id, the descriptor
    /// members, and the derived extent.
    pub fn to_wire(&self) -> Value {
        let mut object = Map::new();
        let _ = object.insert("id".to_string(), self.id.clone().into());
        for (key, value) in &self.property {
            let _ = object.insert(key.clone(), value.clone());
        }
        let _ = object.insert("extent".to_string(), self.extent.to_wire());
        Value::Object(object)
    }
}

impl Extent {
    /// Renders this extent as a wire object with `spatial` and `temporal`
    /// members, defaulted reference systems included.
    pub fn to_wire(&self) -> Value {
        let bbox: Value = match self.stbox {
            Some(stbox) => json!([Vec::from(stbox.bbox)]),
            None => json!([]),
        };
        let interval: Value = match temporal(self) {
            Some(period) => json!([period.wire_interval()]),
            None => json!([]),
        };
        json!({
            "spatial": {"bbox": bbox, "crs": DEFAULT_CRS},
            "temporal": {"interval": interval, "trs": DEFAULT_TRS},
        })
    }
}

fn temporal(extent: &Extent) -> Option<Period> {
    match (extent.stbox.as_ref(), extent.lifespan.as_ref()) {
        (Some(stbox), Some(lifespan)) => {
            let mut period = stbox.period;
            period.extend(lifespan);
            Some(period)
        }
        (Some(stbox), None) => Some(stbox.period),
        (None, lifespan) => lifespan.copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::Collection;
    use crate::{Bbox, Period, Stbox, datetime};
    use serde_json::json;

    #[test]
    fn empty_extent() {
        let collection = Collection::new("an-id");
        let wire = collection.to_wire();
        assert_eq!(wire["id"], "an-id");
        assert_eq!(wire["extent"]["spatial"]["bbox"], json!([]));
        assert_eq!(wire["extent"]["temporal"]["interval"], json!([]));
    }

    #[test]
    fn descriptor_members_are_inlined() {
        let mut collection = Collection::new("an-id");
        let _ = collection
            .property
            .insert("title".to_string(), "fleet".into());
        assert_eq!(collection.to_wire()["title"], "fleet");
    }

    #[test]
    fn temporal_union_of_stbox_and_lifespan() {
        let mut collection = Collection::new("an-id");
        collection.extent.stbox = Some(Stbox::new(
            Bbox::new(0., 0., 1., 1.),
            Period::new(
                datetime::parse("2011-07-14").unwrap(),
                datetime::parse("2011-07-15").unwrap(),
            )
            .unwrap(),
        ));
        collection.extent.lifespan = Some(
            Period::new(
                datetime::parse("2011-07-13").unwrap(),
                datetime::parse("2011-07-14").unwrap(),
            )
            .unwrap(),
        );
        let wire = collection.to_wire();
        assert_eq!(
            wire["extent"]["temporal"]["interval"],
            json!([["2011-07-13T00:00:00Z", "2011-07-15T00:00:00Z"]])
        );
    }
}
