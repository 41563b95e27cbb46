// src/models/catalog.rs

//! Backend-independent discovery events and admin API records.

use serde::Deserialize;

/// A single discovery reported by a catalog backend.
///
/// Events arrive in emission order and that order is preserved all the
/// way into the serialized sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    /// A collection with at least one published object.
    Collection { id: String },

    /// A published media object.
    MediaObject { id: String },
}

impl CatalogEvent {
    pub fn collection(id: impl Into<String>) -> Self {
        Self::Collection { id: id.into() }
    }

    pub fn media_object(id: impl Into<String>) -> Self {
        Self::MediaObject { id: id.into() }
    }
}

/// Object counts attached to a collection record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectCounts {
    /// Total number of objects in the collection
    #[serde(default)]
    pub total: u64,

    /// Number of published objects
    #[serde(default)]
    pub published: u64,
}

/// One collection record from `admin/collections.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionRecord {
    pub id: String,

    /// Display name, used for debug logging only
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub object_count: ObjectCounts,
}

impl CollectionRecord {
    /// A collection is listed iff it holds at least one published object.
    pub fn has_published_objects(&self) -> bool {
        self.object_count.published > 0
    }
}

/// One media object record within an items page.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    /// Display title, used for debug logging only
    #[serde(default)]
    pub title: String,

    pub published: bool,
}

/// A page of `admin/collections/{id}/items.json`.
///
/// The wire format is a JSON object mapping object id to record, not an
/// ordered list. `serde_json` is built with `preserve_order`, so
/// iterating this map follows the order the backend wrote the keys.
pub type ItemsPage = serde_json::Map<String, serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_listing_requires_published_objects() {
        let listed: CollectionRecord = serde_json::from_str(
            r#"{"id": "c1", "name": "Films", "object_count": {"total": 4, "published": 2}}"#,
        )
        .unwrap();
        let unlisted: CollectionRecord = serde_json::from_str(
            r#"{"id": "c2", "name": "Drafts", "object_count": {"total": 3, "published": 0}}"#,
        )
        .unwrap();

        assert!(listed.has_published_objects());
        assert!(!unlisted.has_published_objects());
    }

    #[test]
    fn collection_record_tolerates_missing_counts() {
        let record: CollectionRecord = serde_json::from_str(r#"{"id": "c3"}"#).unwrap();
        assert!(!record.has_published_objects());
    }

    #[test]
    fn items_page_preserves_wire_order() {
        let page: ItemsPage = serde_json::from_str(
            r#"{"z9": {"title": "Last?", "published": true},
                "a1": {"title": "First?", "published": true}}"#,
        )
        .unwrap();

        let ids: Vec<&str> = page.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["z9", "a1"]);
    }
}
