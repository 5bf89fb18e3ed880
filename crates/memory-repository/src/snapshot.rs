//! Serializable repository snapshot.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use curation_core::{Bitstream, BundleRole, Handle};
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// Default handle of the repository itself.
pub const DEFAULT_SITE_HANDLE: &str = "0/0";

fn default_site_handle() -> Handle {
    Handle::new(DEFAULT_SITE_HANDLE)
}

fn default_discoverable() -> bool {
    true
}

/// A community and what it directly contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityRecord {
    pub handle: Handle,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub collections: Vec<Handle>,
    #[serde(default)]
    pub subcommunities: Vec<Handle>,
}

/// A collection and the items it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub handle: Handle,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<Handle>,
}

/// One metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Field key in `schema.element[.qualifier]` form.
    pub field: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// An item with its metadata and bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub handle: Handle,
    /// Whether the item shows up in public listings.
    #[serde(default = "default_discoverable")]
    pub discoverable: bool,
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
    #[serde(default)]
    pub bundles: BTreeMap<BundleRole, Vec<Bitstream>>,
}

impl ItemRecord {
    /// Create an empty, discoverable item.
    pub fn new(handle: impl Into<Handle>) -> Self {
        Self {
            handle: handle.into(),
            discoverable: true,
            metadata: Vec::new(),
            bundles: BTreeMap::new(),
        }
    }

    /// Add a metadata value without a language.
    pub fn with_metadata(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push(MetadataEntry {
            field: field.into(),
            value: value.into(),
            language: None,
        });
        self
    }

    /// Add a bitstream to a bundle.
    pub fn with_bitstream(mut self, role: BundleRole, bitstream: Bitstream) -> Self {
        self.bundles.entry(role).or_default().push(bitstream);
        self
    }

    /// Hide the item from public listings.
    pub fn hidden(mut self) -> Self {
        self.discoverable = false;
        self
    }

    /// Values of a field, in stored order.
    pub fn values(&self, field: &str) -> Vec<String> {
        self.metadata
            .iter()
            .filter(|entry| entry.field == field)
            .map(|entry| entry.value.clone())
            .collect()
    }
}

/// The full object graph of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    #[serde(default = "default_site_handle")]
    pub site_handle: Handle,
    #[serde(default)]
    pub communities: Vec<CommunityRecord>,
    #[serde(default)]
    pub collections: Vec<CollectionRecord>,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

impl Default for RepositorySnapshot {
    fn default() -> Self {
        Self {
            site_handle: default_site_handle(),
            communities: Vec::new(),
            collections: Vec::new(),
            items: Vec::new(),
        }
    }
}

impl RepositorySnapshot {
    /// Parse a snapshot from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Write the snapshot as pretty-printed JSON.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Add an item.
    pub fn with_item(mut self, item: ItemRecord) -> Self {
        self.items.push(item);
        self
    }

    /// Add a collection owning the given items.
    pub fn with_collection(mut self, handle: impl Into<Handle>, items: &[&str]) -> Self {
        self.collections.push(CollectionRecord {
            handle: handle.into(),
            name: String::new(),
            items: items.iter().map(|h| Handle::new(*h)).collect(),
        });
        self
    }

    /// Add a community with the given collections and sub-communities.
    pub fn with_community(
        mut self,
        handle: impl Into<Handle>,
        collections: &[&str],
        subcommunities: &[&str],
    ) -> Self {
        self.communities.push(CommunityRecord {
            handle: handle.into(),
            name: String::new(),
            collections: collections.iter().map(|h| Handle::new(*h)).collect(),
            subcommunities: subcommunities.iter().map(|h| Handle::new(*h)).collect(),
        });
        self
    }

    /// Look up an item.
    pub fn item(&self, handle: &Handle) -> Option<&ItemRecord> {
        self.items.iter().find(|item| &item.handle == handle)
    }

    pub(crate) fn item_mut(&mut self, handle: &Handle) -> Option<&mut ItemRecord> {
        self.items.iter_mut().find(|item| &item.handle == handle)
    }

    pub(crate) fn community(&self, handle: &Handle) -> Option<&CommunityRecord> {
        self.communities.iter().find(|c| &c.handle == handle)
    }

    pub(crate) fn collection(&self, handle: &Handle) -> Option<&CollectionRecord> {
        self.collections.iter().find(|c| &c.handle == handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "site_handle": "10568/0",
        "communities": [
            {"handle": "10568/1", "name": "ILRI", "collections": ["10568/2"]}
        ],
        "collections": [
            {"handle": "10568/2", "name": "Reports", "items": ["10568/3"]}
        ],
        "items": [
            {
                "handle": "10568/3",
                "metadata": [
                    {"field": "cg.coverage.country", "value": "Kenya"},
                    {"field": "cg.coverage.iso3166-alpha2", "value": "KE", "language": "en_US"}
                ],
                "bundles": {
                    "ORIGINAL": [
                        {"id": "b1", "name": "report.pdf", "mime_type": "application/pdf", "size_bytes": 1024}
                    ],
                    "THUMBNAIL": [
                        {"id": "b2", "name": "report.pdf.jpg", "description": "IM Thumbnail",
                         "mime_type": "image/jpeg", "size_bytes": 2048}
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_snapshot() {
        let snapshot = RepositorySnapshot::from_json_str(SNAPSHOT).unwrap();
        assert_eq!(snapshot.site_handle, Handle::new("10568/0"));
        assert_eq!(snapshot.communities[0].subcommunities.len(), 0);

        let item = snapshot.item(&Handle::new("10568/3")).unwrap();
        assert!(item.discoverable);
        assert_eq!(item.values("cg.coverage.country"), vec!["Kenya".to_string()]);
        assert_eq!(item.bundles[&BundleRole::Thumbnail][0].description(), Some("IM Thumbnail"));
        assert_eq!(item.bundles[&BundleRole::Original][0].description(), None);
    }

    #[test]
    fn test_default_site_handle() {
        let snapshot = RepositorySnapshot::from_json_str("{}").unwrap();
        assert_eq!(snapshot.site_handle.as_str(), DEFAULT_SITE_HANDLE);
        assert!(snapshot.items.is_empty());
    }

    #[test]
    fn test_serialize_round_trip_keeps_bundles() {
        let snapshot = RepositorySnapshot::from_json_str(SNAPSHOT).unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"THUMBNAIL\""));
        assert_eq!(RepositorySnapshot::from_json_str(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_invalid_snapshot() {
        assert!(matches!(
            RepositorySnapshot::from_json_str("[]"),
            Err(SnapshotError::Json(_))
        ));
    }
}
