//! In-memory ContentService implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use curation_core::{
    Bitstream, BundleRole, ContentService, CurationError, Handle, MetadataField, ResolvedObject,
    Result,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::snapshot::{ItemRecord, MetadataEntry, RepositorySnapshot};

#[derive(Debug, Default)]
struct State {
    snapshot: RepositorySnapshot,
    failing_writes: HashSet<Handle>,
    disconnected: bool,
    writes: usize,
    commits: usize,
}

/// A repository held entirely in memory.
///
/// Every mutation is applied immediately; `persist` and `commit` only count
/// calls. Failures can be injected per item or for the whole connection.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: RwLock<State>,
}

impl InMemoryRepository {
    /// Create a repository from a snapshot.
    pub fn new(snapshot: RepositorySnapshot) -> Self {
        Self {
            state: RwLock::new(State {
                snapshot,
                ..Default::default()
            }),
        }
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> RepositorySnapshot {
        self.state.read().await.snapshot.clone()
    }

    /// Make every mutation of `item` fail with an authorization error.
    pub async fn fail_writes_for(&self, item: impl Into<Handle>) {
        self.state.write().await.failing_writes.insert(item.into());
    }

    /// Make every further call fail with a fatal connection error.
    pub async fn disconnect(&self) {
        self.state.write().await.disconnected = true;
    }

    /// Number of mutation calls (including persists) that reached an item.
    pub async fn write_count(&self) -> usize {
        self.state.read().await.writes
    }

    /// Number of commits so far.
    pub async fn commit_count(&self) -> usize {
        self.state.read().await.commits
    }
}

impl State {
    fn check_connection(&self) -> Result<()> {
        if self.disconnected {
            return Err(CurationError::Connection("repository disconnected".to_string()));
        }
        Ok(())
    }

    fn item(&self, handle: &Handle) -> Result<&ItemRecord> {
        self.check_connection()?;
        self.snapshot.item(handle).ok_or_else(|| item_not_found(handle))
    }

    /// Borrow an item for a mutation, honoring injected failures.
    fn item_for_write(&mut self, handle: &Handle) -> Result<&mut ItemRecord> {
        self.check_connection()?;
        if self.failing_writes.contains(handle) {
            return Err(CurationError::Authorization(format!(
                "write access to {} denied",
                handle
            )));
        }
        let record = self
            .snapshot
            .item_mut(handle)
            .ok_or_else(|| item_not_found(handle))?;
        self.writes += 1;
        Ok(record)
    }
}

fn item_not_found(handle: &Handle) -> CurationError {
    CurationError::NotFound {
        kind: "item",
        id: handle.to_string(),
    }
}

fn bitstream_not_found(id: &str) -> CurationError {
    CurationError::NotFound {
        kind: "bitstream",
        id: id.to_string(),
    }
}

#[async_trait]
impl ContentService for InMemoryRepository {
    async fn resolve(&self, handle: &Handle) -> Result<Option<ResolvedObject>> {
        let state = self.state.read().await;
        state.check_connection()?;
        let snapshot = &state.snapshot;

        let resolved = if &snapshot.site_handle == handle {
            Some(ResolvedObject::Site)
        } else if snapshot.community(handle).is_some() {
            Some(ResolvedObject::Community(handle.clone()))
        } else if snapshot.collection(handle).is_some() {
            Some(ResolvedObject::Collection(handle.clone()))
        } else if snapshot.item(handle).is_some() {
            Some(ResolvedObject::Item(handle.clone()))
        } else {
            None
        };

        Ok(resolved)
    }

    async fn all_items(&self) -> Result<Vec<Handle>> {
        let state = self.state.read().await;
        state.check_connection()?;
        Ok(state
            .snapshot
            .items
            .iter()
            .map(|item| item.handle.clone())
            .collect())
    }

    async fn community_collections(&self, community: &Handle) -> Result<Vec<Handle>> {
        let state = self.state.read().await;
        state.check_connection()?;
        let snapshot = &state.snapshot;

        if snapshot.community(community).is_none() {
            return Err(CurationError::NotFound {
                kind: "community",
                id: community.to_string(),
            });
        }

        let mut collections = Vec::new();
        let mut visited = HashSet::new();
        let mut pending = vec![community.clone()];

        while let Some(handle) = pending.pop() {
            if !visited.insert(handle.clone()) {
                continue;
            }
            let Some(record) = snapshot.community(&handle) else {
                debug!(community = %handle, "Skipping unknown sub-community");
                continue;
            };
            collections.extend(record.collections.iter().cloned());
            // Reverse so sub-communities are walked in declared order.
            pending.extend(record.subcommunities.iter().rev().cloned());
        }

        Ok(collections)
    }

    async fn collection_items(&self, collection: &Handle) -> Result<Vec<Handle>> {
        let state = self.state.read().await;
        state.check_connection()?;
        state
            .snapshot
            .collection(collection)
            .map(|record| record.items.clone())
            .ok_or_else(|| CurationError::NotFound {
                kind: "collection",
                id: collection.to_string(),
            })
    }

    async fn metadata_values(&self, item: &Handle, field: &MetadataField) -> Result<Vec<String>> {
        let state = self.state.read().await;
        Ok(state.item(item)?.values(&field.to_string()))
    }

    async fn add_metadata_values(
        &self,
        item: &Handle,
        field: &MetadataField,
        language: &str,
        values: &[String],
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let record = state.item_for_write(item)?;
        let key = field.to_string();
        record.metadata.extend(values.iter().map(|value| MetadataEntry {
            field: key.clone(),
            value: value.clone(),
            language: Some(language.to_string()),
        }));
        Ok(())
    }

    async fn clear_metadata_values(&self, item: &Handle, field: &MetadataField) -> Result<()> {
        let mut state = self.state.write().await;
        let record = state.item_for_write(item)?;
        let key = field.to_string();
        record.metadata.retain(|entry| entry.field != key);
        Ok(())
    }

    async fn persist(&self, item: &Handle) -> Result<()> {
        let mut state = self.state.write().await;
        state.item_for_write(item)?;
        Ok(())
    }

    async fn bitstreams(&self, item: &Handle, role: BundleRole) -> Result<Vec<Bitstream>> {
        let state = self.state.read().await;
        Ok(state
            .item(item)?
            .bundles
            .get(&role)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_to_role(&self, item: &Handle, role: BundleRole, bitstream_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let record = state.item_for_write(item)?;

        let bitstream = record
            .bundles
            .values()
            .flatten()
            .find(|b| b.id == bitstream_id)
            .cloned()
            .ok_or_else(|| bitstream_not_found(bitstream_id))?;

        let bundle = record.bundles.entry(role).or_default();
        if !bundle.iter().any(|b| b.id == bitstream_id) {
            bundle.push(bitstream);
        }
        Ok(())
    }

    async fn remove_from_role(
        &self,
        item: &Handle,
        role: BundleRole,
        bitstream_id: &str,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let record = state.item_for_write(item)?;

        let bundle = record
            .bundles
            .get_mut(&role)
            .ok_or_else(|| bitstream_not_found(bitstream_id))?;
        let before = bundle.len();
        bundle.retain(|b| b.id != bitstream_id);
        if bundle.len() == before {
            return Err(bitstream_not_found(bitstream_id));
        }
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let mut state = self.state.write().await;
        state.check_connection()?;
        state.commits += 1;
        Ok(())
    }
}
