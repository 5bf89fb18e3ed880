//! The ContentService trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Bitstream, BundleRole, Handle, MetadataField, ResolvedObject};

/// Access to the host repository's object graph, metadata and bitstreams.
///
/// Tasks never own repository state; everything they read or change goes
/// through this trait. Calls are awaited one at a time and any of them may
/// fail with an authorization or storage error.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Resolve a handle to the kind of object it identifies.
    ///
    /// Returns `None` if the handle is unknown.
    async fn resolve(&self, handle: &Handle) -> Result<Option<ResolvedObject>>;

    /// Every item in the repository.
    async fn all_items(&self) -> Result<Vec<Handle>>;

    /// Every collection beneath a community, including those of its sub-communities.
    async fn community_collections(&self, community: &Handle) -> Result<Vec<Handle>>;

    /// Every item owned by a collection, including non-discoverable ones.
    async fn collection_items(&self, collection: &Handle) -> Result<Vec<Handle>>;

    /// Values of a metadata field, in stored order.
    async fn metadata_values(&self, item: &Handle, field: &MetadataField) -> Result<Vec<String>>;

    /// Append values to a metadata field.
    async fn add_metadata_values(
        &self,
        item: &Handle,
        field: &MetadataField,
        language: &str,
        values: &[String],
    ) -> Result<()>;

    /// Remove every value of a metadata field.
    async fn clear_metadata_values(&self, item: &Handle, field: &MetadataField) -> Result<()>;

    /// Write pending changes of an item to storage.
    async fn persist(&self, item: &Handle) -> Result<()>;

    /// Bitstreams of an item in the given bundle.
    async fn bitstreams(&self, item: &Handle, role: BundleRole) -> Result<Vec<Bitstream>>;

    /// Add an existing bitstream of the item to the given bundle.
    async fn add_to_role(&self, item: &Handle, role: BundleRole, bitstream_id: &str) -> Result<()>;

    /// Remove a bitstream from the given bundle.
    async fn remove_from_role(
        &self,
        item: &Handle,
        role: BundleRole,
        bitstream_id: &str,
    ) -> Result<()>;

    /// Commit the unit of work at the end of a run.
    ///
    /// Default implementation does nothing.
    async fn commit(&self) -> Result<()> {
        Ok(())
    }
}
