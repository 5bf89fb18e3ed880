//! In-memory repository for curation tasks.
//!
//! This crate provides an implementation of the `ContentService` trait that
//! keeps the whole object graph in memory:
//! - `RepositorySnapshot` - Serializable communities, collections and items
//! - `InMemoryRepository` - `ContentService` over a snapshot, with failure injection
//!
//! It is meant for tests and for running tasks against an exported snapshot.
//!
//! # Example
//!
//! ```rust
//! use memory_repository::{InMemoryRepository, ItemRecord, RepositorySnapshot};
//! use curation_core::{ContentService, Handle, MetadataField};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), curation_core::CurationError> {
//!     let snapshot = RepositorySnapshot::default()
//!         .with_item(ItemRecord::new("10568/1").with_metadata("cg.coverage.country", "Kenya"));
//!     let repository = InMemoryRepository::new(snapshot);
//!
//!     let field: MetadataField = "cg.coverage.country".parse()?;
//!     let values = repository.metadata_values(&Handle::new("10568/1"), &field).await?;
//!     assert_eq!(values, vec!["Kenya".to_string()]);
//!     Ok(())
//! }
//! ```

mod error;
mod repository;
mod snapshot;

pub use error::SnapshotError;
pub use repository::InMemoryRepository;
pub use snapshot::{CollectionRecord, CommunityRecord, ItemRecord, MetadataEntry, RepositorySnapshot};
