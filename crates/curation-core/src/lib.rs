//! Core traits and types for repository curation tasks.
//!
//! This crate provides the boundary between curation tasks and the host
//! repository that owns the content. It defines:
//!
//! - [`ContentService`] - The trait a host implements to expose items, metadata and bitstreams
//! - [`CurationTask`] - The trait every batch task implements
//! - [`TaskResult`] / [`CurationStatus`] - Per-item results with the host's status codes
//! - [`ReportSink`] - Where per-item report lines go
//! - [`CurationError`] - Error types for host operations
//!
//! # Example
//!
//! ```rust
//! use curation_core::{async_trait, ContentService, CurationError, CurationTask, Handle, TaskResult};
//!
//! struct NoopTask;
//!
//! #[async_trait]
//! impl CurationTask for NoopTask {
//!     fn name(&self) -> &str {
//!         "noop"
//!     }
//!
//!     async fn perform(
//!         &self,
//!         _service: &dyn ContentService,
//!         handle: &Handle,
//!     ) -> Result<TaskResult, CurationError> {
//!         Ok(TaskResult::skip(handle.clone(), format!("{}: nothing to do", handle)))
//!     }
//! }
//! ```

mod error;
mod model;
mod report;
mod service;
mod status;
mod task;

pub use error::{CurationError, Result};
pub use model::{Bitstream, BundleRole, Handle, MetadataField, ResolvedObject};
pub use report::{MemoryReporter, ReportSink, TracingReporter};
pub use service::ContentService;
pub use status::{CurationStatus, TaskResult};
pub use task::{non_item_result, CurationTask};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
