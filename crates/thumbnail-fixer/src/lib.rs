//! Thumbnail cleanup for repository items.
//!
//! Two strategies are available:
//!
//! - [`ThumbnailStrategy::LowQuality`] - Prefer thumbnails rendered from PDFs.
//!   Drops other generated thumbnails once an `IM Thumbnail` exists, and drops
//!   JPEG "thumbnail" uploads from the original files of items that have a PDF.
//! - [`ThumbnailStrategy::JpgJpg`] - Replace `.jpg.jpg` thumbnails generated
//!   from small JPEG originals with the original itself.
//!
//! Rules are evaluated by the pure `plan_*` functions; [`ThumbnailFixer`]
//! applies the resulting [`ThumbnailDecision`]s through a
//! [`ContentService`](curation_core::ContentService).
//!
//! # Example
//!
//! ```rust
//! use curation_core::Bitstream;
//! use thumbnail_fixer::plan_thumbnail_cleanup;
//!
//! let thumbnails = vec![
//!     Bitstream::new("1", "a.jpg", "image/jpeg", 2000).with_description("IM Thumbnail"),
//!     Bitstream::new("2", "b.jpg.jpg", "image/jpeg", 3000).with_description("Generated Thumbnail"),
//! ];
//!
//! let decisions = plan_thumbnail_cleanup(&thumbnails);
//! let removed: Vec<&str> = decisions
//!     .iter()
//!     .filter(|decision| decision.is_action())
//!     .map(|decision| decision.bitstream().name.as_str())
//!     .collect();
//! assert_eq!(removed, vec!["b.jpg.jpg"]);
//! ```

mod config;
mod fixer;
mod rules;

pub use config::{
    ThumbnailConfig, ThumbnailStrategy, DEFAULT_EXEMPT_TYPES, DEFAULT_SIZE_THRESHOLD,
    DEFAULT_TYPE_FIELD,
};
pub use fixer::ThumbnailFixer;
pub use rules::{
    exempt_type, plan_jpg_jpg_swap, plan_original_cleanup, plan_thumbnail_cleanup,
    ThumbnailDecision, GENERATED_THUMBNAIL, IM_THUMBNAIL,
};
