//! Configuration for the thumbnail fixer.

use std::env;
use std::fmt;
use std::str::FromStr;

use curation_core::{CurationError, MetadataField};

/// Item types that are never touched by the `.jpg.jpg` swap.
pub const DEFAULT_EXEMPT_TYPES: &[&str] = &["Infographic", "Map"];

/// Originals must be strictly smaller than this to replace their thumbnail.
pub const DEFAULT_SIZE_THRESHOLD: u64 = 100_000;

/// Field holding the item type.
pub const DEFAULT_TYPE_FIELD: &str = "dcterms.type";

/// Which rule set to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThumbnailStrategy {
    /// Drop generated thumbnails in favour of `IM Thumbnail`, and JPEG
    /// thumbnail uploads next to PDFs.
    #[default]
    LowQuality,
    /// Replace `.jpg.jpg` thumbnails with their small JPEG original.
    JpgJpg,
}

impl ThumbnailStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThumbnailStrategy::LowQuality => "low-quality",
            ThumbnailStrategy::JpgJpg => "jpg-jpg",
        }
    }
}

impl fmt::Display for ThumbnailStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThumbnailStrategy {
    type Err = CurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low-quality" => Ok(ThumbnailStrategy::LowQuality),
            "jpg-jpg" => Ok(ThumbnailStrategy::JpgJpg),
            other => Err(CurationError::Configuration(format!(
                "unknown thumbnail strategy {other:?} (expected low-quality or jpg-jpg)"
            ))),
        }
    }
}

/// Configuration for [`ThumbnailFixer`](crate::ThumbnailFixer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailConfig {
    /// Rule set to run.
    pub strategy: ThumbnailStrategy,

    /// Item types skipped by the `.jpg.jpg` swap. Compared exactly.
    pub exempt_types: Vec<String>,

    /// Size limit in bytes for originals promoted by the swap.
    pub size_threshold: u64,

    /// Field holding the item type.
    pub type_field: MetadataField,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            strategy: ThumbnailStrategy::default(),
            exempt_types: DEFAULT_EXEMPT_TYPES.iter().map(|t| t.to_string()).collect(),
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            type_field: MetadataField::from_dotted(DEFAULT_TYPE_FIELD),
        }
    }
}

impl ThumbnailConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `THUMBNAIL_STRATEGY` - `low-quality` or `jpg-jpg` (default: low-quality)
    /// - `THUMBNAIL_EXEMPT_TYPES` - Comma separated item types (default: Infographic,Map)
    /// - `THUMBNAIL_SIZE_THRESHOLD` - Size limit in bytes (default: 100000)
    /// - `THUMBNAIL_TYPE_FIELD` - Item type field (default: dcterms.type)
    pub fn from_env() -> Result<Self, CurationError> {
        let defaults = Self::default();

        let strategy = match env::var("THUMBNAIL_STRATEGY") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.strategy,
        };

        let exempt_types = match env::var("THUMBNAIL_EXEMPT_TYPES") {
            Ok(value) => parse_list(&value),
            Err(_) => defaults.exempt_types,
        };

        let size_threshold = match env::var("THUMBNAIL_SIZE_THRESHOLD") {
            Ok(value) => value.trim().parse().map_err(|_| {
                CurationError::Configuration(format!(
                    "THUMBNAIL_SIZE_THRESHOLD: invalid size {value:?}"
                ))
            })?,
            Err(_) => defaults.size_threshold,
        };

        let type_field = match env::var("THUMBNAIL_TYPE_FIELD") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.type_field,
        };

        Ok(Self {
            strategy,
            exempt_types,
            size_threshold,
            type_field,
        })
    }

    /// Set the rule set.
    pub fn with_strategy(mut self, strategy: ThumbnailStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replace the exempt item types.
    pub fn with_exempt_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exempt_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the size limit for promoted originals.
    pub fn with_size_threshold(mut self, bytes: u64) -> Self {
        self.size_threshold = bytes;
        self
    }

    /// Set the item type field.
    pub fn with_type_field(mut self, field: MetadataField) -> Self {
        self.type_field = field;
        self
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
