//! Vocabulary loading errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::record::Provenance;

/// Errors that can occur while loading a vocabulary document.
///
/// Every variant is fatal to a run: no item can be tagged correctly without
/// its reference data.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document could not be read.
    #[error("failed to read {provenance} vocabulary from {}: {source}", .path.display())]
    Io {
        provenance: Provenance,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON of the expected shape.
    #[error("malformed {provenance} vocabulary: {source}")]
    Malformed {
        provenance: Provenance,
        #[source]
        source: serde_json::Error,
    },

    /// A record lacks a required field.
    #[error("{provenance} vocabulary record {index} is missing required field `{field}`")]
    MissingField {
        provenance: Provenance,
        index: usize,
        field: &'static str,
    },

    /// A required field has the wrong shape.
    #[error("{provenance} vocabulary record {index} has invalid `{field}`: {value:?}")]
    InvalidField {
        provenance: Provenance,
        index: usize,
        field: &'static str,
        value: String,
    },

    /// Two records share an alpha-2 code.
    #[error("{provenance} vocabulary has duplicate alpha_2 code {alpha2}")]
    DuplicateAlpha2 {
        provenance: Provenance,
        alpha2: String,
    },

    /// A vocabulary was parsed as the wrong kind for its slot.
    #[error("expected {expected} vocabulary, got {found}")]
    ProvenanceMismatch {
        expected: Provenance,
        found: Provenance,
    },
}
