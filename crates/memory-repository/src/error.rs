//! Snapshot loading errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing a repository snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file could not be read or written.
    #[error("snapshot I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON of the expected shape.
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
