//! Error types for host repository operations.

use thiserror::Error;

/// Errors that can occur while talking to the host repository.
#[derive(Debug, Error)]
pub enum CurationError {
    /// The current context may not modify the object.
    #[error("not authorized: {0}")]
    Authorization(String),

    /// The host failed to read or write an object.
    #[error("storage error: {0}")]
    Storage(String),

    /// The referenced object does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A metadata field key could not be parsed.
    #[error("invalid metadata field: {0}")]
    InvalidField(String),

    /// A configuration value is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The connection to the underlying data store was lost.
    #[error("connection lost: {0}")]
    Connection(String),
}

impl CurationError {
    /// Whether this error should abort the whole batch.
    ///
    /// Everything except a lost connection is handled per item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CurationError::Connection(_))
    }
}

/// Result type for host operations.
pub type Result<T> = std::result::Result<T, CurationError>;
