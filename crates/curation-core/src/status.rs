//! Per-item status codes and results.

use std::fmt;

use crate::model::Handle;

/// Outcome category of running a task on one object.
///
/// The integer codes match the ones the host's curation runner expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurationStatus {
    /// No status was set.
    Unset,
    /// The task failed on this object.
    Error,
    /// The task ran and did its work.
    Success,
    /// The task decided the object needed nothing.
    Skip,
}

impl CurationStatus {
    /// Host status code.
    pub fn code(&self) -> i32 {
        match self {
            CurationStatus::Unset => -2,
            CurationStatus::Error => -1,
            CurationStatus::Success => 0,
            CurationStatus::Skip => 2,
        }
    }
}

impl fmt::Display for CurationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CurationStatus::Unset => "unset",
            CurationStatus::Error => "error",
            CurationStatus::Success => "success",
            CurationStatus::Skip => "skip",
        };
        f.write_str(label)
    }
}

/// Result of running a task on one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    /// The item the task ran on.
    pub handle: Handle,
    /// Status code for the host.
    pub status: CurationStatus,
    /// One-line human readable summary.
    pub message: String,
    /// Per-action lines, reported before the summary.
    pub details: Vec<String>,
}

impl TaskResult {
    /// Create a result with the given status and message.
    pub fn new(handle: Handle, status: CurationStatus, message: impl Into<String>) -> Self {
        Self {
            handle,
            status,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Create a successful result.
    pub fn success(handle: Handle, message: impl Into<String>) -> Self {
        Self::new(handle, CurationStatus::Success, message)
    }

    /// Create a skipped result.
    pub fn skip(handle: Handle, message: impl Into<String>) -> Self {
        Self::new(handle, CurationStatus::Skip, message)
    }

    /// Create a failed result.
    pub fn error(handle: Handle, message: impl Into<String>) -> Self {
        Self::new(handle, CurationStatus::Error, message)
    }

    /// Attach per-action detail lines.
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CurationStatus::Unset.code(), -2);
        assert_eq!(CurationStatus::Error.code(), -1);
        assert_eq!(CurationStatus::Success.code(), 0);
        assert_eq!(CurationStatus::Skip.code(), 2);
    }

    #[test]
    fn test_result_constructors() {
        let result = TaskResult::skip(Handle::new("10568/1"), "10568/1: no countries, skipping.");
        assert_eq!(result.status, CurationStatus::Skip);
        assert!(result.details.is_empty());

        let result = TaskResult::success(Handle::new("10568/2"), "done")
            .with_details(vec!["one".into(), "two".into()]);
        assert_eq!(result.status, CurationStatus::Success);
        assert_eq!(result.details.len(), 2);
    }
}
