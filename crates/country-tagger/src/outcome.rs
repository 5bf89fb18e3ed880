//! Result of tagging one item.

use curation_core::{CurationStatus, Handle, TaskResult};

/// What happened to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaggingStatus {
    /// The item has no free-text country values.
    SkippedNoInput,
    /// The item already has alpha-2 codes and no forced update was requested.
    SkippedAlreadyTagged,
    /// The item was processed, whether or not anything matched.
    Success,
    /// Reading or writing the item failed.
    Error,
}

/// Outcome of [`CountryCodeTagger::tag`](crate::CountryCodeTagger::tag).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggingOutcome {
    pub handle: Handle,
    pub status: TaggingStatus,
    pub message: String,
    /// Number of codes written.
    pub added: usize,
}

impl TaggingOutcome {
    pub(crate) fn no_input(handle: &Handle) -> Self {
        Self::new(
            handle,
            TaggingStatus::SkippedNoInput,
            format!("{}: no countries, skipping.", handle),
            0,
        )
    }

    pub(crate) fn already_tagged(handle: &Handle) -> Self {
        Self::new(
            handle,
            TaggingStatus::SkippedAlreadyTagged,
            format!("{}: item has country codes, skipping", handle),
            0,
        )
    }

    pub(crate) fn added(handle: &Handle, added: usize) -> Self {
        Self::new(
            handle,
            TaggingStatus::Success,
            format!("{}: added {} alpha2 country code(s)", handle, added),
            added,
        )
    }

    pub(crate) fn no_match(handle: &Handle) -> Self {
        Self::new(
            handle,
            TaggingStatus::Success,
            format!("{}: no matching countries found", handle),
            0,
        )
    }

    pub(crate) fn error(handle: &Handle) -> Self {
        Self::new(handle, TaggingStatus::Error, format!("{}: error", handle), 0)
    }

    fn new(handle: &Handle, status: TaggingStatus, message: String, added: usize) -> Self {
        Self {
            handle: handle.clone(),
            status,
            message,
            added,
        }
    }

    /// Host status code category.
    pub fn curation_status(&self) -> CurationStatus {
        match self.status {
            TaggingStatus::SkippedNoInput | TaggingStatus::SkippedAlreadyTagged => {
                CurationStatus::Skip
            }
            TaggingStatus::Success => CurationStatus::Success,
            TaggingStatus::Error => CurationStatus::Error,
        }
    }
}

impl From<TaggingOutcome> for TaskResult {
    fn from(outcome: TaggingOutcome) -> Self {
        let status = outcome.curation_status();
        TaskResult::new(outcome.handle, status, outcome.message)
    }
}
