//! Totals for a finished run.

use std::fmt;

use curation_core::{CurationStatus, TaskResult};

/// Results of a batch run, in visiting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub results: Vec<TaskResult>,
    pub success: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one item's result to the totals.
    pub fn record(&mut self, result: TaskResult) {
        match result.status {
            CurationStatus::Success => self.success += 1,
            CurationStatus::Skip => self.skipped += 1,
            CurationStatus::Error => self.errors += 1,
            CurationStatus::Unset => {}
        }
        self.results.push(result);
    }

    /// Number of items visited.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} item(s): {} success, {} skipped, {} error(s)",
            self.total(),
            self.success,
            self.skipped,
            self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curation_core::Handle;

    #[test]
    fn test_record_tallies_statuses() {
        let mut summary = BatchSummary::new();
        summary.record(TaskResult::success(Handle::new("1/1"), "ok"));
        summary.record(TaskResult::skip(Handle::new("1/2"), "skip"));
        summary.record(TaskResult::skip(Handle::new("1/3"), "skip"));
        summary.record(TaskResult::error(Handle::new("1/4"), "error"));
        summary.record(TaskResult::new(Handle::new("1/5"), CurationStatus::Unset, "?"));

        assert_eq!(summary.total(), 5);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.errors, 1);
        assert!(summary.has_errors());
        assert_eq!(
            summary.to_string(),
            "5 item(s): 1 success, 2 skipped, 1 error(s)"
        );
    }
}
