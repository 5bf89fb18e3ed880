//! Report sinks for per-item result lines.

use std::sync::Mutex;

use tracing::info;

/// Destination for the human readable lines a batch produces.
pub trait ReportSink: Send + Sync {
    /// Record one line.
    fn report(&self, line: &str);
}

/// Emits every line as an `info` event.
#[derive(Debug, Clone, Default)]
pub struct TracingReporter;

impl ReportSink for TracingReporter {
    fn report(&self, line: &str) {
        info!(target: "curation::report", "{}", line);
    }
}

/// Keeps every line in memory.
///
/// Useful for tests and for callers that render the report themselves.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<String>>,
}

impl MemoryReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every line reported so far.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ReportSink for MemoryReporter {
    fn report(&self, line: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line.to_string()),
            Err(poisoned) => poisoned.into_inner().push(line.to_string()),
        }
    }
}
