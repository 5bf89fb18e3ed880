//! Batch traversal for curation tasks.
//!
//! [`BatchRunner`] expands a [`RootSelector`] into the items below it, runs a
//! [`CurationTask`](curation_core::CurationTask) on each one in order, and
//! forwards every result to a [`ReportSink`](curation_core::ReportSink).
//!
//! Per-item errors are reported and the run goes on. Only a fatal error from
//! the host stops the run; items already persisted stay persisted.

mod runner;
mod summary;

pub use runner::{BatchRunner, RootSelector};
pub use summary::BatchSummary;
