//! Expanding a root object into items and running a task over them.

use std::fmt;
use std::sync::Arc;

use curation_core::{
    ContentService, CurationError, CurationTask, Handle, ReportSink, ResolvedObject, TaskResult,
};
use indexmap::IndexSet;
use tracing::{debug, error, info, warn};

use crate::summary::BatchSummary;

/// Where a batch starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootSelector {
    /// Every item in the repository.
    Site,
    /// Whatever the handle resolves to: site, community, collection or item.
    Handle(Handle),
}

impl RootSelector {
    /// `Site` for a missing or blank handle.
    pub fn from_option(handle: Option<&str>) -> Self {
        match handle.map(str::trim) {
            Some(handle) if !handle.is_empty() => RootSelector::Handle(Handle::new(handle)),
            _ => RootSelector::Site,
        }
    }
}

impl fmt::Display for RootSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootSelector::Site => f.write_str("site"),
            RootSelector::Handle(handle) => write!(f, "{}", handle),
        }
    }
}

/// Runs curation tasks against a content service.
pub struct BatchRunner {
    service: Arc<dyn ContentService>,
    reporter: Arc<dyn ReportSink>,
}

impl BatchRunner {
    pub fn new(service: Arc<dyn ContentService>, reporter: Arc<dyn ReportSink>) -> Self {
        Self { service, reporter }
    }

    pub fn service(&self) -> &Arc<dyn ContentService> {
        &self.service
    }

    /// Every item under `root`, each once, in a stable order.
    ///
    /// A handle that resolves to nothing is an error; no item is touched.
    pub async fn items(&self, root: &RootSelector) -> Result<IndexSet<Handle>, CurationError> {
        let resolved = match root {
            RootSelector::Site => ResolvedObject::Site,
            RootSelector::Handle(handle) => {
                self.service
                    .resolve(handle)
                    .await?
                    .ok_or_else(|| CurationError::NotFound {
                        kind: "object",
                        id: handle.to_string(),
                    })?
            }
        };

        let mut items = IndexSet::new();
        match resolved {
            ResolvedObject::Site => {
                items.extend(self.service.all_items().await?);
            }
            ResolvedObject::Community(community) => {
                for collection in self.service.community_collections(&community).await? {
                    items.extend(self.service.collection_items(&collection).await?);
                }
            }
            ResolvedObject::Collection(collection) => {
                items.extend(self.service.collection_items(&collection).await?);
            }
            ResolvedObject::Item(item) => {
                items.insert(item);
            }
        }

        debug!(root = %root, count = items.len(), "Collected items");
        Ok(items)
    }

    /// Run `task` on every item under `root`.
    ///
    /// Each result's detail lines and message go to the reporter as soon as
    /// the item is done. The host is committed once at the end.
    pub async fn run(
        &self,
        task: &dyn CurationTask,
        root: &RootSelector,
    ) -> Result<BatchSummary, CurationError> {
        let items = self.items(root).await?;
        info!(task = task.name(), root = %root, items = items.len(), "Starting batch");

        let mut summary = BatchSummary::new();
        for item in &items {
            let result = match task.perform(self.service.as_ref(), item).await {
                Ok(result) => result,
                Err(err) if err.is_fatal() => {
                    error!(task = task.name(), handle = %item, error = %err, "Aborting batch");
                    return Err(err);
                }
                Err(err) => {
                    warn!(task = task.name(), handle = %item, error = %err, "Task failed on item");
                    TaskResult::error(item.clone(), format!("{}: error ({})", item, err))
                }
            };

            for line in &result.details {
                self.reporter.report(line);
            }
            self.reporter.report(&result.message);
            summary.record(result);
        }

        self.service.commit().await?;

        info!(
            task = task.name(),
            total = summary.total(),
            success = summary.success,
            skipped = summary.skipped,
            errors = summary.errors,
            "Batch finished"
        );
        Ok(summary)
    }
}
