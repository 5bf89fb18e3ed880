//! The CurationTask trait definition.

use async_trait::async_trait;

use crate::error::CurationError;
use crate::model::{Handle, ResolvedObject};
use crate::service::ContentService;
use crate::status::{CurationStatus, TaskResult};

/// A unit of curation work applied to one item at a time.
///
/// This trait is object-safe and can be used with `&dyn CurationTask`.
#[async_trait]
pub trait CurationTask: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Run the task on one item.
    ///
    /// Per-item failures are reported through the returned [`TaskResult`]
    /// with an error status. `Err` is reserved for failures that should stop
    /// the whole batch, see [`CurationError::is_fatal`]. A handle naming the
    /// site, a community or a collection yields an `Unset` result.
    async fn perform(
        &self,
        service: &dyn ContentService,
        item: &Handle,
    ) -> Result<TaskResult, CurationError>;
}

/// An `Unset` result if `handle` names something other than an item.
///
/// Items and unknown handles give `None` so the task itself reports them.
/// Only fatal errors from the host are returned.
pub async fn non_item_result(
    service: &dyn ContentService,
    handle: &Handle,
) -> Result<Option<TaskResult>, CurationError> {
    match service.resolve(handle).await {
        Ok(Some(ResolvedObject::Item(_))) | Ok(None) => Ok(None),
        Ok(Some(_)) => Ok(Some(TaskResult::new(
            handle.clone(),
            CurationStatus::Unset,
            format!("{}: not an item, skipping", handle),
        ))),
        Err(err) if err.is_fatal() => Err(err),
        Err(_) => Ok(None),
    }
}
