//! The thumbnail cleanup task.

use async_trait::async_trait;
use curation_core::{
    non_item_result, BundleRole, ContentService, CurationError, CurationTask, Handle, TaskResult,
};
use tracing::{debug, error, info, warn};

use crate::config::{ThumbnailConfig, ThumbnailStrategy};
use crate::rules::{
    exempt_type, plan_jpg_jpg_swap, plan_original_cleanup, plan_thumbnail_cleanup,
    ThumbnailDecision,
};

enum Plan {
    Apply(Vec<ThumbnailDecision>),
    /// The item carries this exempt type.
    Exempt(String),
}

/// Applies the configured thumbnail rules to items.
///
/// Decisions are applied one bitstream at a time. A failed mutation is
/// reported and the remaining decisions are still attempted; the item is
/// persisted once if anything changed.
#[derive(Debug, Clone, Default)]
pub struct ThumbnailFixer {
    config: ThumbnailConfig,
}

impl ThumbnailFixer {
    pub fn new(config: ThumbnailConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ThumbnailConfig {
        &self.config
    }

    /// Evaluate the rules for one item without changing it.
    async fn plan(&self, service: &dyn ContentService, item: &Handle) -> Result<Plan, CurationError> {
        let thumbnails = service.bitstreams(item, BundleRole::Thumbnail).await?;
        let originals = service.bitstreams(item, BundleRole::Original).await?;

        match self.config.strategy {
            ThumbnailStrategy::LowQuality => {
                let mut decisions = plan_thumbnail_cleanup(&thumbnails);
                decisions.extend(plan_original_cleanup(&originals));
                Ok(Plan::Apply(decisions))
            }
            ThumbnailStrategy::JpgJpg => {
                let types = service
                    .metadata_values(item, &self.config.type_field)
                    .await?;
                if let Some(exempt) = exempt_type(&types, &self.config.exempt_types) {
                    return Ok(Plan::Exempt(exempt.to_string()));
                }
                Ok(Plan::Apply(plan_jpg_jpg_swap(
                    &originals,
                    &thumbnails,
                    self.config.size_threshold,
                )))
            }
        }
    }

    /// Clean up the thumbnails of one item.
    ///
    /// Only fatal errors are returned as `Err`; anything else ends up in an
    /// error result.
    pub async fn fix(
        &self,
        service: &dyn ContentService,
        item: &Handle,
    ) -> Result<TaskResult, CurationError> {
        match self.try_fix(service, item).await {
            Ok(result) => Ok(result),
            Err(err) if err.is_fatal() => {
                error!(handle = %item, error = %err, "Fatal error while fixing thumbnails");
                Err(err)
            }
            Err(err) => {
                warn!(handle = %item, error = %err, "Failed to fix thumbnails");
                Ok(TaskResult::error(item.clone(), format!("{}: error ({})", item, err)))
            }
        }
    }

    async fn try_fix(
        &self,
        service: &dyn ContentService,
        item: &Handle,
    ) -> Result<TaskResult, CurationError> {
        let decisions = match self.plan(service, item).await? {
            Plan::Apply(decisions) => decisions,
            Plan::Exempt(item_type) => {
                info!(handle = %item, item_type = %item_type, "Item type is exempt from thumbnail fixes");
                return Ok(TaskResult::skip(
                    item.clone(),
                    format!("{}: item has an exempt type ({}), skipping.", item, item_type),
                ));
            }
        };

        let mut details = Vec::with_capacity(decisions.len());
        let mut applied = 0usize;
        let mut failed = 0usize;
        // Set once any host mutation succeeded, even inside a failed decision.
        let mut touched = false;

        for decision in &decisions {
            let line = decision.describe(item);
            if !decision.is_action() {
                debug!(handle = %item, bitstream = %decision.bitstream().name, "Keeping bitstream");
                details.push(line);
                continue;
            }

            match apply(service, item, decision).await {
                Ok(()) => {
                    info!(handle = %item, action = %line, "Applied thumbnail fix");
                    applied += 1;
                    touched = true;
                    details.push(line);
                }
                Err(failure) if failure.error.is_fatal() => return Err(failure.error),
                Err(failure) => {
                    warn!(
                        handle = %item,
                        action = %line,
                        completed = ?failure.completed,
                        error = %failure.error,
                        "Thumbnail fix failed"
                    );
                    failed += 1;
                    if failure.completed.is_empty() {
                        details.push(format!("{} failed: {}", line, failure.error));
                    } else {
                        touched = true;
                        details.push(format!(
                            "{} failed after {}: {}",
                            line,
                            failure.completed.join(", "),
                            failure.error
                        ));
                    }
                }
            }
        }

        if touched {
            match service.persist(item).await {
                Ok(()) => {}
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!(handle = %item, error = %err, "Failed to save item");
                    failed += 1;
                    details.push(format!("{}: saving failed: {}", item, err));
                }
            }
        }

        let result = if failed > 0 {
            TaskResult::error(
                item.clone(),
                format!("{}: {} thumbnail change(s) failed", item, failed),
            )
        } else if applied > 0 {
            TaskResult::success(
                item.clone(),
                format!("{}: {} thumbnail change(s) applied", item, applied),
            )
        } else {
            TaskResult::skip(item.clone(), format!("{}: no thumbnail changes needed", item))
        };

        Ok(result.with_details(details))
    }
}

/// A decision that failed, with the host calls that succeeded before it.
struct ApplyFailure {
    completed: Vec<String>,
    error: CurationError,
}

impl ApplyFailure {
    fn new(completed: Vec<String>, error: CurationError) -> Self {
        Self { completed, error }
    }
}

async fn apply(
    service: &dyn ContentService,
    item: &Handle,
    decision: &ThumbnailDecision,
) -> Result<(), ApplyFailure> {
    match decision {
        ThumbnailDecision::Remove { role, bitstream } => service
            .remove_from_role(item, *role, &bitstream.id)
            .await
            .map_err(|err| ApplyFailure::new(Vec::new(), err)),
        ThumbnailDecision::Swap {
            original,
            thumbnail,
        } => {
            let mut completed = Vec::new();

            if let Err(err) = service
                .add_to_role(item, BundleRole::Thumbnail, &original.id)
                .await
            {
                return Err(ApplyFailure::new(completed, err));
            }
            completed.push(format!("promoting {} to {}", original.name, BundleRole::Thumbnail));

            if let Err(err) = service
                .remove_from_role(item, BundleRole::Original, &original.id)
                .await
            {
                return Err(ApplyFailure::new(completed, err));
            }
            completed.push(format!("removing {} from {}", original.name, BundleRole::Original));

            service
                .remove_from_role(item, BundleRole::Thumbnail, &thumbnail.id)
                .await
                .map_err(|err| ApplyFailure::new(completed, err))
        }
        ThumbnailDecision::Keep { .. } => Ok(()),
    }
}

#[async_trait]
impl CurationTask for ThumbnailFixer {
    fn name(&self) -> &str {
        "thumbnail-fixer"
    }

    async fn perform(
        &self,
        service: &dyn ContentService,
        item: &Handle,
    ) -> Result<TaskResult, CurationError> {
        if let Some(result) = non_item_result(service, item).await? {
            return Ok(result);
        }
        self.fix(service, item).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{GENERATED_THUMBNAIL, IM_THUMBNAIL};
    use curation_core::{Bitstream, CurationStatus, MetadataField, ResolvedObject};
    use memory_repository::{InMemoryRepository, ItemRecord, RepositorySnapshot};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Delegates to an in-memory repository but refuses to drop anything
    /// from the ORIGINAL bundle.
    struct LockedOriginals {
        inner: InMemoryRepository,
        persists: AtomicUsize,
    }

    impl LockedOriginals {
        fn new(inner: InMemoryRepository) -> Self {
            Self {
                inner,
                persists: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ContentService for LockedOriginals {
        async fn resolve(&self, handle: &Handle) -> curation_core::Result<Option<ResolvedObject>> {
            self.inner.resolve(handle).await
        }

        async fn all_items(&self) -> curation_core::Result<Vec<Handle>> {
            self.inner.all_items().await
        }

        async fn community_collections(&self, community: &Handle) -> curation_core::Result<Vec<Handle>> {
            self.inner.community_collections(community).await
        }

        async fn collection_items(&self, collection: &Handle) -> curation_core::Result<Vec<Handle>> {
            self.inner.collection_items(collection).await
        }

        async fn metadata_values(
            &self,
            item: &Handle,
            field: &MetadataField,
        ) -> curation_core::Result<Vec<String>> {
            self.inner.metadata_values(item, field).await
        }

        async fn add_metadata_values(
            &self,
            item: &Handle,
            field: &MetadataField,
            language: &str,
            values: &[String],
        ) -> curation_core::Result<()> {
            self.inner.add_metadata_values(item, field, language, values).await
        }

        async fn clear_metadata_values(
            &self,
            item: &Handle,
            field: &MetadataField,
        ) -> curation_core::Result<()> {
            self.inner.clear_metadata_values(item, field).await
        }

        async fn persist(&self, item: &Handle) -> curation_core::Result<()> {
            self.persists.fetch_add(1, Ordering::SeqCst);
            self.inner.persist(item).await
        }

        async fn bitstreams(&self, item: &Handle, role: BundleRole) -> curation_core::Result<Vec<Bitstream>> {
            self.inner.bitstreams(item, role).await
        }

        async fn add_to_role(
            &self,
            item: &Handle,
            role: BundleRole,
            bitstream_id: &str,
        ) -> curation_core::Result<()> {
            self.inner.add_to_role(item, role, bitstream_id).await
        }

        async fn remove_from_role(
            &self,
            item: &Handle,
            role: BundleRole,
            bitstream_id: &str,
        ) -> curation_core::Result<()> {
            if role == BundleRole::Original {
                return Err(CurationError::Storage("ORIGINAL bundle is locked".into()));
            }
            self.inner.remove_from_role(item, role, bitstream_id).await
        }
    }

    fn repository(item: ItemRecord) -> InMemoryRepository {
        InMemoryRepository::new(RepositorySnapshot::default().with_item(item))
    }

    async fn names(repo: &InMemoryRepository, item: &Handle, role: BundleRole) -> Vec<String> {
        repo.bitstreams(item, role)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect()
    }

    fn pdf_item(handle: &str) -> ItemRecord {
        ItemRecord::new(handle)
            .with_bitstream(
                BundleRole::Original,
                Bitstream::new("o1", "report.pdf", "application/pdf", 800_000),
            )
            .with_bitstream(
                BundleRole::Original,
                Bitstream::new("o2", "thumbnail.jpg", "image/jpeg", 30_000)
                    .with_description("Thumbnail"),
            )
            .with_bitstream(
                BundleRole::Thumbnail,
                Bitstream::new("t1", "report.pdf.jpg", "image/jpeg", 9_000)
                    .with_description(IM_THUMBNAIL),
            )
            .with_bitstream(
                BundleRole::Thumbnail,
                Bitstream::new("t2", "thumbnail.jpg.jpg", "image/jpeg", 9_000)
                    .with_description(GENERATED_THUMBNAIL),
            )
    }

    fn jpg_item(handle: &str) -> ItemRecord {
        ItemRecord::new(handle)
            .with_bitstream(
                BundleRole::Original,
                Bitstream::new("o1", "photo.jpg", "image/jpeg", 40_000),
            )
            .with_bitstream(
                BundleRole::Thumbnail,
                Bitstream::new("t1", "photo.jpg.jpg", "image/jpeg", 60_000)
                    .with_description(GENERATED_THUMBNAIL),
            )
    }

    fn jpg_jpg() -> ThumbnailFixer {
        ThumbnailFixer::new(ThumbnailConfig::default().with_strategy(ThumbnailStrategy::JpgJpg))
    }

    #[tokio::test]
    async fn test_low_quality_cleanup() {
        let repo = repository(pdf_item("10568/1"));
        let item = Handle::new("10568/1");

        let result = ThumbnailFixer::default().fix(&repo, &item).await.unwrap();

        assert_eq!(result.status, CurationStatus::Success);
        assert_eq!(result.message, "10568/1: 2 thumbnail change(s) applied");
        assert_eq!(
            result.details,
            vec![
                "10568/1: keeping \"report.pdf.jpg\" (IM Thumbnail) in THUMBNAIL",
                "10568/1: removing \"thumbnail.jpg.jpg\" (Generated Thumbnail) from THUMBNAIL",
                "10568/1: removing \"thumbnail.jpg\" (Thumbnail) from ORIGINAL",
            ]
        );
        assert_eq!(names(&repo, &item, BundleRole::Thumbnail).await, vec!["report.pdf.jpg"]);
        assert_eq!(names(&repo, &item, BundleRole::Original).await, vec!["report.pdf"]);
    }

    #[tokio::test]
    async fn test_clean_item_is_skipped_without_writes() {
        let repo = repository(
            ItemRecord::new("10568/2").with_bitstream(
                BundleRole::Original,
                Bitstream::new("o1", "report.pdf", "application/pdf", 800_000),
            ),
        );

        let result = ThumbnailFixer::default()
            .fix(&repo, &Handle::new("10568/2"))
            .await
            .unwrap();

        assert_eq!(result.status, CurationStatus::Skip);
        assert_eq!(result.message, "10568/2: no thumbnail changes needed");
        assert!(result.details.is_empty());
        assert_eq!(repo.write_count().await, 0);
    }

    #[tokio::test]
    async fn test_second_run_changes_nothing() {
        let repo = repository(pdf_item("10568/3"));
        let item = Handle::new("10568/3");
        let fixer = ThumbnailFixer::default();

        fixer.fix(&repo, &item).await.unwrap();
        let writes = repo.write_count().await;
        let second = fixer.fix(&repo, &item).await.unwrap();

        assert_eq!(second.status, CurationStatus::Skip);
        assert_eq!(repo.write_count().await, writes);
    }

    #[tokio::test]
    async fn test_jpg_jpg_swap() {
        let repo = repository(jpg_item("10568/4"));
        let item = Handle::new("10568/4");

        let result = jpg_jpg().fix(&repo, &item).await.unwrap();

        assert_eq!(result.status, CurationStatus::Success);
        assert_eq!(
            result.details,
            vec!["10568/4: replacing photo.jpg.jpg (Generated Thumbnail) with photo.jpg"]
        );
        assert!(names(&repo, &item, BundleRole::Original).await.is_empty());
        assert_eq!(names(&repo, &item, BundleRole::Thumbnail).await, vec!["photo.jpg"]);
    }

    #[tokio::test]
    async fn test_exempt_type_is_skipped() {
        let repo = repository(jpg_item("10568/5").with_metadata("dcterms.type", "Map"));
        let item = Handle::new("10568/5");

        let result = jpg_jpg().fix(&repo, &item).await.unwrap();

        assert_eq!(result.status, CurationStatus::Skip);
        assert_eq!(result.message, "10568/5: item has an exempt type (Map), skipping.");
        assert_eq!(names(&repo, &item, BundleRole::Original).await, vec!["photo.jpg"]);
        assert_eq!(repo.write_count().await, 0);
    }

    #[tokio::test]
    async fn test_exempt_types_are_configurable() {
        let repo = repository(jpg_item("10568/6").with_metadata("dcterms.type", "Map"));
        let fixer = ThumbnailFixer::new(
            ThumbnailConfig::default()
                .with_strategy(ThumbnailStrategy::JpgJpg)
                .with_exempt_types(["Infographic"]),
        );

        let result = fixer.fix(&repo, &Handle::new("10568/6")).await.unwrap();

        assert_eq!(result.status, CurationStatus::Success);
    }

    #[tokio::test]
    async fn test_failed_mutations_are_reported() {
        let repo = repository(pdf_item("10568/7"));
        repo.fail_writes_for("10568/7").await;
        let item = Handle::new("10568/7");

        let result = ThumbnailFixer::default().fix(&repo, &item).await.unwrap();

        assert_eq!(result.status, CurationStatus::Error);
        assert_eq!(result.message, "10568/7: 2 thumbnail change(s) failed");
        let failures = result
            .details
            .iter()
            .filter(|line| line.contains("failed: not authorized"))
            .count();
        assert_eq!(failures, 2);
        assert_eq!(names(&repo, &item, BundleRole::Thumbnail).await.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_item_is_an_error_result() {
        let repo = InMemoryRepository::new(RepositorySnapshot::default());

        let result = ThumbnailFixer::default()
            .fix(&repo, &Handle::new("10568/404"))
            .await
            .unwrap();

        assert_eq!(result.status, CurationStatus::Error);
        assert_eq!(result.message, "10568/404: error (item not found: 10568/404)");
    }

    #[tokio::test]
    async fn test_lost_connection_is_returned() {
        let repo = repository(pdf_item("10568/8"));
        repo.disconnect().await;

        let err = ThumbnailFixer::default()
            .perform(&repo, &Handle::new("10568/8"))
            .await
            .unwrap_err();

        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_partial_swap_is_persisted_and_reported() {
        let service = LockedOriginals::new(repository(jpg_item("10568/9")));
        let item = Handle::new("10568/9");

        let result = jpg_jpg().fix(&service, &item).await.unwrap();

        assert_eq!(result.status, CurationStatus::Error);
        assert_eq!(result.details.len(), 1);
        assert!(result.details[0].contains("failed after promoting photo.jpg to THUMBNAIL"));
        assert!(result.details[0].ends_with("storage error: ORIGINAL bundle is locked"));
        assert_eq!(service.persists.load(Ordering::SeqCst), 1);
        assert_eq!(
            names(&service.inner, &item, BundleRole::Thumbnail).await,
            vec!["photo.jpg.jpg", "photo.jpg"]
        );
        assert_eq!(names(&service.inner, &item, BundleRole::Original).await, vec!["photo.jpg"]);
    }

    #[tokio::test]
    async fn test_collection_handle_is_unset() {
        let repo = InMemoryRepository::new(
            RepositorySnapshot::default()
                .with_item(pdf_item("10568/11"))
                .with_collection("10568/10", &["10568/11"]),
        );

        let result = ThumbnailFixer::default()
            .perform(&repo, &Handle::new("10568/10"))
            .await
            .unwrap();

        assert_eq!(result.status, CurationStatus::Unset);
        assert_eq!(result.message, "10568/10: not an item, skipping");
        assert_eq!(repo.write_count().await, 0);
    }
}
