//! The country code tagging task.

use std::sync::Arc;

use async_trait::async_trait;
use country_vocabulary::{LoadError, Vocabularies};
use curation_core::{
    non_item_result, ContentService, CurationError, CurationTask, Handle, TaskResult,
};
use indexmap::IndexSet;
use tracing::{debug, error, info, warn};

use crate::config::TaggerConfig;
use crate::matcher::CountryMatcher;
use crate::outcome::TaggingOutcome;

/// Adds ISO 3166-1 alpha-2 codes for an item's free-text countries.
///
/// The tagger:
/// - Skips items without free-text countries
/// - Skips items that already carry codes, unless `force_update` is set,
///   in which case existing codes are cleared first
/// - Resolves every free-text value against both vocabularies
/// - Writes all resolved codes in one call and persists the item
///
/// Vocabularies are loaded once when the tagger is built and shared by every
/// item of the run.
#[derive(Debug, Clone)]
pub struct CountryCodeTagger {
    config: TaggerConfig,
    matcher: CountryMatcher,
}

impl CountryCodeTagger {
    /// Create a tagger, loading the vocabularies named by the config.
    pub fn new(config: TaggerConfig) -> Result<Self, LoadError> {
        let vocabularies =
            Vocabularies::load(&config.standard_source(), &config.supplementary_source())?;
        Ok(Self::with_vocabularies(config, Arc::new(vocabularies)))
    }

    /// Create a tagger over already loaded vocabularies.
    pub fn with_vocabularies(config: TaggerConfig, vocabularies: Arc<Vocabularies>) -> Self {
        Self {
            config,
            matcher: CountryMatcher::new(vocabularies),
        }
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    pub fn matcher(&self) -> &CountryMatcher {
        &self.matcher
    }

    /// Tag one item.
    ///
    /// Failures of the host are turned into an error outcome so the batch can
    /// go on; only fatal ones are returned as `Err`.
    pub async fn tag(
        &self,
        service: &dyn ContentService,
        item: &Handle,
    ) -> Result<TaggingOutcome, CurationError> {
        match self.try_tag(service, item).await {
            Ok(outcome) => Ok(outcome),
            Err(err) if err.is_fatal() => {
                error!(handle = %item, error = %err, "Fatal error while tagging");
                Err(err)
            }
            Err(err) => {
                warn!(handle = %item, error = %err, "Failed to tag item");
                debug!(handle = %item, error = ?err, "Tagging error details");
                Ok(TaggingOutcome::error(item))
            }
        }
    }

    async fn try_tag(
        &self,
        service: &dyn ContentService,
        item: &Handle,
    ) -> Result<TaggingOutcome, CurationError> {
        let config = &self.config;

        let countries = service.metadata_values(item, &config.country_field).await?;
        if countries.is_empty() {
            debug!(handle = %item, "No free-text countries");
            return Ok(TaggingOutcome::no_input(item));
        }

        if config.force_update {
            debug!(handle = %item, field = %config.alpha2_field, "Clearing existing codes");
            service
                .clear_metadata_values(item, &config.alpha2_field)
                .await?;
        } else {
            let existing = service.metadata_values(item, &config.alpha2_field).await?;
            if !existing.is_empty() {
                debug!(handle = %item, existing = existing.len(), "Item already tagged");
                return Ok(TaggingOutcome::already_tagged(item));
            }
        }

        let mut codes: Vec<String> = countries
            .iter()
            .flat_map(|country| self.matcher.match_country(country))
            .collect();

        if config.deduplicate {
            codes = codes.into_iter().collect::<IndexSet<_>>().into_iter().collect();
        }

        if codes.is_empty() {
            if config.force_update {
                // Make the clear stick even though nothing replaces it.
                service.persist(item).await?;
            }
            info!(handle = %item, countries = ?countries, "No matching countries");
            return Ok(TaggingOutcome::no_match(item));
        }

        service
            .add_metadata_values(item, &config.alpha2_field, &config.language, &codes)
            .await?;
        service.persist(item).await?;

        info!(handle = %item, codes = ?codes, "Added alpha-2 country codes");
        Ok(TaggingOutcome::added(item, codes.len()))
    }
}

#[async_trait]
impl CurationTask for CountryCodeTagger {
    fn name(&self) -> &str {
        "country-code-tagger"
    }

    async fn perform(
        &self,
        service: &dyn ContentService,
        item: &Handle,
    ) -> Result<TaskResult, CurationError> {
        if let Some(result) = non_item_result(service, item).await? {
            return Ok(result);
        }
        self.tag(service, item).await.map(TaskResult::from)
    }
}
