//! Configuration for the country code tagger.

use std::env;
use std::path::PathBuf;

use country_vocabulary::VocabularySource;
use curation_core::{CurationError, MetadataField};

/// Default field holding free-text country names.
pub const DEFAULT_COUNTRY_FIELD: &str = "cg.coverage.country";

/// Default field receiving alpha-2 codes.
pub const DEFAULT_ALPHA2_FIELD: &str = "cg.coverage.iso3166-alpha2";

/// Default language of written values.
pub const DEFAULT_LANGUAGE: &str = "en_US";

/// Configuration for [`CountryCodeTagger`](crate::CountryCodeTagger).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggerConfig {
    /// Field to read free-text country names from.
    pub country_field: MetadataField,

    /// Field to write alpha-2 codes to.
    pub alpha2_field: MetadataField,

    /// Clear existing codes and tag again, instead of skipping tagged items.
    pub force_update: bool,

    /// Language of the written values.
    pub language: String,

    /// Drop repeated codes before writing.
    /// Default: false (a name matching both vocabularies is written twice).
    pub deduplicate: bool,

    /// ISO 3166-1 document. `None` uses the bundled copy.
    pub standard_vocabulary: Option<PathBuf>,

    /// Local names document. `None` uses the bundled copy.
    pub supplementary_vocabulary: Option<PathBuf>,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            country_field: MetadataField::from_dotted(DEFAULT_COUNTRY_FIELD),
            alpha2_field: MetadataField::from_dotted(DEFAULT_ALPHA2_FIELD),
            force_update: false,
            language: DEFAULT_LANGUAGE.to_string(),
            deduplicate: false,
            standard_vocabulary: None,
            supplementary_vocabulary: None,
        }
    }
}

impl TaggerConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `COUNTRY_TAGGER_FIELD` - Free-text country field (default: cg.coverage.country)
    /// - `COUNTRY_TAGGER_ALPHA2_FIELD` - Alpha-2 field (default: cg.coverage.iso3166-alpha2)
    /// - `COUNTRY_TAGGER_FORCE_UPDATE` - Re-tag items that already have codes (default: false)
    /// - `COUNTRY_TAGGER_LANGUAGE` - Language of written values (default: en_US)
    /// - `COUNTRY_TAGGER_DEDUPLICATE` - Drop repeated codes (default: false)
    /// - `COUNTRY_TAGGER_ISO3166_PATH` - ISO 3166-1 JSON document (default: bundled)
    /// - `COUNTRY_TAGGER_LOCAL_PATH` - Local country names JSON document (default: bundled)
    pub fn from_env() -> Result<Self, CurationError> {
        let defaults = Self::default();

        let country_field = match env::var("COUNTRY_TAGGER_FIELD") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.country_field,
        };

        let alpha2_field = match env::var("COUNTRY_TAGGER_ALPHA2_FIELD") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.alpha2_field,
        };

        let force_update = env_bool("COUNTRY_TAGGER_FORCE_UPDATE")?.unwrap_or(false);
        let deduplicate = env_bool("COUNTRY_TAGGER_DEDUPLICATE")?.unwrap_or(false);

        let language =
            env::var("COUNTRY_TAGGER_LANGUAGE").unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string());

        let standard_vocabulary = env::var("COUNTRY_TAGGER_ISO3166_PATH").ok().map(PathBuf::from);
        let supplementary_vocabulary =
            env::var("COUNTRY_TAGGER_LOCAL_PATH").ok().map(PathBuf::from);

        Ok(Self {
            country_field,
            alpha2_field,
            force_update,
            language,
            deduplicate,
            standard_vocabulary,
            supplementary_vocabulary,
        })
    }

    /// Set the free-text country field.
    pub fn with_country_field(mut self, field: MetadataField) -> Self {
        self.country_field = field;
        self
    }

    /// Set the alpha-2 field.
    pub fn with_alpha2_field(mut self, field: MetadataField) -> Self {
        self.alpha2_field = field;
        self
    }

    /// Set whether tagged items are cleared and tagged again.
    pub fn with_force_update(mut self, force_update: bool) -> Self {
        self.force_update = force_update;
        self
    }

    /// Set whether repeated codes are dropped.
    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    /// Set the language of written values.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Read the ISO 3166-1 document from a file.
    pub fn with_standard_vocabulary(mut self, path: impl Into<PathBuf>) -> Self {
        self.standard_vocabulary = Some(path.into());
        self
    }

    /// Read the local names document from a file.
    pub fn with_supplementary_vocabulary(mut self, path: impl Into<PathBuf>) -> Self {
        self.supplementary_vocabulary = Some(path.into());
        self
    }

    pub fn standard_source(&self) -> VocabularySource {
        VocabularySource::from_option(self.standard_vocabulary.clone())
    }

    pub fn supplementary_source(&self) -> VocabularySource {
        VocabularySource::from_option(self.supplementary_vocabulary.clone())
    }
}

/// Read a boolean environment variable. `Ok(None)` if unset.
fn env_bool(key: &str) -> Result<Option<bool>, CurationError> {
    match env::var(key) {
        Ok(value) => parse_bool(&value)
            .map(Some)
            .ok_or_else(|| CurationError::Configuration(format!("{key}: invalid boolean {value:?}"))),
        Err(_) => Ok(None),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
