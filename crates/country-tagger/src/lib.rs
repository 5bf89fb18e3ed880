//! Country code tagging for repository items.
//!
//! Items carry free-text country names (e.g. "Kenya", "Tanzania"). This crate
//! resolves each name against the ISO 3166-1 list and a list of local names,
//! and writes the matching alpha-2 codes to a second metadata field:
//!
//! - [`CountryMatcher`] - Case-insensitive exact matching against both vocabularies
//! - [`CountryCodeTagger`] - The per-item task, implementing `CurationTask`
//! - [`TaggerConfig`] - Field keys and flags, from the environment or builders
//!
//! # Example
//!
//! ```rust
//! use country_tagger::{CountryCodeTagger, TaggerConfig};
//!
//! let tagger = CountryCodeTagger::new(TaggerConfig::default())?;
//! assert_eq!(tagger.matcher().match_country("kenya"), vec!["KE".to_string()]);
//! # Ok::<(), country_vocabulary::LoadError>(())
//! ```

mod config;
mod matcher;
mod outcome;
mod tagger;

pub use config::{TaggerConfig, DEFAULT_ALPHA2_FIELD, DEFAULT_COUNTRY_FIELD, DEFAULT_LANGUAGE};
pub use matcher::{eq_ignore_case, CountryMatcher};
pub use outcome::{TaggingOutcome, TaggingStatus};
pub use tagger::CountryCodeTagger;
