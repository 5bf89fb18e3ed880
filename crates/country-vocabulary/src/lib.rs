//! Country reference vocabularies.
//!
//! Two vocabularies are used to resolve free-text country names:
//!
//! - the standard ISO 3166-1 list, in the JSON layout of Debian's `iso-codes` package
//! - a supplementary list of local naming conventions used by the repository
//!
//! Both documents are bundled with the crate. They are parsed once per run into
//! a [`Vocabularies`] value that is shared read-only by every item.
//!
//! # Example
//!
//! ```rust
//! use country_vocabulary::{Provenance, Vocabularies};
//!
//! let vocabularies = Vocabularies::bundled()?;
//! let kenya = vocabularies.standard().find_by_alpha2("KE").unwrap();
//! assert_eq!(kenya.name, "Kenya");
//! assert_eq!(kenya.numeric.as_str(), "404");
//! assert_eq!(vocabularies.supplementary().provenance(), Provenance::Supplementary);
//! # Ok::<(), country_vocabulary::LoadError>(())
//! ```

mod error;
mod loader;
mod record;

pub use error::LoadError;
pub use loader::{
    VocabularySource, Vocabularies, BUNDLED_STANDARD_JSON, BUNDLED_SUPPLEMENTARY_JSON,
};
pub use record::{CountryRecord, NumericCode, Provenance, Vocabulary};
