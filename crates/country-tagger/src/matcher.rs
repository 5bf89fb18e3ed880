//! Matching free-text country names against the vocabularies.

use std::sync::Arc;

use country_vocabulary::Vocabularies;
use tracing::trace;

/// Case-insensitive equality of two strings, character by character.
///
/// Both strings must have the same number of characters, and each pair must
/// agree in upper or lower case. A character whose case mapping expands
/// ("İ", "ß") never matches the expanded form. No trimming and no folding of
/// diacritics: "Côte d'Ivoire" only matches itself in some letter case.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count()
        && a.chars().zip(b.chars()).all(|(x, y)| {
            x == y
                || x.to_uppercase().eq(y.to_uppercase())
                || x.to_lowercase().eq(y.to_lowercase())
        })
}

/// Resolves country names to alpha-2 codes.
///
/// Cheap to clone; the vocabularies are shared.
#[derive(Debug, Clone)]
pub struct CountryMatcher {
    vocabularies: Arc<Vocabularies>,
}

impl CountryMatcher {
    /// Create a matcher over loaded vocabularies.
    pub fn new(vocabularies: Arc<Vocabularies>) -> Self {
        Self { vocabularies }
    }

    pub fn vocabularies(&self) -> &Vocabularies {
        &self.vocabularies
    }

    /// Every alpha-2 code whose record has a name equal to `text`.
    ///
    /// Both vocabularies are scanned in full, standard first, and every
    /// matching record contributes its code. A name present in both therefore
    /// yields the same code twice. Blank input matches nothing.
    pub fn match_country(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut codes = Vec::new();
        for vocabulary in self.vocabularies.iter() {
            for record in vocabulary.records() {
                let matched = vocabulary
                    .match_names(record)
                    .into_iter()
                    .any(|name| eq_ignore_case(text, name));
                if matched {
                    trace!(
                        text,
                        alpha2 = %record.alpha2,
                        provenance = %vocabulary.provenance(),
                        "Matched country"
                    );
                    codes.push(record.alpha2.clone());
                }
            }
        }
        codes
    }
}
