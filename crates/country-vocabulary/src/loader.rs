//! Parsing of vocabulary documents.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::record::{CountryRecord, NumericCode, Provenance, Vocabulary};

/// The bundled ISO 3166-1 document.
pub const BUNDLED_STANDARD_JSON: &str = include_str!("../data/iso_3166-1.json");

/// The bundled document of local country names.
pub const BUNDLED_SUPPLEMENTARY_JSON: &str = include_str!("../data/cgspace-countries.json");

/// A country entry as it appears in either document.
#[derive(Debug, Deserialize)]
struct RawCountry {
    name: Option<String>,
    common_name: Option<String>,
    official_name: Option<String>,
    #[serde(alias = "local_name")]
    cgspace_name: Option<String>,
    numeric: Option<String>,
    alpha_2: Option<String>,
    alpha_3: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StandardDocument {
    #[serde(rename = "3166-1")]
    countries: Vec<RawCountry>,
}

#[derive(Debug, Deserialize)]
struct SupplementaryDocument {
    countries: Vec<RawCountry>,
}

/// Where to read a vocabulary document from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VocabularySource {
    /// The copy compiled into this crate.
    #[default]
    Bundled,
    /// A JSON file on disk.
    Path(PathBuf),
}

impl VocabularySource {
    /// Use `path` if given, the bundled copy otherwise.
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map(VocabularySource::Path).unwrap_or_default()
    }
}

impl Vocabulary {
    /// Parse a vocabulary from a JSON string.
    pub fn from_json_str(provenance: Provenance, json: &str) -> Result<Self, LoadError> {
        let raw = match provenance {
            Provenance::Standard => serde_json::from_str::<StandardDocument>(json)
                .map(|doc| doc.countries),
            Provenance::Supplementary => serde_json::from_str::<SupplementaryDocument>(json)
                .map(|doc| doc.countries),
        }
        .map_err(|source| LoadError::Malformed { provenance, source })?;

        build(provenance, raw)
    }

    /// Parse a vocabulary from any reader.
    pub fn from_reader<R: Read>(provenance: Provenance, reader: R) -> Result<Self, LoadError> {
        let raw = match provenance {
            Provenance::Standard => serde_json::from_reader::<_, StandardDocument>(reader)
                .map(|doc| doc.countries),
            Provenance::Supplementary => {
                serde_json::from_reader::<_, SupplementaryDocument>(reader).map(|doc| doc.countries)
            }
        }
        .map_err(|source| LoadError::Malformed { provenance, source })?;

        build(provenance, raw)
    }

    /// Parse a vocabulary from a JSON file.
    pub fn from_path(provenance: Provenance, path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            provenance,
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(provenance, BufReader::new(file))
    }

    /// Load from the given source.
    pub fn load(provenance: Provenance, source: &VocabularySource) -> Result<Self, LoadError> {
        match source {
            VocabularySource::Bundled => {
                let json = match provenance {
                    Provenance::Standard => BUNDLED_STANDARD_JSON,
                    Provenance::Supplementary => BUNDLED_SUPPLEMENTARY_JSON,
                };
                Self::from_json_str(provenance, json)
            }
            VocabularySource::Path(path) => Self::from_path(provenance, path),
        }
    }
}

/// Validate raw entries into records.
fn build(provenance: Provenance, raw: Vec<RawCountry>) -> Result<Vocabulary, LoadError> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut records = Vec::with_capacity(raw.len());

    for (index, country) in raw.into_iter().enumerate() {
        let required = |value: Option<String>, field: &'static str| {
            value
                .filter(|v| !v.is_empty())
                .ok_or(LoadError::MissingField {
                    provenance,
                    index,
                    field,
                })
        };

        let name = required(country.name, "name")?;
        let numeric = required(country.numeric, "numeric")?;
        let alpha2 = required(country.alpha_2, "alpha_2")?;
        let alpha3 = required(country.alpha_3, "alpha_3")?;

        let numeric = NumericCode::parse(&numeric).ok_or_else(|| LoadError::InvalidField {
            provenance,
            index,
            field: "numeric",
            value: numeric.clone(),
        })?;

        for (field, value, len) in [("alpha_2", &alpha2, 2), ("alpha_3", &alpha3, 3)] {
            if value.len() != len || !value.bytes().all(|b| b.is_ascii_alphabetic()) {
                return Err(LoadError::InvalidField {
                    provenance,
                    index,
                    field,
                    value: value.clone(),
                });
            }
        }

        if !seen.insert(alpha2.to_ascii_uppercase()) {
            return Err(LoadError::DuplicateAlpha2 { provenance, alpha2 });
        }

        records.push(CountryRecord {
            name,
            common_name: country.common_name.filter(|v| !v.is_empty()),
            official_name: country.official_name.filter(|v| !v.is_empty()),
            local_name: country.cgspace_name.filter(|v| !v.is_empty()),
            numeric,
            alpha2,
            alpha3,
        });
    }

    debug!(%provenance, records = records.len(), "Parsed vocabulary");
    Ok(Vocabulary::new(provenance, records))
}

/// The standard and supplementary vocabularies, in matching priority order.
///
/// Load once per run and share behind an `Arc`; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabularies {
    standard: Vocabulary,
    supplementary: Vocabulary,
}

impl Vocabularies {
    /// Pair two parsed vocabularies.
    ///
    /// Returns an error if either one was parsed with the wrong provenance.
    pub fn new(standard: Vocabulary, supplementary: Vocabulary) -> Result<Self, LoadError> {
        for (expected, vocabulary) in [
            (Provenance::Standard, &standard),
            (Provenance::Supplementary, &supplementary),
        ] {
            if vocabulary.provenance() != expected {
                return Err(LoadError::ProvenanceMismatch {
                    expected,
                    found: vocabulary.provenance(),
                });
            }
        }

        Ok(Self {
            standard,
            supplementary,
        })
    }

    /// Load both vocabularies.
    pub fn load(
        standard: &VocabularySource,
        supplementary: &VocabularySource,
    ) -> Result<Self, LoadError> {
        let standard = Vocabulary::load(Provenance::Standard, standard)?;
        let supplementary = Vocabulary::load(Provenance::Supplementary, supplementary)?;

        info!(
            standard = standard.len(),
            supplementary = supplementary.len(),
            "Loaded country vocabularies"
        );

        Ok(Self {
            standard,
            supplementary,
        })
    }

    /// Load the bundled documents.
    pub fn bundled() -> Result<Self, LoadError> {
        Self::load(&VocabularySource::Bundled, &VocabularySource::Bundled)
    }

    pub fn standard(&self) -> &Vocabulary {
        &self.standard
    }

    pub fn supplementary(&self) -> &Vocabulary {
        &self.supplementary
    }

    /// Both vocabularies, standard first.
    pub fn iter(&self) -> impl Iterator<Item = &Vocabulary> {
        [&self.standard, &self.supplementary].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const STANDARD: &str = r#"{
        "3166-1": [
            {"alpha_2": "AF", "alpha_3": "AFG", "name": "Afghanistan", "numeric": "004",
             "official_name": "Islamic Republic of Afghanistan"},
            {"alpha_2": "KE", "alpha_3": "KEN", "name": "Kenya", "numeric": "404"}
        ]
    }"#;

    const SUPPLEMENTARY: &str = r#"{
        "countries": [
            {"cgspace_name": "Kenya", "name": "Kenya", "numeric": "404",
             "alpha_2": "KE", "alpha_3": "KEN"}
        ]
    }"#;

    #[test]
    fn test_parse_standard_document() {
        let vocabulary = Vocabulary::from_json_str(Provenance::Standard, STANDARD).unwrap();
        assert_eq!(vocabulary.len(), 2);

        let afghanistan = &vocabulary.records()[0];
        assert_eq!(afghanistan.numeric.as_str(), "004");
        assert_eq!(
            afghanistan.official_name.as_deref(),
            Some("Islamic Republic of Afghanistan")
        );
        assert_eq!(afghanistan.common_name, None);
        assert_eq!(afghanistan.local_name, None);
    }

    #[test]
    fn test_parse_supplementary_document() {
        let vocabulary =
            Vocabulary::from_json_str(Provenance::Supplementary, SUPPLEMENTARY).unwrap();
        assert_eq!(vocabulary.records()[0].local_name.as_deref(), Some("Kenya"));
    }

    #[test]
    fn test_wrong_document_shape_is_malformed() {
        let err = Vocabulary::from_json_str(Provenance::Standard, SUPPLEMENTARY).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));

        let err = Vocabulary::from_json_str(Provenance::Standard, "not json").unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[test]
    fn test_missing_required_field() {
        let json = r#"{"3166-1": [
            {"alpha_2": "KE", "alpha_3": "KEN", "name": "Kenya", "numeric": "404"},
            {"alpha_2": "UG", "name": "Uganda", "numeric": "800"}
        ]}"#;
        let err = Vocabulary::from_json_str(Provenance::Standard, json).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingField {
                index: 1,
                field: "alpha_3",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_required_field_counts_as_missing() {
        let json = r#"{"countries": [
            {"cgspace_name": "Kenya", "name": "", "numeric": "404", "alpha_2": "KE", "alpha_3": "KEN"}
        ]}"#;
        let err = Vocabulary::from_json_str(Provenance::Supplementary, json).unwrap_err();
        assert!(matches!(err, LoadError::MissingField { field: "name", .. }));
    }

    #[test]
    fn test_numeric_must_be_a_zero_padded_string() {
        let json = r#"{"3166-1": [
            {"alpha_2": "AF", "alpha_3": "AFG", "name": "Afghanistan", "numeric": "4"}
        ]}"#;
        let err = Vocabulary::from_json_str(Provenance::Standard, json).unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { field: "numeric", .. }));

        let json = r#"{"3166-1": [
            {"alpha_2": "AF", "alpha_3": "AFG", "name": "Afghanistan", "numeric": 4}
        ]}"#;
        let err = Vocabulary::from_json_str(Provenance::Standard, json).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[test]
    fn test_invalid_alpha_codes() {
        let json = r#"{"3166-1": [
            {"alpha_2": "KEN", "alpha_3": "KEN", "name": "Kenya", "numeric": "404"}
        ]}"#;
        let err = Vocabulary::from_json_str(Provenance::Standard, json).unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { field: "alpha_2", .. }));
    }

    #[test]
    fn test_duplicate_alpha2() {
        let json = r#"{"3166-1": [
            {"alpha_2": "KE", "alpha_3": "KEN", "name": "Kenya", "numeric": "404"},
            {"alpha_2": "ke", "alpha_3": "KEX", "name": "Kenya again", "numeric": "405"}
        ]}"#;
        let err = Vocabulary::from_json_str(Provenance::Standard, json).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateAlpha2 { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Vocabulary::from_path(Provenance::Standard, "/nonexistent/iso_3166-1.json")
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SUPPLEMENTARY.as_bytes()).unwrap();

        let source = VocabularySource::Path(file.path().to_path_buf());
        let vocabulary = Vocabulary::load(Provenance::Supplementary, &source).unwrap();
        assert_eq!(vocabulary.len(), 1);
    }

    #[test]
    fn test_bundled_documents_load() {
        let vocabularies = Vocabularies::bundled().unwrap();
        assert_eq!(vocabularies.standard().len(), 249);
        assert!(!vocabularies.supplementary().is_empty());

        let afghanistan = vocabularies.standard().find_by_alpha2("AF").unwrap();
        assert_eq!(afghanistan.numeric.as_str(), "004");

        for record in vocabularies.supplementary().records() {
            assert!(record.local_name.is_some(), "{} has no local name", record.alpha2);
        }
    }

    #[test]
    fn test_iter_is_in_priority_order() {
        let vocabularies = Vocabularies::bundled().unwrap();
        let order: Vec<Provenance> = vocabularies.iter().map(|v| v.provenance()).collect();
        assert_eq!(order, vec![Provenance::Standard, Provenance::Supplementary]);
    }

    #[test]
    fn test_new_rejects_swapped_vocabularies() {
        let standard = Vocabulary::from_json_str(Provenance::Standard, STANDARD).unwrap();
        let supplementary =
            Vocabulary::from_json_str(Provenance::Supplementary, SUPPLEMENTARY).unwrap();

        let err = Vocabularies::new(supplementary.clone(), standard.clone()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::ProvenanceMismatch {
                expected: Provenance::Standard,
                found: Provenance::Supplementary,
            }
        ));
        assert_eq!(err.to_string(), "expected standard vocabulary, got supplementary");
        assert!(Vocabularies::new(standard, supplementary).is_ok());
    }

    #[test]
    fn test_source_from_option() {
        assert_eq!(VocabularySource::from_option(None), VocabularySource::Bundled);
        assert_eq!(
            VocabularySource::from_option(Some(PathBuf::from("a.json"))),
            VocabularySource::Path(PathBuf::from("a.json"))
        );
    }
}
