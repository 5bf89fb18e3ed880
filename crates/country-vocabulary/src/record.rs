//! Country records and vocabularies.

use std::fmt;

use serde::Serialize;

/// Where a vocabulary comes from. Also fixes its matching priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// The ISO 3166-1 list. Consulted first.
    Standard,
    /// Local naming conventions. Consulted second.
    Supplementary,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Standard => f.write_str("standard"),
            Provenance::Supplementary => f.write_str("supplementary"),
        }
    }
}

/// ISO 3166-1 numeric code.
///
/// Kept as the three-digit string from the document: codes such as `004`
/// carry significant leading zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NumericCode(String);

impl NumericCode {
    /// Validate and wrap a numeric code. Returns `None` unless it is exactly
    /// three ASCII digits.
    pub fn parse(value: &str) -> Option<Self> {
        if value.len() == 3 && value.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NumericCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One canonical country entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryRecord {
    /// Canonical display name.
    pub name: String,
    /// Short everyday name, e.g. "Bolivia".
    pub common_name: Option<String>,
    /// Formal name, e.g. "Plurinational State of Bolivia".
    pub official_name: Option<String>,
    /// Repository-specific name. Only the supplementary vocabulary sets it.
    pub local_name: Option<String>,
    pub numeric: NumericCode,
    /// The code written to items.
    pub alpha2: String,
    pub alpha3: String,
}

/// An ordered list of country records from one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    provenance: Provenance,
    records: Vec<CountryRecord>,
}

impl Vocabulary {
    /// Wrap already validated records.
    pub(crate) fn new(provenance: Provenance, records: Vec<CountryRecord>) -> Self {
        Self {
            provenance,
            records,
        }
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Records in document order.
    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by its alpha-2 code (case-insensitive).
    pub fn find_by_alpha2(&self, alpha2: &str) -> Option<&CountryRecord> {
        self.records
            .iter()
            .find(|record| record.alpha2.eq_ignore_ascii_case(alpha2))
    }

    /// The populated names of a record that take part in matching.
    ///
    /// The standard vocabulary matches on `name`, `official_name` and
    /// `common_name`; the supplementary vocabulary only on its local name.
    pub fn match_names<'a>(&self, record: &'a CountryRecord) -> Vec<&'a str> {
        match self.provenance {
            Provenance::Standard => [
                Some(record.name.as_str()),
                record.official_name.as_deref(),
                record.common_name.as_deref(),
            ]
            .into_iter()
            .flatten()
            .collect(),
            Provenance::Supplementary => record.local_name.as_deref().into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolivia() -> CountryRecord {
        CountryRecord {
            name: "Bolivia, Plurinational State of".into(),
            common_name: Some("Bolivia".into()),
            official_name: Some("Plurinational State of Bolivia".into()),
            local_name: Some("Bolivia".into()),
            numeric: NumericCode::parse("068").unwrap(),
            alpha2: "BO".into(),
            alpha3: "BOL".into(),
        }
    }

    #[test]
    fn test_numeric_code_keeps_leading_zeros() {
        let code = NumericCode::parse("004").unwrap();
        assert_eq!(code.as_str(), "004");
        assert_eq!(code.to_string(), "004");
    }

    #[test]
    fn test_numeric_code_rejects_other_shapes() {
        assert!(NumericCode::parse("4").is_none());
        assert!(NumericCode::parse("0044").is_none());
        assert!(NumericCode::parse("04a").is_none());
        assert!(NumericCode::parse("").is_none());
    }

    #[test]
    fn test_standard_match_names() {
        let vocabulary = Vocabulary::new(Provenance::Standard, vec![bolivia()]);
        let names = vocabulary.match_names(&vocabulary.records()[0]);
        assert_eq!(
            names,
            vec![
                "Bolivia, Plurinational State of",
                "Plurinational State of Bolivia",
                "Bolivia"
            ]
        );
    }

    #[test]
    fn test_supplementary_match_names_only_local() {
        let vocabulary = Vocabulary::new(Provenance::Supplementary, vec![bolivia()]);
        let names = vocabulary.match_names(&vocabulary.records()[0]);
        assert_eq!(names, vec!["Bolivia"]);
    }

    #[test]
    fn test_find_by_alpha2() {
        let vocabulary = Vocabulary::new(Provenance::Standard, vec![bolivia()]);
        assert!(vocabulary.find_by_alpha2("bo").is_some());
        assert!(vocabulary.find_by_alpha2("BR").is_none());
    }
}
