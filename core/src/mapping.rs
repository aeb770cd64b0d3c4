//! Identifier-mapping table between the two builder alphabets.
//!
//! Alphabet A (the Blissary spelling) writes every identifier as a letter
//! marker plus its Blissary number, e.g. `B106`. Alphabet B writes the BCI-AV
//! identifier itself, e.g. `12335`. The JSON source is an array of
//!
//! ```json
//! { "externalAlphabetId": 106, "internalId": 12335, "alphabetASpelling": "B106" }
//! ```
//!
//! with `blissaryId` / `bciAvId` / `blissaryText` accepted as aliases. A
//! record without a spelling gets the default `B<externalAlphabetId>`.

use crate::error::Result;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Letter marker prefixed to alphabet-A numerals.
pub const ALPHABET_A_MARKER: char = 'B';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRecord {
    #[serde(alias = "blissaryId")]
    pub external_alphabet_id: u32,
    #[serde(alias = "bciAvId")]
    pub internal_id: u32,
    #[serde(alias = "blissaryText", default)]
    pub alphabet_a_spelling: String,
}

impl MappingRecord {
    pub fn new(external_alphabet_id: u32, internal_id: u32) -> Self {
        Self {
            external_alphabet_id,
            internal_id,
            alphabet_a_spelling: format!("{}{}", ALPHABET_A_MARKER, external_alphabet_id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdentifierMap {
    by_internal: AHashMap<u32, MappingRecord>,
    by_spelling: AHashMap<String, u32>,
}

impl IdentifierMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records. A later record for the same internal id or
    /// spelling replaces the earlier one.
    pub fn from_records<I: IntoIterator<Item = MappingRecord>>(records: I) -> Self {
        let mut map = Self::new();
        for record in records {
            map.insert(record);
        }
        map
    }

    pub fn insert(&mut self, mut record: MappingRecord) {
        if record.alphabet_a_spelling.trim().is_empty() {
            record.alphabet_a_spelling =
                format!("{}{}", ALPHABET_A_MARKER, record.external_alphabet_id);
        }
        self.by_spelling
            .insert(record.alphabet_a_spelling.clone(), record.internal_id);
        self.by_internal.insert(record.internal_id, record);
    }

    /// Alphabet-A spelling of an internal identifier.
    pub fn spelling_of(&self, internal_id: u32) -> Option<&str> {
        self.by_internal
            .get(&internal_id)
            .map(|r| r.alphabet_a_spelling.as_str())
    }

    /// Internal identifier for an alphabet-A spelling.
    pub fn internal_for(&self, spelling: &str) -> Option<u32> {
        self.by_spelling.get(spelling).copied()
    }

    pub fn external_of(&self, internal_id: u32) -> Option<u32> {
        self.by_internal
            .get(&internal_id)
            .map(|r| r.external_alphabet_id)
    }

    pub fn len(&self) -> usize {
        self.by_internal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_internal.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<MappingRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let records: Vec<MappingRecord> = serde_json::from_reader(BufReader::new(file))?;
        let map = Self::from_records(records);
        tracing::debug!(
            path = %path.as_ref().display(),
            records = map.len(),
            "loaded identifier mapping table"
        );
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_both_directions() {
        let map = IdentifierMap::from_json_str(
            r#"[
                { "externalAlphabetId": 106, "internalId": 12335, "alphabetASpelling": "B106" },
                { "blissaryId": 12, "bciAvId": 8499, "blissaryText": "B12" }
            ]"#,
        )
        .unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.spelling_of(12335), Some("B106"));
        assert_eq!(map.internal_for("B12"), Some(8499));
        assert_eq!(map.external_of(8499), Some(12));
        assert_eq!(map.internal_for("B999"), None);
        assert_eq!(map.spelling_of(1), None);
    }

    #[test]
    fn missing_spelling_defaults_to_marker_and_number() {
        let map = IdentifierMap::from_json_str(r#"[{ "externalAlphabetId": 7, "internalId": 8993 }]"#)
            .unwrap();
        assert_eq!(map.spelling_of(8993), Some("B7"));
        assert_eq!(map.internal_for("B7"), Some(8993));
    }
}
