//! Symbol dictionary accessor.
//!
//! Read-only lookup of identifier -> gloss, elementary-character flag and
//! optional composition. The JSON source is an object keyed by the string
//! form of the identifier:
//!
//! ```json
//! {
//!   "12335": { "gloss": "to give", "isElementary": true },
//!   "17697": { "gloss": "house", "composition": [14905, "/", 8499] }
//! }
//! ```
//!
//! `description` and `isCharacter` are accepted as aliases for `gloss` and
//! `isElementary`. The dictionary is built once at startup and shared behind
//! an `Arc`; nothing mutates it afterwards.

use crate::error::Result;
use crate::symbol::{SymbolExpr, SymbolToken};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// One dictionary record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub id: u32,
    pub gloss: String,
    pub is_elementary: bool,
    /// Ignored when `is_elementary` is set.
    pub composition: Option<SymbolExpr>,
}

impl DictionaryEntry {
    pub fn elementary<G: Into<String>>(id: u32, gloss: G) -> Self {
        Self {
            id,
            gloss: gloss.into(),
            is_elementary: true,
            composition: None,
        }
    }

    pub fn composite<G: Into<String>>(id: u32, gloss: G, composition: SymbolExpr) -> Self {
        Self {
            id,
            gloss: gloss.into(),
            is_elementary: false,
            composition: Some(composition),
        }
    }

    /// Composition to expand, or `None` when the entry is its own expansion.
    pub fn expansion(&self) -> Option<&SymbolExpr> {
        if self.is_elementary {
            None
        } else {
            self.composition.as_ref()
        }
    }
}

/// Wire shape of a dictionary value in the JSON source.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    #[serde(alias = "description", default)]
    gloss: String,
    #[serde(alias = "isCharacter", default)]
    is_elementary: bool,
    #[serde(default)]
    composition: Option<SymbolExpr>,
}

/// Snapshot shape for bincode; tokens are stored as their string spelling
/// because bincode cannot drive the self-describing token format.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEntry {
    id: u32,
    gloss: String,
    is_elementary: bool,
    composition: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolDictionary {
    entries: AHashMap<u32, DictionaryEntry>,
}

impl SymbolDictionary {
    pub fn new() -> Self {
        Self {
            entries: AHashMap::new(),
        }
    }

    /// Insert or replace an entry. Only used while building the table.
    pub fn insert(&mut self, entry: DictionaryEntry) {
        self.entries.insert(entry.id, entry);
    }

    pub fn get(&self, id: u32) -> Option<&DictionaryEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn gloss(&self, id: u32) -> Option<&str> {
        self.entries.get(&id).map(|e| e.gloss.as_str())
    }

    /// All identifiers, sorted ascending.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the JSON source. Keys that are not non-negative integers are
    /// skipped with a warning.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, RawEntry> = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let raw: HashMap<String, RawEntry> = serde_json::from_reader(BufReader::new(file))?;
        let dict = Self::from_raw(raw);
        tracing::debug!(
            path = %path.as_ref().display(),
            entries = dict.len(),
            "loaded symbol dictionary"
        );
        Ok(dict)
    }

    fn from_raw(raw: HashMap<String, RawEntry>) -> Self {
        let mut dict = Self::new();
        for (key, value) in raw {
            let Ok(id) = key.trim().parse::<u32>() else {
                tracing::warn!(key = %key, "skipping dictionary entry with non-numeric key");
                continue;
            };
            dict.insert(DictionaryEntry {
                id,
                gloss: value.gloss,
                is_elementary: value.is_elementary,
                composition: value.composition,
            });
        }
        dict
    }

    /// Save the dictionary to a file using bincode serialization.
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let snapshot: Vec<SnapshotEntry> = self
            .ids()
            .into_iter()
            .filter_map(|id| self.entries.get(&id))
            .map(|e| SnapshotEntry {
                id: e.id,
                gloss: e.gloss.clone(),
                is_elementary: e.is_elementary,
                composition: e
                    .composition
                    .as_ref()
                    .map(|c| c.tokens().iter().map(ToString::to_string).collect()),
            })
            .collect();
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, &snapshot)?;
        Ok(())
    }

    /// Load a dictionary produced by `save_bincode`.
    pub fn load_bincode<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Vec<SnapshotEntry> = bincode::deserialize_from(reader)?;
        let mut dict = Self::new();
        for e in snapshot {
            let composition = match e.composition {
                Some(spellings) => Some(SymbolExpr::Sequence(
                    spellings
                        .iter()
                        .map(|s| s.parse::<SymbolToken>())
                        .collect::<Result<Vec<_>>>()?,
                )),
                None => None,
            };
            dict.insert(DictionaryEntry {
                id: e.id,
                gloss: e.gloss,
                is_elementary: e.is_elementary,
                composition,
            });
        }
        Ok(dict)
    }
}
