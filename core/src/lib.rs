//! blissword-core
//!
//! Symbol encoding engine for composing Blissymbolics words: the builder
//! string codec, recursive decomposition of composite symbols, indicator /
//! modifier classification and the caret edit buffer the palette UI drives.
//!
//! Public API:
//! - `SymbolExpr` / `SymbolToken` - composite symbol values
//! - `SymbolDictionary` / `IdentifierMap` - the two read-only lookup tables
//! - `BuilderCodec` - builder string <-> `SymbolExpr`, in either alphabet
//! - `Decomposer` - expansion into elementary identifiers
//! - `roles` - `is_indicator` / `is_modifier`
//! - `EditBuffer` / `EditSession` - caret editing with modifier provenance
//! - `SymbolEngine` - the above wired together from a `Config`
//! - `Config` - configuration, loadable from TOML

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod error;
pub use error::{EngineError, Result};

pub mod symbol;
pub use symbol::{SymbolExpr, SymbolToken};

pub mod dictionary;
pub use dictionary::{DictionaryEntry, SymbolDictionary};

pub mod mapping;
pub use mapping::{IdentifierMap, MappingRecord};

pub mod roles;
pub use roles::{is_indicator, is_modifier, SymbolRole};

pub mod codec;
pub use codec::{AlphabetMode, BuilderCodec};

pub mod decompose;
pub use decompose::Decomposer;

pub mod inflection;
pub use inflection::{Inflector, PassthroughInflector};

pub mod payload;
pub use payload::{IndicatorRecord, ModifierRecord, Payload};

pub mod edit_buffer;
pub use edit_buffer::EditBuffer;

pub mod remote;

pub mod engine;
pub use engine::{SymbolEngine, SymbolTables};

pub mod session;
pub use session::EditSession;

/// Engine configuration.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Symbol dictionary JSON file (or a `.bin` snapshot from
    /// `SymbolDictionary::save_bincode`)
    pub dictionary_path: Option<PathBuf>,
    /// Identifier-mapping table JSON file
    pub mapping_path: Option<PathBuf>,
    /// Fetch the dictionary from this URL instead of `dictionary_path`
    pub dictionary_url: Option<String>,
    /// Fetch the mapping table from this URL instead of `mapping_path`
    pub mapping_url: Option<String>,
    /// Timeout for each table download
    pub fetch_timeout_ms: u64,

    /// Alphabet used when the caller does not name one
    pub default_alphabet: AlphabetMode,

    /// Maximum number of identifiers kept in the decomposition cache
    pub max_cache_size: usize,
    /// Maximum composition nesting before decomposition gives up
    pub max_decomposition_depth: usize,

    /// Gloss suffixes an indicator is known to add, stripped when an
    /// indicator is removed and no record of the original gloss exists
    pub indicator_suffixes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary_path: Some(PathBuf::from("data/symbol_dictionary.json")),
            mapping_path: Some(PathBuf::from("data/blissary_mapping.json")),
            dictionary_url: None,
            mapping_url: None,
            fetch_timeout_ms: 10_000,
            default_alphabet: AlphabetMode::Blissary,
            max_cache_size: 1000,
            max_decomposition_depth: decompose::DEFAULT_MAX_DEPTH,
            indicator_suffixes: vec![
                "(action)".to_string(),
                "(description)".to_string(),
                "(thing)".to_string(),
                "(plural)".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}
