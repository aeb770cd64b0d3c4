// core/src/engine.rs
//
// Caller-facing engine: the two read-only tables plus the codec and the
// decomposer built on top of them.
//
// Tables are loaded once (from disk or over the network) and shared behind
// `Arc`; the engine never mutates them.

use crate::codec::{AlphabetMode, BuilderCodec};
use crate::decompose::Decomposer;
use crate::dictionary::SymbolDictionary;
use crate::error::{EngineError, Result};
use crate::mapping::IdentifierMap;
use crate::symbol::SymbolExpr;
use crate::{remote, roles, Config};
use std::path::Path;
use std::sync::Arc;

/// The immutable lookup tables the engine runs on.
#[derive(Debug, Clone)]
pub struct SymbolTables {
    pub dictionary: Arc<SymbolDictionary>,
    pub mapping: Arc<IdentifierMap>,
}

impl SymbolTables {
    pub fn new(dictionary: SymbolDictionary, mapping: IdentifierMap) -> Self {
        Self {
            dictionary: Arc::new(dictionary),
            mapping: Arc::new(mapping),
        }
    }

    /// Load both tables as configured: a URL wins over a path. A dictionary
    /// path ending in `.bin` is read as a bincode snapshot.
    pub fn load(config: &Config) -> Result<Self> {
        let dictionary = match (&config.dictionary_url, &config.dictionary_path) {
            (Some(url), _) => remote::fetch_dictionary(url, config.fetch_timeout_ms)?,
            (None, Some(path)) if has_extension(path, "bin") => SymbolDictionary::load_bincode(path)?,
            (None, Some(path)) => SymbolDictionary::load_json(path)?,
            (None, None) => return Err(EngineError::Config("no symbol dictionary source configured".into())),
        };
        let mapping = match (&config.mapping_url, &config.mapping_path) {
            (Some(url), _) => remote::fetch_mapping(url, config.fetch_timeout_ms)?,
            (None, Some(path)) => IdentifierMap::load_json(path)?,
            (None, None) => return Err(EngineError::Config("no identifier mapping source configured".into())),
        };

        tracing::info!(
            entries = dictionary.len(),
            mappings = mapping.len(),
            "symbol tables loaded"
        );
        Ok(Self::new(dictionary, mapping))
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

#[derive(Debug)]
pub struct SymbolEngine {
    tables: SymbolTables,
    codec: BuilderCodec,
    decomposer: Decomposer,
    config: Config,
}

impl SymbolEngine {
    pub fn new(tables: SymbolTables, config: Config) -> Self {
        let codec = BuilderCodec::new(Arc::clone(&tables.mapping));
        let decomposer = Decomposer::with_limits(
            Arc::clone(&tables.dictionary),
            config.max_decomposition_depth,
            config.max_cache_size,
        );
        Self {
            tables,
            codec,
            decomposer,
            config,
        }
    }

    pub fn load(config: Config) -> Result<Self> {
        let tables = SymbolTables::load(&config)?;
        Ok(Self::new(tables, config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dictionary(&self) -> &SymbolDictionary {
        &self.tables.dictionary
    }

    pub fn tables(&self) -> &SymbolTables {
        &self.tables
    }

    pub fn codec(&self) -> &BuilderCodec {
        &self.codec
    }

    pub fn decomposer(&self) -> &Decomposer {
        &self.decomposer
    }

    pub fn encode(&self, expr: &SymbolExpr) -> Result<String> {
        self.codec.encode(expr)
    }

    /// Decode in the given alphabet. An empty result means the text could
    /// not be read.
    pub fn decode(&self, text: &str, mode: AlphabetMode) -> SymbolExpr {
        self.codec.decode(text, mode)
    }

    /// Decode in the configured default alphabet.
    pub fn decode_default(&self, text: &str) -> SymbolExpr {
        self.codec.decode(text, self.config.default_alphabet)
    }

    pub fn decompose(&self, expr: &SymbolExpr) -> Result<Option<SymbolExpr>> {
        self.decomposer.decompose(expr)
    }

    pub fn is_indicator(&self, id: u32) -> bool {
        roles::is_indicator(id)
    }

    pub fn is_modifier(&self, id: u32) -> bool {
        roles::is_modifier(id)
    }

    pub fn gloss(&self, id: u32) -> Option<&str> {
        self.tables.dictionary.gloss(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionaryEntry;
    use crate::mapping::MappingRecord;
    use crate::symbol_seq;

    fn engine() -> SymbolEngine {
        let mut dict = SymbolDictionary::new();
        dict.insert(DictionaryEntry::elementary(12335, "to give"));
        dict.insert(DictionaryEntry::elementary(8499, "plural"));
        dict.insert(DictionaryEntry::composite(17697, "gifts", symbol_seq![12335, "/", 8499]));
        let map = IdentifierMap::from_records([MappingRecord::new(106, 12335), MappingRecord::new(12, 8499)]);
        SymbolEngine::new(SymbolTables::new(dict, map), Config::default())
    }

    #[test]
    fn decode_then_decompose() {
        let e = engine();
        let expr = e.decode_default("B106/B12");
        assert_eq!(expr, symbol_seq![12335, "/", 8499]);
        assert_eq!(e.decompose(&SymbolExpr::Single(17697)).unwrap(), Some(expr));
    }

    #[test]
    fn load_without_sources_is_config_error() {
        let config = Config {
            dictionary_path: None,
            mapping_path: None,
            ..Config::default()
        };
        assert!(matches!(SymbolTables::load(&config), Err(EngineError::Config(_))));
    }

    #[test]
    fn roles_delegate() {
        let e = engine();
        assert!(e.is_indicator(8993));
        assert!(e.is_modifier(14947));
        assert_eq!(e.gloss(8499), Some("plural"));
    }
}
