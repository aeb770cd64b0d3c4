// Shared fixture loading for integration tests.
#![allow(dead_code)]

use blissword_core::{Config, EditSession, SymbolEngine};
use std::path::PathBuf;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture_config() -> Config {
    Config {
        dictionary_path: Some(fixture("symbol_dictionary.json")),
        mapping_path: Some(fixture("blissary_mapping.json")),
        ..Config::default()
    }
}

pub fn engine() -> SymbolEngine {
    SymbolEngine::load(fixture_config()).expect("fixture tables load")
}

pub fn session() -> EditSession {
    EditSession::new(engine())
}
