//! One-time download of the symbol dictionary and the mapping table.
//!
//! Uses `reqwest` blocking client for simplicity - the tables are fetched
//! once before the engine is built, so no async runtime is needed.

use crate::dictionary::SymbolDictionary;
use crate::error::{EngineError, Result};
use crate::mapping::IdentifierMap;
use std::time::Duration;

fn fetch_text(url: &str, timeout_ms: u64) -> Result<String> {
    let fetch_err = |source| EngineError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .map_err(fetch_err)?;

    let text = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.text())
        .map_err(fetch_err)?;

    tracing::debug!(url, bytes = text.len(), "fetched table");
    Ok(text)
}

pub fn fetch_dictionary(url: &str, timeout_ms: u64) -> Result<SymbolDictionary> {
    SymbolDictionary::from_json_str(&fetch_text(url, timeout_ms)?)
}

pub fn fetch_mapping(url: &str, timeout_ms: u64) -> Result<IdentifierMap> {
    IdentifierMap::from_json_str(&fetch_text(url, timeout_ms)?)
}
