//! Error type shared by the codec, decomposition engine and table loaders.
//!
//! Only table loading and the strict codec paths ever surface these errors.
//! Edit-buffer operations never fail: an edit without an eligible target is a
//! silent no-op (see `EditBuffer`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Identifier absent from the dictionary or the mapping table.
    #[error("unknown symbol identifier {0}")]
    UnknownIdentifier(u32),

    /// Alphabet-A spelling with no entry in the mapping table.
    #[error("unknown builder spelling '{0}'")]
    UnknownSpelling(String),

    /// Builder string that matches none of the recognized token shapes.
    #[error("malformed builder string '{input}': {reason}")]
    MalformedInput { input: String, reason: String },

    /// An identifier re-entered its own expansion.
    #[error("cyclic composition: {}", format_path(.path))]
    CyclicComposition { path: Vec<u32> },

    #[error("decomposition of {id} exceeded depth {limit}")]
    DepthExceeded { id: u32, limit: usize },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bincode: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("config: {0}")]
    Config(String),
}

impl EngineError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        EngineError::MalformedInput {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

fn format_path(path: &[u32]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_shows_path() {
        let err = EngineError::CyclicComposition {
            path: vec![1, 2, 1],
        };
        assert_eq!(err.to_string(), "cyclic composition: 1 -> 2 -> 1");
    }
}
