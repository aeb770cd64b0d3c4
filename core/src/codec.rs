//! Builder-string codec.
//!
//! Converts between `SymbolExpr` and the flat builder strings used by the
//! palette, in one of two identifier alphabets:
//!
//! - `AlphabetMode::Blissary` (alphabet A, default): identifiers are spelled
//!   through the mapping table, e.g. `B106/B12`.
//! - `AlphabetMode::Numeric` (alphabet B): identifiers are written as-is,
//!   e.g. `12335/8499`.
//!
//! Punctuation (`/`, `;`, `//`, `K:<n>`, `X<letter>`) is identical in both.
//!
//! Note the asymmetry between the two directions: `encode` returns
//! `EngineError::UnknownIdentifier` for an unmapped identifier, while
//! `decode` returns an empty sequence for anything it cannot read. Callers
//! of `decode` must check `is_empty()`. `try_decode` reports the reason.

use crate::error::{EngineError, Result};
use crate::mapping::IdentifierMap;
use crate::symbol::{SymbolExpr, SymbolToken};
use crate::utils;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

static KERNING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^K:-?\d+$").expect("valid regex"));
static LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^X[A-Za-z]$").expect("valid regex"));
static BLISSARY_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^B\d+$").expect("valid regex"));
static NUMERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid regex"));

/// Identifier alphabet of a builder string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphabetMode {
    /// Alphabet A: `B<n>` spellings translated through the mapping table.
    #[default]
    Blissary,
    /// Alphabet B: plain BCI-AV numerals.
    Numeric,
}

#[derive(Debug, Clone)]
pub struct BuilderCodec {
    mapping: Arc<IdentifierMap>,
}

impl BuilderCodec {
    pub fn new(mapping: Arc<IdentifierMap>) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &IdentifierMap {
        &self.mapping
    }

    /// Encode in alphabet A.
    pub fn encode(&self, expr: &SymbolExpr) -> Result<String> {
        self.encode_as(expr, AlphabetMode::Blissary)
    }

    /// Encode in the given alphabet. Alphabet B never fails.
    pub fn encode_as(&self, expr: &SymbolExpr, mode: AlphabetMode) -> Result<String> {
        match mode {
            AlphabetMode::Numeric => Ok(expr.to_string()),
            AlphabetMode::Blissary => {
                let mut out = String::new();
                for token in expr.tokens() {
                    match token {
                        SymbolToken::Id(id) => {
                            let spelling = self
                                .mapping
                                .spelling_of(id)
                                .ok_or(EngineError::UnknownIdentifier(id))?;
                            out.push_str(spelling);
                        }
                        other => out.push_str(&other.to_string()),
                    }
                }
                Ok(out)
            }
        }
    }

    /// Decode a builder string, returning an empty sequence on any failure.
    pub fn decode(&self, text: &str, mode: AlphabetMode) -> SymbolExpr {
        match self.try_decode(text, mode) {
            Ok(expr) => expr,
            Err(e) => {
                tracing::debug!(input = text, error = %e, "builder string did not decode");
                SymbolExpr::empty()
            }
        }
    }

    /// Decode a builder string, reporting why it failed.
    ///
    /// Words are split on `//` first, then each word on `/`, then each part
    /// on `;`; the remaining pieces must be kerning, letter or identifier
    /// tokens.
    pub fn try_decode(&self, text: &str, mode: AlphabetMode) -> Result<SymbolExpr> {
        let input = utils::normalize(text);
        if input.is_empty() {
            return Err(EngineError::malformed(text, "empty input"));
        }

        let mut tokens = Vec::new();
        for (w, word) in input.split("//").enumerate() {
            if w > 0 {
                tokens.push(SymbolToken::WordBreak);
            }
            if word.is_empty() {
                return Err(EngineError::malformed(text, "empty word"));
            }
            for (p, part) in word.split('/').enumerate() {
                if p > 0 {
                    tokens.push(SymbolToken::Concat);
                }
                if part.is_empty() {
                    return Err(EngineError::malformed(text, "empty element"));
                }
                for (o, piece) in part.split(';').enumerate() {
                    if o > 0 {
                        tokens.push(SymbolToken::Overlay);
                    }
                    tokens.push(self.decode_piece(text, piece, mode)?);
                }
            }
        }

        Ok(SymbolExpr::Sequence(tokens))
    }

    fn decode_piece(&self, text: &str, piece: &str, mode: AlphabetMode) -> Result<SymbolToken> {
        if piece.is_empty() {
            return Err(EngineError::malformed(text, "empty overlay operand"));
        }
        if KERNING.is_match(piece) || LETTER.is_match(piece) {
            return piece.parse();
        }

        match mode {
            AlphabetMode::Blissary => {
                if let Some(id) = self.mapping.internal_for(piece) {
                    Ok(SymbolToken::Id(id))
                } else if BLISSARY_ID.is_match(piece) {
                    Err(EngineError::UnknownSpelling(piece.to_string()))
                } else {
                    Err(EngineError::malformed(text, format!("unrecognized token '{}'", piece)))
                }
            }
            AlphabetMode::Numeric => {
                if NUMERAL.is_match(piece) {
                    piece.parse()
                } else {
                    Err(EngineError::malformed(text, format!("unrecognized token '{}'", piece)))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingRecord;
    use crate::symbol_seq;

    fn codec() -> BuilderCodec {
        BuilderCodec::new(Arc::new(IdentifierMap::from_records([
            MappingRecord::new(106, 12335),
            MappingRecord::new(12, 8499),
            MappingRecord::new(81, 8993),
            MappingRecord::new(313, 15162),
        ])))
    }

    #[test]
    fn decode_blissary_pair() {
        assert_eq!(
            codec().decode("B106/B12", AlphabetMode::Blissary),
            symbol_seq![12335, "/", 8499]
        );
    }

    #[test]
    fn decode_overlay_words_and_specials() {
        let c = codec();
        assert_eq!(
            c.decode("B313;B81/B12//Xa/K:-2/B106", AlphabetMode::Blissary),
            symbol_seq![15162, ";", 8993, "/", 8499, "//", "Xa", "/", "K:-2", "/", 12335]
        );
    }

    #[test]
    fn decode_numeric_alphabet() {
        assert_eq!(
            codec().decode("12335/8499;9011", AlphabetMode::Numeric),
            symbol_seq![12335, "/", 8499, ";", 9011]
        );
    }

    #[test]
    fn malformed_input_decodes_to_empty() {
        let c = codec();
        for bad in ["", "   ", "/B106", "B106/", "B106//", "B106///B12", "B106;", "B1 06", "hello"] {
            assert!(c.decode(bad, AlphabetMode::Blissary).is_empty(), "{:?}", bad);
        }
        // numerals are not alphabet A and vice versa
        assert!(c.decode("12335", AlphabetMode::Blissary).is_empty());
        assert!(c.decode("B106", AlphabetMode::Numeric).is_empty());
    }

    #[test]
    fn try_decode_reports_reason() {
        let c = codec();
        assert!(matches!(
            c.try_decode("B999", AlphabetMode::Blissary),
            Err(EngineError::UnknownSpelling(s)) if s == "B999"
        ));
        assert!(matches!(
            c.try_decode("B1//", AlphabetMode::Blissary),
            Err(EngineError::MalformedInput { .. })
        ));
    }

    #[test]
    fn encode_blissary() {
        let c = codec();
        assert_eq!(c.encode(&SymbolExpr::Single(12335)).unwrap(), "B106");
        assert_eq!(
            c.encode(&symbol_seq![15162, ";", 8993, "//", "Xb", "/", "K:1"]).unwrap(),
            "B313;B81//Xb/K:1"
        );
    }

    #[test]
    fn encode_unknown_identifier_fails() {
        assert!(matches!(
            codec().encode(&symbol_seq![12335, "/", 42]),
            Err(EngineError::UnknownIdentifier(42))
        ));
    }

    #[test]
    fn encode_numeric_never_fails() {
        assert_eq!(
            codec().encode_as(&symbol_seq![42, "/", 7], AlphabetMode::Numeric).unwrap(),
            "42/7"
        );
    }

    #[test]
    fn decode_trims_surrounding_whitespace() {
        assert_eq!(
            codec().decode("  B106 \n", AlphabetMode::Blissary),
            symbol_seq![12335]
        );
    }
}
