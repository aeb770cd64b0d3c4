//! Composite symbol identifiers.
//!
//! A `SymbolExpr` is either one numeric Bliss identifier or an ordered token
//! sequence mixing identifiers with the builder punctuation:
//!
//! - `/`  concatenate side by side
//! - `;`  overlay the following element on the preceding one (indicators)
//! - `//` word break, rendered with inter-word spacing
//! - `K:<n>` kerning adjustment by `n` units
//! - `X<letter>` spell with a Latin-letter glyph
//!
//! Serde form matches the dictionary `composition` arrays: identifiers are
//! JSON numbers, every other token is its string spelling, e.g.
//! `[12335, "/", 8499]`.

use crate::error::{EngineError, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One element of a composite symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolToken {
    Id(u32),
    /// `/`
    Concat,
    /// `;`
    Overlay,
    /// `//`
    WordBreak,
    /// `K:<n>`
    Kern(i32),
    /// `X<letter>`
    Letter(char),
}

impl SymbolToken {
    pub fn id(&self) -> Option<u32> {
        match self {
            SymbolToken::Id(id) => Some(*id),
            _ => None,
        }
    }

    /// True for the structural separators `/`, `;` and `//`.
    ///
    /// Kerning and letter tokens occupy an operand position and are not
    /// separators.
    pub fn is_separator(&self) -> bool {
        matches!(
            self,
            SymbolToken::Concat | SymbolToken::Overlay | SymbolToken::WordBreak
        )
    }
}

impl fmt::Display for SymbolToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolToken::Id(id) => write!(f, "{}", id),
            SymbolToken::Concat => f.write_str("/"),
            SymbolToken::Overlay => f.write_str(";"),
            SymbolToken::WordBreak => f.write_str("//"),
            SymbolToken::Kern(n) => write!(f, "K:{}", n),
            SymbolToken::Letter(ch) => write!(f, "X{}", ch),
        }
    }
}

impl FromStr for SymbolToken {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "/" => return Ok(SymbolToken::Concat),
            ";" => return Ok(SymbolToken::Overlay),
            "//" => return Ok(SymbolToken::WordBreak),
            _ => {}
        }

        if let Some(n) = s.strip_prefix("K:") {
            return n
                .parse::<i32>()
                .map(SymbolToken::Kern)
                .map_err(|_| EngineError::malformed(s, "bad kerning amount"));
        }

        if let Some(rest) = s.strip_prefix('X') {
            let mut chars = rest.chars();
            return match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii_alphabetic() => Ok(SymbolToken::Letter(ch)),
                _ => Err(EngineError::malformed(s, "letter token needs one Latin letter")),
            };
        }

        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse::<u32>()
                .map(SymbolToken::Id)
                .map_err(|_| EngineError::malformed(s, "identifier out of range"));
        }

        Err(EngineError::malformed(s, "unrecognized token"))
    }
}

impl Serialize for SymbolToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            SymbolToken::Id(id) => serializer.serialize_u32(*id),
            other => serializer.collect_str(other),
        }
    }
}

impl<'de> Deserialize<'de> for SymbolToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TokenVisitor;

        impl<'de> Visitor<'de> for TokenVisitor {
            type Value = SymbolToken;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a symbol identifier or a builder punctuation string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<SymbolToken, E> {
                u32::try_from(v)
                    .map(SymbolToken::Id)
                    .map_err(|_| E::custom(format!("identifier {} out of range", v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<SymbolToken, E> {
                u32::try_from(v)
                    .map(SymbolToken::Id)
                    .map_err(|_| E::custom(format!("identifier {} out of range", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<SymbolToken, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(TokenVisitor)
    }
}

/// Composite identifier: one identifier, or a token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymbolExpr {
    Single(u32),
    Sequence(Vec<SymbolToken>),
}

impl SymbolExpr {
    pub fn empty() -> Self {
        SymbolExpr::Sequence(Vec::new())
    }

    /// The expression as a token list. A `Single` becomes a one-element list.
    pub fn tokens(&self) -> Vec<SymbolToken> {
        match self {
            SymbolExpr::Single(id) => vec![SymbolToken::Id(*id)],
            SymbolExpr::Sequence(tokens) => tokens.clone(),
        }
    }

    pub fn into_tokens(self) -> Vec<SymbolToken> {
        match self {
            SymbolExpr::Single(id) => vec![SymbolToken::Id(id)],
            SymbolExpr::Sequence(tokens) => tokens,
        }
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        match self {
            SymbolExpr::Single(_) => 1,
            SymbolExpr::Sequence(tokens) => tokens.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifiers in order of appearance.
    pub fn ids(&self) -> Vec<u32> {
        match self {
            SymbolExpr::Single(id) => vec![*id],
            SymbolExpr::Sequence(tokens) => tokens.iter().filter_map(SymbolToken::id).collect(),
        }
    }

    /// Separators may not lead, trail, or touch another separator.
    pub fn is_well_formed(&self) -> bool {
        let SymbolExpr::Sequence(tokens) = self else {
            return true;
        };
        if tokens.is_empty() {
            return true;
        }
        if tokens[0].is_separator() || tokens[tokens.len() - 1].is_separator() {
            return false;
        }
        !tokens
            .windows(2)
            .any(|pair| pair[0].is_separator() && pair[1].is_separator())
    }
}

impl Default for SymbolExpr {
    fn default() -> Self {
        SymbolExpr::empty()
    }
}

impl From<u32> for SymbolExpr {
    fn from(id: u32) -> Self {
        SymbolExpr::Single(id)
    }
}

impl From<Vec<SymbolToken>> for SymbolExpr {
    fn from(tokens: Vec<SymbolToken>) -> Self {
        SymbolExpr::Sequence(tokens)
    }
}

/// Plain-numeral builder spelling, e.g. `12335/8499`.
impl fmt::Display for SymbolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolExpr::Single(id) => write!(f, "{}", id),
            SymbolExpr::Sequence(tokens) => {
                for token in tokens {
                    write!(f, "{}", token)?;
                }
                Ok(())
            }
        }
    }
}

/// Shorthand for building token sequences in code and tests:
/// `symbol_seq![12335, "/", 8499]`.
#[macro_export]
macro_rules! symbol_seq {
    ($($tok:expr),* $(,)?) => {
        $crate::symbol::SymbolExpr::Sequence(vec![$($crate::symbol::IntoToken::into_token($tok)),*])
    };
}

/// Conversion used by `symbol_seq!`; string literals must be valid tokens.
pub trait IntoToken {
    fn into_token(self) -> SymbolToken;
}

impl IntoToken for u32 {
    fn into_token(self) -> SymbolToken {
        SymbolToken::Id(self)
    }
}

impl IntoToken for i32 {
    fn into_token(self) -> SymbolToken {
        let id = u32::try_from(self).unwrap_or_else(|_| panic!("negative identifier {}", self));
        SymbolToken::Id(id)
    }
}

impl IntoToken for &str {
    fn into_token(self) -> SymbolToken {
        self.parse()
            .unwrap_or_else(|e| panic!("invalid token literal {:?}: {}", self, e))
    }
}

impl IntoToken for SymbolToken {
    fn into_token(self) -> SymbolToken {
        self
    }
}
