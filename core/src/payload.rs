//! Edit-buffer items and the per-item symbol edits.
//!
//! A `Payload` is one composed word in the edit buffer. Besides its gloss and
//! decomposed symbol it keeps the provenance of the structural edits applied
//! to it:
//!
//! - `modifier_stack`: every modifier added, in order, popped LIFO on removal
//! - `indicator`: the indicator attached through the buffer, with the gloss
//!   the word had before it
//!
//! Gloss repair uses these records first and falls back to string matching
//! only when no record explains the current gloss (an indicator that came
//! with the dictionary composition, for example).

use crate::inflection::Inflector;
use crate::roles;
use crate::symbol::{SymbolExpr, SymbolToken};
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierRecord {
    pub modifier_symbol: SymbolExpr,
    pub modifier_gloss: String,
    pub prepended: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub indicator_id: u32,
    /// Gloss before the indicator was attached.
    pub bare_gloss: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Provenance token of the palette cell this item came from.
    pub id: String,
    pub gloss: String,
    pub symbol: SymbolExpr,
    #[serde(default)]
    pub modifier_stack: Vec<ModifierRecord>,
    #[serde(default)]
    pub indicator: Option<IndicatorRecord>,
}

impl Payload {
    pub fn new<I: Into<String>, G: Into<String>>(id: I, gloss: G, symbol: SymbolExpr) -> Self {
        Self {
            id: id.into(),
            gloss: gloss.into(),
            symbol,
            modifier_stack: Vec::new(),
            indicator: None,
        }
    }

    /// Index of the overlaid indicator in the symbol tokens, if any.
    pub fn indicator_position(&self) -> Option<usize> {
        let tokens = self.symbol.tokens();
        let span = self.core_span(tokens.len());
        indicator_position(&tokens[span.clone()]).map(|pos| span.start + pos)
    }

    pub fn indicator_id(&self) -> Option<u32> {
        let pos = self.indicator_position()?;
        self.symbol.tokens()[pos].id()
    }

    /// Token range outside every recorded modifier. Prepended modifiers own
    /// the front of the symbol, appended ones the back.
    fn core_span(&self, len: usize) -> Range<usize> {
        let (front, back) = self.modifier_stack.iter().fold((0, 0), |(front, back), record| {
            let width = record.modifier_symbol.len() + 1;
            if record.prepended {
                (front + width, back)
            } else {
                (front, back + width)
            }
        });
        let start = front.min(len);
        let end = len.saturating_sub(back).max(start);
        start..end
    }

    pub fn has_indicator(&self) -> bool {
        self.indicator_position().is_some()
    }

    pub fn has_modifiers(&self) -> bool {
        !self.modifier_stack.is_empty()
    }

    /// Attach `indicator_id`, replacing the current indicator if there is
    /// one. A new indicator goes on the core symbol: the first operand after
    /// the leading run of modifiers, never inside a recorded modifier.
    pub fn set_indicator(&mut self, indicator_id: u32, inflector: &dyn Inflector) -> bool {
        let mut tokens = self.symbol.tokens();
        let span = self.core_span(tokens.len());

        if let Some(pos) = self.indicator_position() {
            tokens[pos] = SymbolToken::Id(indicator_id);
        } else {
            let core = &tokens[span.clone()];
            let Some(pos) = core_position(core) else {
                return false;
            };
            let at = span.start + end_of_overlays(core, pos);
            tokens.splice(at..at, [SymbolToken::Overlay, SymbolToken::Id(indicator_id)]);
        }

        let bare = match self.indicator.take() {
            Some(record) => record.bare_gloss,
            None => self.gloss.clone(),
        };
        self.gloss = inflector.inflect(&bare, indicator_id);
        self.indicator = Some(IndicatorRecord {
            indicator_id,
            bare_gloss: bare,
        });
        self.symbol = SymbolExpr::Sequence(tokens);
        true
    }

    /// Remove the indicator and its `;`, then repair the gloss from the
    /// stored record, a known suffix in `suffixes`, or the inflector, in that
    /// order.
    pub fn clear_indicator(&mut self, suffixes: &[String], inflector: &dyn Inflector) -> bool {
        let Some(pos) = self.indicator_position() else {
            return false;
        };
        let mut tokens = self.symbol.tokens();
        tokens.drain(pos - 1..=pos);
        self.symbol = SymbolExpr::Sequence(tokens);

        self.gloss = match self.indicator.take() {
            Some(record) => record.bare_gloss,
            None => match strip_known_suffix(&self.gloss, suffixes) {
                Some(bare) => bare,
                None => inflector.uninflect(&self.gloss),
            },
        };
        true
    }

    /// Splice a modifier onto the front (`prepend`) or back of the symbol and
    /// gloss, and record it.
    pub fn push_modifier(&mut self, modifier_symbol: SymbolExpr, modifier_gloss: &str, prepend: bool) {
        let mut tokens = self.symbol.tokens();
        let modifier_tokens = modifier_symbol.tokens();
        if prepend {
            let mut front = modifier_tokens;
            front.push(SymbolToken::Concat);
            tokens.splice(0..0, front);
        } else {
            tokens.push(SymbolToken::Concat);
            tokens.extend(modifier_tokens);
        }
        self.symbol = SymbolExpr::Sequence(tokens);

        self.gloss = add_gloss_fragment(&self.gloss, modifier_gloss, prepend);
        if let Some(record) = self.indicator.as_mut() {
            record.bare_gloss = add_gloss_fragment(&record.bare_gloss, modifier_gloss, prepend);
        }

        self.modifier_stack.push(ModifierRecord {
            modifier_symbol,
            modifier_gloss: modifier_gloss.to_string(),
            prepended: prepend,
        });
    }

    /// Undo the most recent modifier. Returns the popped record.
    pub fn pop_modifier(&mut self) -> Option<ModifierRecord> {
        let record = self.modifier_stack.pop()?;
        let mut tokens = self.symbol.tokens();
        let span = (record.modifier_symbol.len() + 1).min(tokens.len());
        if record.prepended {
            tokens.drain(..span);
        } else {
            tokens.truncate(tokens.len() - span);
        }
        self.symbol = SymbolExpr::Sequence(tokens);

        self.gloss = remove_gloss_fragment(&self.gloss, &record.modifier_gloss, record.prepended);
        if let Some(indicator) = self.indicator.as_mut() {
            indicator.bare_gloss =
                remove_gloss_fragment(&indicator.bare_gloss, &record.modifier_gloss, record.prepended);
        }
        if !self.has_indicator() {
            // the indicator went with the modifier span
            if let Some(stale) = self.indicator.take() {
                self.gloss = stale.bare_gloss;
            }
        }
        Some(record)
    }
}

/// Position of an indicator identifier that sits behind a `;`.
pub fn indicator_position(tokens: &[SymbolToken]) -> Option<usize> {
    tokens.iter().enumerate().skip(1).find_map(|(i, token)| match token {
        SymbolToken::Id(id) if roles::is_indicator(*id) && tokens[i - 1] == SymbolToken::Overlay => {
            Some(i)
        }
        _ => None,
    })
}

/// First operand of the first word that is not a modifier. When the word is
/// made only of modifiers, the last of them.
fn core_position(tokens: &[SymbolToken]) -> Option<usize> {
    let mut last_operand = None;
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            SymbolToken::WordBreak => break,
            SymbolToken::Overlay => {
                // skip the overlaid operand, it belongs to the previous one
                i += 2;
                continue;
            }
            SymbolToken::Id(id) if roles::is_modifier(id) => last_operand = Some(i),
            SymbolToken::Id(_) | SymbolToken::Letter(_) => return Some(i),
            SymbolToken::Concat | SymbolToken::Kern(_) => {}
        }
        i += 1;
    }
    last_operand
}

/// Index just past the `; x` overlays already attached to the operand at
/// `pos`, never past the end of `tokens`.
fn end_of_overlays(tokens: &[SymbolToken], pos: usize) -> usize {
    let mut at = pos + 1;
    while at + 1 < tokens.len() && tokens[at] == SymbolToken::Overlay {
        at += 2;
    }
    at.min(tokens.len())
}

fn strip_known_suffix(gloss: &str, suffixes: &[String]) -> Option<String> {
    suffixes
        .iter()
        .filter(|s| !s.is_empty())
        .find_map(|s| gloss.strip_suffix(s.as_str()))
        .map(|bare| bare.trim_end().to_string())
}

fn add_gloss_fragment(gloss: &str, fragment: &str, prepend: bool) -> String {
    if gloss.is_empty() {
        return fragment.to_string();
    }
    if fragment.is_empty() {
        return gloss.to_string();
    }
    if prepend {
        format!("{} {}", fragment, gloss)
    } else {
        format!("{} {}", gloss, fragment)
    }
}

fn remove_gloss_fragment(gloss: &str, fragment: &str, prepended: bool) -> String {
    if fragment.is_empty() {
        return gloss.to_string();
    }
    if gloss == fragment {
        return String::new();
    }
    let exact = if prepended {
        gloss.strip_prefix(&format!("{} ", fragment))
    } else {
        gloss.strip_suffix(&format!(" {}", fragment))
    };
    match exact {
        Some(rest) => rest.to_string(),
        // the gloss was rewritten since the modifier was added
        None => gloss
            .replacen(fragment, "", 1)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inflection::PassthroughInflector;
    use crate::symbol_seq;

    struct VerbInflector;

    impl Inflector for VerbInflector {
        fn inflect(&self, bare: &str, indicator: u32) -> String {
            if indicator == 8993 {
                format!("to {}", bare)
            } else {
                bare.to_string()
            }
        }

        fn uninflect(&self, gloss: &str) -> String {
            gloss.trim_start_matches("to ").to_string()
        }
    }

    fn item(symbol: SymbolExpr) -> Payload {
        Payload::new("cell-1", "house", symbol)
    }

    #[test]
    fn indicator_goes_after_leading_modifiers() {
        // 17720 is a modifier, so the core is 17697
        let mut p = item(symbol_seq![17720, "/", 17697]);
        assert!(p.set_indicator(9011, &PassthroughInflector));
        assert_eq!(p.symbol, symbol_seq![17720, "/", 17697, ";", 9011]);
    }

    #[test]
    fn indicator_on_plain_first_symbol() {
        let mut p = item(symbol_seq![15162, "/", 15733]);
        p.set_indicator(8993, &PassthroughInflector);
        assert_eq!(p.symbol, symbol_seq![15162, ";", 8993, "/", 15733]);
    }

    #[test]
    fn indicator_replaced_in_place() {
        let mut p = item(symbol_seq![15162, ";", 8993, "/", 15733]);
        p.set_indicator(9011, &PassthroughInflector);
        assert_eq!(p.symbol, symbol_seq![15162, ";", 9011, "/", 15733]);
        assert_eq!(p.indicator_id(), Some(9011));
    }

    #[test]
    fn indicator_skips_existing_plain_overlay() {
        let mut p = item(symbol_seq![14905, ";", 8499, "/", 12335]);
        p.set_indicator(8993, &PassthroughInflector);
        assert_eq!(p.symbol, symbol_seq![14905, ";", 8499, ";", 8993, "/", 12335]);
    }

    #[test]
    fn indicator_on_modifier_only_word_uses_last_modifier() {
        let mut p = item(symbol_seq![14947, "/", 17720]);
        p.set_indicator(8993, &PassthroughInflector);
        assert_eq!(p.symbol, symbol_seq![14947, "/", 17720, ";", 8993]);
    }

    #[test]
    fn empty_symbol_takes_no_indicator() {
        let mut p = item(SymbolExpr::empty());
        assert!(!p.set_indicator(8993, &PassthroughInflector));
        assert!(p.indicator.is_none());
    }

    #[test]
    fn remove_indicator_splices_overlay() {
        let mut p = item(symbol_seq![15162, ";", 8993, "/", 15733]);
        assert!(p.clear_indicator(&[], &PassthroughInflector));
        assert_eq!(p.symbol, symbol_seq![15162, "/", 15733]);
        assert!(!p.clear_indicator(&[], &PassthroughInflector));
    }

    #[test]
    fn gloss_restored_from_record() {
        let mut p = item(symbol_seq![15162]);
        p.gloss = "love".into();
        p.set_indicator(8993, &VerbInflector);
        assert_eq!(p.gloss, "to love");
        p.set_indicator(9011, &VerbInflector);
        assert_eq!(p.gloss, "love");
        p.set_indicator(8993, &VerbInflector);
        p.clear_indicator(&[], &VerbInflector);
        assert_eq!(p.gloss, "love");
        assert!(p.indicator.is_none());
    }

    #[test]
    fn gloss_suffix_stripped_without_record() {
        let mut p = item(symbol_seq![15162, ";", 9011]);
        p.gloss = "love (thing)".into();
        p.clear_indicator(&[" (thing)".to_string()], &VerbInflector);
        assert_eq!(p.gloss, "love");
    }

    #[test]
    fn gloss_falls_back_to_inflector() {
        let mut p = item(symbol_seq![15162, ";", 8993]);
        p.gloss = "to love".into();
        p.clear_indicator(&[" (thing)".to_string()], &VerbInflector);
        assert_eq!(p.gloss, "love");
    }

    #[test]
    fn modifier_prepend_and_undo() {
        let mut p = item(symbol_seq![17697]);
        p.push_modifier(symbol_seq![14947], "very", true);
        assert_eq!(p.symbol, symbol_seq![14947, "/", 17697]);
        assert_eq!(p.gloss, "very house");

        let record = p.pop_modifier().unwrap();
        assert!(record.prepended);
        assert_eq!(p.symbol, symbol_seq![17697]);
        assert_eq!(p.gloss, "house");
        assert!(p.modifier_stack.is_empty());
    }

    #[test]
    fn modifiers_pop_lifo() {
        let mut p = item(symbol_seq![17697]);
        p.push_modifier(symbol_seq![15474], "opposite", true);
        p.push_modifier(symbol_seq![8511, "/", 8512], "twelfth", false);
        assert_eq!(p.symbol, symbol_seq![15474, "/", 17697, "/", 8511, "/", 8512]);
        assert_eq!(p.gloss, "opposite house twelfth");

        p.pop_modifier();
        assert_eq!(p.symbol, symbol_seq![15474, "/", 17697]);
        assert_eq!(p.gloss, "opposite house");
        p.pop_modifier();
        assert_eq!(p.symbol, symbol_seq![17697]);
        assert!(p.pop_modifier().is_none());
    }

    #[test]
    fn modifier_gloss_follows_indicator_record() {
        let mut p = item(symbol_seq![15162]);
        p.gloss = "love".into();
        p.set_indicator(8993, &VerbInflector);
        p.push_modifier(symbol_seq![14947], "much", false);
        assert_eq!(p.gloss, "to love much");
        assert_eq!(p.symbol, symbol_seq![15162, ";", 8993, "/", 14947]);

        p.clear_indicator(&[], &VerbInflector);
        assert_eq!(p.gloss, "love much");
        p.pop_modifier();
        assert_eq!(p.gloss, "love");
        assert_eq!(p.symbol, symbol_seq![15162]);
    }

    #[test]
    fn indicator_stays_outside_recorded_modifiers() {
        // 12335 is not a modifier by role, only by record
        let mut p = item(symbol_seq![15162]);
        p.push_modifier(symbol_seq![12335], "give", true);
        p.set_indicator(8993, &PassthroughInflector);
        assert_eq!(p.symbol, symbol_seq![12335, "/", 15162, ";", 8993]);

        let mut q = item(symbol_seq![14947]);
        q.push_modifier(symbol_seq![17720], "many", false);
        q.set_indicator(8993, &PassthroughInflector);
        assert_eq!(q.symbol, symbol_seq![14947, ";", 8993, "/", 17720]);
    }

    #[test]
    fn indicator_inside_modifier_span_is_not_removable() {
        let mut p = item(symbol_seq![17697, "/", 15733, ";", 8993]);
        p.modifier_stack.push(ModifierRecord {
            modifier_symbol: symbol_seq![15733, ";", 8993],
            modifier_gloss: "mind".into(),
            prepended: false,
        });
        assert!(!p.has_indicator());
        assert!(!p.clear_indicator(&[], &PassthroughInflector));
    }

    #[test]
    fn stale_indicator_record_dropped_with_its_symbol() {
        let mut p = item(symbol_seq![12335, ";", 8993, "/", 15162]);
        p.gloss = "give love (action)".into();
        p.indicator = Some(IndicatorRecord {
            indicator_id: 8993,
            bare_gloss: "give love".into(),
        });
        p.modifier_stack.push(ModifierRecord {
            modifier_symbol: symbol_seq![12335],
            modifier_gloss: "give".into(),
            prepended: true,
        });
        p.pop_modifier();
        assert_eq!(p.symbol, symbol_seq![8993, "/", 15162]);
        assert!(p.indicator.is_none());
        assert_eq!(p.gloss, "love");
    }

    #[test]
    fn rewritten_gloss_uses_substring_fallback() {
        let mut p = item(symbol_seq![17697]);
        p.push_modifier(symbol_seq![14947], "very", true);
        p.gloss = "the very big house".into();
        p.pop_modifier();
        assert_eq!(p.gloss, "the big house");
    }
}
