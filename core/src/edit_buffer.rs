//! Caret edit buffer.
//!
//! An ordered list of composed items plus a caret. The caret is `None`
//! before the first item ("no selection", `-1` in the integer form) or the
//! index of the selected item, so `-1 <= caret < len` always holds.
//!
//! Every operation takes the current value and returns the next one; the
//! buffer is never updated in place, so whoever holds a value holds a
//! consistent snapshot. Edits without an eligible target return an unchanged
//! copy instead of failing; the `can_*` predicates tell the caller in advance.

use crate::codec::{AlphabetMode, BuilderCodec};
use crate::error::Result;
use crate::inflection::Inflector;
use crate::payload::Payload;
use crate::symbol::{SymbolExpr, SymbolToken};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditBuffer {
    items: Vec<Payload>,
    caret: Option<usize>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            caret: None,
        }
    }

    pub fn items(&self) -> &[Payload] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn caret(&self) -> Option<usize> {
        self.caret
    }

    /// Caret as an integer, `-1` meaning no selection.
    pub fn caret_position(&self) -> isize {
        self.caret.map_or(-1, |c| c as isize)
    }

    /// Index edits apply to: the caret item, or the last item when nothing
    /// is selected.
    pub fn target_index(&self) -> Option<usize> {
        match self.caret {
            Some(c) => Some(c),
            None => self.items.len().checked_sub(1),
        }
    }

    pub fn target(&self) -> Option<&Payload> {
        self.target_index().and_then(|i| self.items.get(i))
    }

    // ========== Gating ==========

    pub fn can_delete(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn can_add_indicator(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn can_remove_indicator(&self) -> bool {
        self.target().is_some_and(Payload::has_indicator)
    }

    pub fn can_add_modifier(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn can_remove_modifier(&self) -> bool {
        self.target().is_some_and(Payload::has_modifiers)
    }

    // ========== Transitions ==========

    /// Push `item` to the end and select it.
    pub fn append(&self, item: Payload) -> Self {
        let mut items = self.items.clone();
        items.push(item);
        let caret = Some(items.len() - 1);
        Self { items, caret }
    }

    pub fn move_caret_backward(&self) -> Self {
        let caret = match self.caret {
            Some(0) | None => None,
            Some(c) => Some(c - 1),
        };
        Self {
            items: self.items.clone(),
            caret,
        }
    }

    pub fn move_caret_forward(&self) -> Self {
        let caret = match self.caret {
            None if self.items.is_empty() => None,
            None => Some(0),
            Some(c) if c + 1 < self.items.len() => Some(c + 1),
            Some(c) => Some(c),
        };
        Self {
            items: self.items.clone(),
            caret,
        }
    }

    /// Remove the target item. The caret moves to the item before it, or to
    /// no selection when the first item was removed or the buffer empties.
    /// Without a selection the last item is removed and the caret stays at
    /// no selection (`-1 - 1` clamps back to `-1`).
    pub fn delete_at_caret(&self) -> Self {
        let Some(index) = self.target_index() else {
            tracing::debug!("delete on empty edit buffer ignored");
            return self.clone();
        };
        let mut items = self.items.clone();
        items.remove(index);
        let caret = match self.caret {
            _ if items.is_empty() => None,
            None => None,
            Some(_) => index.checked_sub(1).map(|c| c.min(items.len() - 1)),
        };
        Self { items, caret }
    }

    pub fn clear_all(&self) -> Self {
        Self::new()
    }

    pub fn add_or_replace_indicator(&self, indicator_id: u32, inflector: &dyn Inflector) -> Self {
        self.edit_target("add indicator", |item| item.set_indicator(indicator_id, inflector))
    }

    pub fn remove_indicator(&self, suffixes: &[String], inflector: &dyn Inflector) -> Self {
        self.edit_target("remove indicator", |item| item.clear_indicator(suffixes, inflector))
    }

    pub fn add_modifier(&self, modifier_symbol: SymbolExpr, modifier_gloss: &str, prepend: bool) -> Self {
        self.edit_target("add modifier", |item| {
            item.push_modifier(modifier_symbol, modifier_gloss, prepend);
            true
        })
    }

    pub fn remove_last_modifier(&self) -> Self {
        self.edit_target("remove modifier", |item| item.pop_modifier().is_some())
    }

    fn edit_target<F>(&self, what: &str, edit: F) -> Self
    where
        F: FnOnce(&mut Payload) -> bool,
    {
        let Some(index) = self.target_index() else {
            tracing::debug!(operation = what, "no target item, ignored");
            return self.clone();
        };
        let mut next = self.clone();
        if !edit(&mut next.items[index]) {
            tracing::debug!(operation = what, index, "nothing to edit, ignored");
            return self.clone();
        }
        next
    }

    // ========== Output ==========

    /// All item symbols as one sequence, items separated by `//`.
    pub fn combined_symbol(&self) -> SymbolExpr {
        let mut tokens = Vec::new();
        for item in self.items.iter().filter(|i| !i.symbol.is_empty()) {
            if !tokens.is_empty() {
                tokens.push(SymbolToken::WordBreak);
            }
            tokens.extend(item.symbol.tokens());
        }
        SymbolExpr::Sequence(tokens)
    }

    /// The whole buffer as one builder string.
    pub fn encode_all(&self, codec: &BuilderCodec, mode: AlphabetMode) -> Result<String> {
        codec.encode_as(&self.combined_symbol(), mode)
    }

    /// Item glosses joined by spaces.
    pub fn gloss_text(&self) -> String {
        self.items
            .iter()
            .map(|i| i.gloss.as_str())
            .filter(|g| !g.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inflection::PassthroughInflector;
    use crate::symbol_seq;

    fn buffer_of(n: usize) -> EditBuffer {
        (0..n).fold(EditBuffer::new(), |buf, i| {
            buf.append(Payload::new(format!("cell-{}", i), format!("w{}", i), symbol_seq![12335]))
        })
    }

    #[test]
    fn append_selects_new_item() {
        let buf = buffer_of(3);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.caret(), Some(2));
        assert_eq!(buf.caret_position(), 2);
    }

    #[test]
    fn caret_moves_within_bounds() {
        let mut buf = buffer_of(2);
        for _ in 0..5 {
            buf = buf.move_caret_backward();
        }
        assert_eq!(buf.caret(), None);
        assert_eq!(buf.caret_position(), -1);
        for _ in 0..5 {
            buf = buf.move_caret_forward();
        }
        assert_eq!(buf.caret(), Some(1));
    }

    #[test]
    fn caret_on_empty_buffer_stays_unset() {
        let buf = EditBuffer::new().move_caret_forward().move_caret_backward();
        assert_eq!(buf.caret(), None);
    }

    #[test]
    fn delete_moves_caret_back() {
        let buf = buffer_of(3).move_caret_backward(); // caret 1
        let buf = buf.delete_at_caret();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.caret(), Some(0));
        assert_eq!(buf.items()[0].id, "cell-0");
        assert_eq!(buf.items()[1].id, "cell-2");
    }

    #[test]
    fn delete_first_item_leaves_no_selection() {
        let buf = buffer_of(2).move_caret_backward().delete_at_caret();
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.caret(), None);
        assert_eq!(buf.items()[0].id, "cell-1");
    }

    #[test]
    fn delete_without_selection_removes_last() {
        let buf = buffer_of(3)
            .move_caret_backward()
            .move_caret_backward()
            .move_caret_backward();
        assert_eq!(buf.caret(), None);
        let buf = buf.delete_at_caret();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.items()[1].id, "cell-1");
        assert_eq!(buf.caret(), None);
        assert_eq!(buf.caret_position(), -1);

        let buf = buf.delete_at_caret();
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.items()[0].id, "cell-0");
        assert_eq!(buf.caret(), None);
    }

    #[test]
    fn delete_until_empty() {
        let mut buf = buffer_of(2);
        buf = buf.delete_at_caret().delete_at_caret();
        assert!(buf.is_empty());
        assert_eq!(buf.caret(), None);
        assert_eq!(buf.delete_at_caret(), buf);
    }

    #[test]
    fn clear_all_resets() {
        let buf = buffer_of(4).clear_all();
        assert_eq!(buf, EditBuffer::new());
    }

    #[test]
    fn edits_leave_previous_value_untouched() {
        let before = buffer_of(1);
        let after = before.add_modifier(symbol_seq![14947], "very", true);
        assert_eq!(before.items()[0].symbol, symbol_seq![12335]);
        assert_eq!(after.items()[0].symbol, symbol_seq![14947, "/", 12335]);
    }

    #[test]
    fn gating_predicates() {
        let empty = EditBuffer::new();
        assert!(!empty.can_add_indicator());
        assert!(!empty.can_remove_indicator());
        assert!(!empty.can_remove_modifier());
        assert!(!empty.can_delete());

        let buf = buffer_of(1);
        assert!(buf.can_add_indicator());
        assert!(!buf.can_remove_indicator());
        assert!(!buf.can_remove_modifier());

        let buf = buf
            .add_or_replace_indicator(8993, &PassthroughInflector)
            .add_modifier(symbol_seq![14947], "very", false);
        assert!(buf.can_remove_indicator());
        assert!(buf.can_remove_modifier());
    }

    #[test]
    fn disallowed_edits_are_noops() {
        let empty = EditBuffer::new();
        assert_eq!(empty.add_or_replace_indicator(8993, &PassthroughInflector), empty);
        assert_eq!(empty.remove_last_modifier(), empty);

        let buf = buffer_of(2);
        assert_eq!(buf.remove_indicator(&[], &PassthroughInflector), buf);
        assert_eq!(buf.remove_last_modifier(), buf);
    }

    #[test]
    fn edits_target_caret_item() {
        let buf = buffer_of(3).move_caret_backward().move_caret_backward(); // caret 0
        let buf = buf.add_or_replace_indicator(8993, &PassthroughInflector);
        assert_eq!(buf.items()[0].symbol, symbol_seq![12335, ";", 8993]);
        assert_eq!(buf.items()[2].symbol, symbol_seq![12335]);
    }

    #[test]
    fn combined_output() {
        let buf = buffer_of(2).add_modifier(symbol_seq![14947], "very", true);
        assert_eq!(buf.combined_symbol(), symbol_seq![12335, "//", 14947, "/", 12335]);
        assert_eq!(buf.gloss_text(), "w0 very w1");
    }
}
