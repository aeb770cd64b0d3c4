//! Edit session management.
//!
//! The `EditSession` holds the one shared edit buffer together with the
//! engine that decomposes appended symbols. The buffer lives in a single
//! `Arc` cell that every operation replaces wholesale, so a snapshot taken
//! by an observer is never partially updated.

use crate::edit_buffer::EditBuffer;
use crate::engine::SymbolEngine;
use crate::inflection::{Inflector, PassthroughInflector};
use crate::payload::Payload;
use crate::symbol::SymbolExpr;
use std::sync::Arc;

pub struct EditSession {
    engine: SymbolEngine,
    buffer: Arc<EditBuffer>,
    inflector: Box<dyn Inflector>,
}

impl EditSession {
    pub fn new(engine: SymbolEngine) -> Self {
        Self::with_inflector(engine, Box::new(PassthroughInflector))
    }

    pub fn with_inflector(engine: SymbolEngine, inflector: Box<dyn Inflector>) -> Self {
        Self {
            engine,
            buffer: Arc::new(EditBuffer::new()),
            inflector,
        }
    }

    pub fn engine(&self) -> &SymbolEngine {
        &self.engine
    }

    /// Current buffer value.
    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    /// Shared handle to the current buffer value; later edits do not change it.
    pub fn snapshot(&self) -> Arc<EditBuffer> {
        Arc::clone(&self.buffer)
    }

    fn replace(&mut self, next: EditBuffer) {
        self.buffer = Arc::new(next);
    }

    /// Append a palette item. The symbol is stored decomposed; when it cannot
    /// be decomposed it is stored as given.
    pub fn append(&mut self, id: &str, gloss: &str, symbol: SymbolExpr) {
        let stored = match self.engine.decompose(&symbol) {
            Ok(Some(expanded)) => expanded,
            Ok(None) => {
                tracing::warn!(%symbol, "appending symbol with unknown identifiers undecomposed");
                SymbolExpr::Sequence(symbol.into_tokens())
            }
            Err(e) => {
                tracing::warn!(%symbol, error = %e, "appending undecomposable symbol as given");
                SymbolExpr::Sequence(symbol.into_tokens())
            }
        };
        let item = Payload::new(id, crate::utils::normalize(gloss), stored);
        let next = self.buffer.append(item);
        self.replace(next);
    }

    /// Append a dictionary symbol by identifier, glossed from the dictionary.
    /// Returns false when the identifier is unknown.
    pub fn append_id(&mut self, id: u32) -> bool {
        let Some(gloss) = self.engine.gloss(id).map(str::to_string) else {
            tracing::debug!(id, "cannot append unknown symbol");
            return false;
        };
        self.append(&id.to_string(), &gloss, SymbolExpr::Single(id));
        true
    }

    pub fn move_caret_backward(&mut self) {
        let next = self.buffer.move_caret_backward();
        self.replace(next);
    }

    pub fn move_caret_forward(&mut self) {
        let next = self.buffer.move_caret_forward();
        self.replace(next);
    }

    pub fn delete_at_caret(&mut self) {
        let next = self.buffer.delete_at_caret();
        self.replace(next);
    }

    pub fn clear_all(&mut self) {
        let next = self.buffer.clear_all();
        self.replace(next);
    }

    pub fn add_or_replace_indicator(&mut self, indicator_id: u32) {
        if !self.engine.is_indicator(indicator_id) {
            tracing::debug!(indicator_id, "attaching identifier outside the indicator table");
        }
        let next = self
            .buffer
            .add_or_replace_indicator(indicator_id, self.inflector.as_ref());
        self.replace(next);
    }

    pub fn remove_indicator(&mut self) {
        let next = self.buffer.remove_indicator(
            &self.engine.config().indicator_suffixes,
            self.inflector.as_ref(),
        );
        self.replace(next);
    }

    pub fn add_modifier(&mut self, modifier_symbol: SymbolExpr, modifier_gloss: &str, prepend: bool) {
        let next = self
            .buffer
            .add_modifier(modifier_symbol, modifier_gloss, prepend);
        self.replace(next);
    }

    /// Add a dictionary modifier by identifier, glossed from the dictionary.
    pub fn add_modifier_id(&mut self, modifier_id: u32, prepend: bool) -> bool {
        let Some(gloss) = self.engine.gloss(modifier_id).map(str::to_string) else {
            return false;
        };
        self.add_modifier(SymbolExpr::Single(modifier_id), &gloss, prepend);
        true
    }

    pub fn remove_last_modifier(&mut self) {
        let next = self.buffer.remove_last_modifier();
        self.replace(next);
    }

    pub fn can_add_indicator(&self) -> bool {
        self.buffer.can_add_indicator()
    }

    pub fn can_remove_indicator(&self) -> bool {
        self.buffer.can_remove_indicator()
    }

    pub fn can_remove_modifier(&self) -> bool {
        self.buffer.can_remove_modifier()
    }

    /// The buffer as a builder string in the configured default alphabet.
    pub fn builder_string(&self) -> crate::error::Result<String> {
        self.buffer
            .encode_all(self.engine.codec(), self.engine.config().default_alphabet)
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("engine", &self.engine)
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}
