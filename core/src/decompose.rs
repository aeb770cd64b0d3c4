// core/src/decompose.rs
//
// Recursive expansion of composite symbols into elementary identifiers.
//
// An identifier expands to `[id]` when its dictionary entry is elementary or
// has no composition, and to the expansion of its composition otherwise.
// Sequences expand element-wise; punctuation stays where it was.
//
// The dictionary is external data, so the walk keeps the chain of
// identifiers being expanded and refuses to re-enter one of them
// (`CyclicComposition`) or to nest deeper than the configured limit
// (`DepthExceeded`).

use crate::dictionary::SymbolDictionary;
use crate::error::{EngineError, Result};
use crate::symbol::{SymbolExpr, SymbolToken};
use std::cell::{Cell, RefCell};
use std::num::NonZeroUsize;
use std::sync::Arc;

pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Expansion of one identifier; `None` when something in it is unknown.
type Expansion = Option<Vec<SymbolToken>>;

/// Cached expansion together with how many composition levels it spans, so
/// a cache hit is held to the same depth limit as a fresh walk.
#[derive(Clone)]
struct CachedExpansion {
    tokens: Expansion,
    height: usize,
}

pub struct Decomposer {
    dictionary: Arc<SymbolDictionary>,
    max_depth: usize,
    cache: RefCell<lru::LruCache<u32, CachedExpansion>>,
    cache_hits: Cell<usize>,
    cache_misses: Cell<usize>,
}

impl Decomposer {
    pub fn new(dictionary: Arc<SymbolDictionary>) -> Self {
        Self::with_limits(dictionary, DEFAULT_MAX_DEPTH, 1000)
    }

    pub fn with_limits(dictionary: Arc<SymbolDictionary>, max_depth: usize, cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            dictionary,
            max_depth: max_depth.max(1),
            cache: RefCell::new(lru::LruCache::new(capacity)),
            cache_hits: Cell::new(0),
            cache_misses: Cell::new(0),
        }
    }

    pub fn dictionary(&self) -> &SymbolDictionary {
        &self.dictionary
    }

    /// Expand `expr` into elementary identifiers and punctuation.
    ///
    /// Returns `Ok(None)` when any identifier reached is missing from the
    /// dictionary. Decomposing an already decomposed sequence returns an
    /// equal sequence.
    pub fn decompose(&self, expr: &SymbolExpr) -> Result<Option<SymbolExpr>> {
        let mut chain = Vec::new();
        let expanded = match expr {
            SymbolExpr::Single(id) => self.expand_id(*id, &mut chain)?.0,
            SymbolExpr::Sequence(tokens) => self.expand_tokens(tokens, &mut chain)?.0,
        };
        if expanded.is_none() {
            tracing::debug!(symbol = %expr, "decomposition reached an unknown identifier");
        }
        Ok(expanded.map(SymbolExpr::Sequence))
    }

    pub fn decompose_id(&self, id: u32) -> Result<Option<SymbolExpr>> {
        self.decompose(&SymbolExpr::Single(id))
    }

    /// Expand every identifier in `tokens`. The height is how many levels
    /// below this one the walk reached.
    fn expand_tokens(&self, tokens: &[SymbolToken], chain: &mut Vec<u32>) -> Result<(Expansion, usize)> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut height = 0;
        for token in tokens {
            match token {
                SymbolToken::Id(id) => {
                    let (part, below) = self.expand_id(*id, chain)?;
                    height = height.max(below + 1);
                    match part {
                        Some(part) => out.extend(part),
                        None => return Ok((None, height)),
                    }
                }
                other => out.push(*other),
            }
        }
        Ok((Some(out), height))
    }

    fn expand_id(&self, id: u32, chain: &mut Vec<u32>) -> Result<(Expansion, usize)> {
        let cached = self.cache.borrow_mut().get(&id).cloned();
        if let Some(hit) = cached {
            self.cache_hits.set(self.cache_hits.get() + 1);
            // a cached expansion still has to fit under the limit from here
            if chain.len() + hit.height >= self.max_depth {
                return Err(EngineError::DepthExceeded {
                    id,
                    limit: self.max_depth,
                });
            }
            return Ok((hit.tokens, hit.height));
        }

        if chain.contains(&id) {
            let mut path = chain.clone();
            path.push(id);
            tracing::warn!(?path, "cyclic composition in symbol dictionary");
            return Err(EngineError::CyclicComposition { path });
        }
        if chain.len() >= self.max_depth {
            return Err(EngineError::DepthExceeded {
                id,
                limit: self.max_depth,
            });
        }

        self.cache_misses.set(self.cache_misses.get() + 1);

        let (tokens, height) = match self.dictionary.get(id) {
            None => (None, 0),
            Some(entry) => match entry.expansion() {
                None => (Some(vec![SymbolToken::Id(id)]), 0),
                Some(composition) => {
                    chain.push(id);
                    let expanded = self.expand_tokens(&composition.tokens(), chain);
                    chain.pop();
                    expanded?
                }
            },
        };

        self.cache.borrow_mut().put(
            id,
            CachedExpansion {
                tokens: tokens.clone(),
                height,
            },
        );
        Ok((tokens, height))
    }

    /// (hits, misses) since creation or the last `clear_cache`.
    pub fn cache_stats(&self) -> (usize, usize) {
        (self.cache_hits.get(), self.cache_misses.get())
    }

    pub fn cache_len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
        self.cache_hits.set(0);
        self.cache_misses.set(0);
    }
}

impl std::fmt::Debug for Decomposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decomposer")
            .field("entries", &self.dictionary.len())
            .field("max_depth", &self.max_depth)
            .field("cached", &self.cache_len())
            .finish()
    }
}
