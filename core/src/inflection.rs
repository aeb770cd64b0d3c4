//! Grammatical inflection of glosses.
//!
//! Attaching an indicator to a word may change how its gloss reads (a noun
//! turning into a verb, a plural, ...). The engine does not know the
//! grammar; it asks an `Inflector` supplied by the caller.

pub trait Inflector {
    /// Gloss of a word glossed `bare` once `indicator` is attached.
    fn inflect(&self, bare: &str, indicator: u32) -> String;

    /// Bare gloss of a word whose indicator was removed, when no stored
    /// record or known suffix explains the current gloss.
    fn uninflect(&self, gloss: &str) -> String;
}

/// Leaves glosses untouched in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughInflector;

impl Inflector for PassthroughInflector {
    fn inflect(&self, bare: &str, _indicator: u32) -> String {
        bare.to_string()
    }

    fn uninflect(&self, gloss: &str) -> String {
        gloss.to_string()
    }
}
