// core/src/roles.rs
//
// Role classification of BCI-AV identifiers.
//
// Indicators are the small marks overlaid (`;`) on a symbol to give it a
// grammatical role (action, description, plural, ...). Modifiers are whole
// symbols concatenated (`/`) in front of or behind a word to qualify it
// (intensity, opposite, ordinals, ...).
//
// Both classifiers are total: an identifier in neither table is neither.
// The tables are disjoint.

use phf::phf_set;
use std::ops::RangeInclusive;

/// Closed identifier ranges reserved for indicators.
const INDICATOR_RANGES: [RangeInclusive<u32>; 3] = [8993..=9009, 9011..=9012, 24665..=24674];

/// Indicators outside the reserved ranges.
static INDICATOR_IDS: phf::Set<u32> = phf_set! {
    24807u32, 25458u32, 25459u32, 25460u32, 28043u32, 28044u32, 28045u32, 28046u32, 28052u32,
};

/// Quantity and degree modifiers (many, intensity, all, part of, ...).
static QUANTIFIER_MODIFIERS: phf::Set<u32> = phf_set! {
    14647u32, 14947u32, 15927u32, 17705u32, 17720u32, 12663u32, 15936u32,
};

/// Relational and evaluative modifiers (opposite, generalization, similar,
/// question, ...).
static RELATIONAL_MODIFIERS: phf::Set<u32> = phf_set! {
    15474u32, 14430u32, 15972u32, 12352u32, 13100u32, 16436u32, 21624u32,
};

/// Ordinal number markers.
const ORDINAL_RANGE: RangeInclusive<u32> = 8510..=8519;

/// Signalling markers (quotation, metaphor, slang, ...).
static SIGNALLING_MODIFIERS: phf::Set<u32> = phf_set! {
    24879u32, 24880u32, 24881u32, 25514u32, 25515u32,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolRole {
    Indicator,
    Modifier,
    Plain,
}

pub fn is_indicator(id: u32) -> bool {
    INDICATOR_RANGES.iter().any(|r| r.contains(&id)) || INDICATOR_IDS.contains(&id)
}

pub fn is_modifier(id: u32) -> bool {
    QUANTIFIER_MODIFIERS.contains(&id)
        || RELATIONAL_MODIFIERS.contains(&id)
        || ORDINAL_RANGE.contains(&id)
        || SIGNALLING_MODIFIERS.contains(&id)
}

pub fn classify(id: u32) -> SymbolRole {
    if is_indicator(id) {
        SymbolRole::Indicator
    } else if is_modifier(id) {
        SymbolRole::Modifier
    } else {
        SymbolRole::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_ranges_are_closed() {
        assert!(is_indicator(8993));
        assert!(is_indicator(9009));
        assert!(!is_indicator(9010));
        assert!(is_indicator(9011));
        assert!(is_indicator(9012));
        assert!(!is_indicator(9013));
        assert!(is_indicator(24665));
        assert!(is_indicator(24674));
        assert!(!is_indicator(8992));
    }

    #[test]
    fn explicit_indicators() {
        assert!(is_indicator(28043));
        assert!(is_indicator(24807));
        assert!(!is_indicator(28047));
    }

    #[test]
    fn modifier_categories() {
        assert!(is_modifier(14947));
        assert!(is_modifier(17720));
        assert!(is_modifier(15474));
        assert!(is_modifier(8510));
        assert!(is_modifier(8519));
        assert!(!is_modifier(8520));
        assert!(is_modifier(24879));
    }

    #[test]
    fn unknown_ids_are_plain() {
        for id in [0, 1, 12335, 8499, 17697, 15162, 15733, u32::MAX] {
            assert_eq!(classify(id), SymbolRole::Plain, "id {}", id);
        }
    }

    #[test]
    fn tables_are_disjoint() {
        for id in 0..30_000 {
            assert!(!(is_indicator(id) && is_modifier(id)), "id {} in both tables", id);
        }
    }
}
