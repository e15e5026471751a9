//! Sets of quote conventions and the built-in registry.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use crate::convention::{QuotationMarkDirection, QuoteConvention};
use crate::detector::QuotationMarkTabulator;

const LDQ: &str = "\u{201C}";
const RDQ: &str = "\u{201D}";
const LSQ: &str = "\u{2018}";
const RSQ: &str = "\u{2019}";
const LOW_DQ: &str = "\u{201E}";
const LOW_SQ: &str = "\u{201A}";
const LAQ: &str = "\u{00AB}";
const RAQ: &str = "\u{00BB}";
const LSAQ: &str = "\u{2039}";
const RSAQ: &str = "\u{203A}";

/// Conventions shipped with the crate, in registry order.
pub static STANDARD_QUOTE_CONVENTIONS: LazyLock<QuoteConventionSet> = LazyLock::new(|| {
    let conventions = vec![
        QuoteConvention::from_pairs(
            "standard_english",
            &[(LDQ, RDQ), (LSQ, RSQ), (LDQ, RDQ), (LSQ, RSQ)],
        ),
        QuoteConvention::from_pairs(
            "typewriter_english",
            &[("\"", "\""), ("'", "'"), ("\"", "\""), ("'", "'")],
        ),
        QuoteConvention::from_pairs(
            "british_english",
            &[(LSQ, RSQ), (LDQ, RDQ), (LSQ, RSQ), (LDQ, RDQ)],
        ),
        QuoteConvention::from_pairs(
            "hybrid_typewriter_english",
            &[(LDQ, RDQ), ("'", "'"), (LDQ, RDQ)],
        ),
        QuoteConvention::from_pairs(
            "standard_french",
            &[(LAQ, RAQ), (LSAQ, RSAQ), (LAQ, RAQ), (LSAQ, RSAQ)],
        ),
        QuoteConvention::from_pairs(
            "typewriter_french",
            &[("<<", ">>"), ("<", ">"), ("<<", ">>"), ("<", ">")],
        ),
        QuoteConvention::from_pairs(
            "french_variant",
            &[(LSAQ, RSAQ), (LAQ, RAQ), (LSAQ, RSAQ), (LAQ, RAQ)],
        ),
        QuoteConvention::from_pairs("western_european", &[(LAQ, RAQ), (LDQ, RDQ), (LSQ, RSQ)]),
        QuoteConvention::from_pairs(
            "british_inspired_western_european",
            &[(LAQ, RAQ), (LSQ, RSQ), (LDQ, RDQ)],
        ),
        QuoteConvention::from_pairs(
            "typewriter_western_european",
            &[("<<", ">>"), ("\"", "\""), ("'", "'")],
        ),
        QuoteConvention::from_pairs(
            "typewriter_western_european_variant",
            &[("\"", "\""), ("<", ">"), ("'", "'")],
        ),
        QuoteConvention::from_pairs(
            "hybrid_typewriter_western_european",
            &[(LAQ, RAQ), ("\"", "\""), ("'", "'")],
        ),
        QuoteConvention::from_pairs(
            "central_european",
            &[(LOW_DQ, LDQ), (LOW_SQ, LSQ), (LOW_DQ, LDQ), (LOW_SQ, LSQ)],
        ),
        QuoteConvention::from_pairs(
            "central_european_guillemets",
            &[(RAQ, LAQ), (RSAQ, LSAQ), (RAQ, LAQ), (RSAQ, LSAQ)],
        ),
        QuoteConvention::from_pairs(
            "standard_swedish",
            &[(RDQ, RDQ), (RSQ, RSQ), (RDQ, RDQ), (RSQ, RSQ)],
        ),
        QuoteConvention::from_pairs(
            "standard_finnish",
            &[(RAQ, RAQ), (RSQ, RSQ), (RAQ, RAQ), (RSQ, RSQ)],
        ),
        QuoteConvention::from_pairs(
            "eastern_european",
            &[(LOW_DQ, RDQ), (LOW_SQ, RSQ), (LOW_DQ, RDQ), (LOW_SQ, RSQ)],
        ),
        QuoteConvention::from_pairs(
            "standard_russian",
            &[(LAQ, RAQ), (LOW_DQ, LDQ), (LOW_SQ, LSQ)],
        ),
        QuoteConvention::from_pairs(
            "standard_arabic",
            &[(RDQ, LDQ), (RSQ, LSQ), (RDQ, LDQ), (RSQ, LSQ)],
        ),
    ];
    QuoteConventionSet::new(conventions)
});

/// A set of conventions with lookup tables over their marks.
#[derive(Debug, Clone, Default)]
pub struct QuoteConventionSet {
    conventions: Vec<QuoteConvention>,
    opening_marks: BTreeSet<String>,
    closing_marks: BTreeSet<String>,
    closing_by_opening: BTreeMap<String, BTreeSet<String>>,
    opening_by_closing: BTreeMap<String, BTreeSet<String>>,
}

impl QuoteConventionSet {
    /// Builds the set and its mark tables.
    #[must_use]
    pub fn new(conventions: Vec<QuoteConvention>) -> Self {
        let mut set = Self {
            conventions,
            ..Self::default()
        };
        for convention in &set.conventions {
            for level in convention.levels() {
                set.opening_marks.insert(level.opening().to_string());
                set.closing_marks.insert(level.closing().to_string());
                set.closing_by_opening
                    .entry(level.opening().to_string())
                    .or_default()
                    .insert(level.closing().to_string());
                set.opening_by_closing
                    .entry(level.closing().to_string())
                    .or_default()
                    .insert(level.opening().to_string());
            }
        }
        set
    }

    /// The built-in registry.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD_QUOTE_CONVENTIONS
    }

    /// Conventions in registry order.
    #[must_use]
    pub fn conventions(&self) -> &[QuoteConvention] {
        &self.conventions
    }

    /// Number of conventions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conventions.len()
    }

    /// True when the set holds no conventions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conventions.is_empty()
    }

    /// Looks a convention up by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&QuoteConvention> {
        self.conventions.iter().find(|c| c.name() == name)
    }

    /// True when some convention opens with `mark`.
    #[must_use]
    pub fn is_valid_opening_quotation_mark(&self, mark: &str) -> bool {
        self.opening_marks.contains(mark)
    }

    /// True when some convention closes with `mark`.
    #[must_use]
    pub fn is_valid_closing_quotation_mark(&self, mark: &str) -> bool {
        self.closing_marks.contains(mark)
    }

    /// True when `mark` is a quotation mark in any direction.
    #[must_use]
    pub fn is_quotation_mark(&self, mark: &str) -> bool {
        self.is_valid_opening_quotation_mark(mark) || self.is_valid_closing_quotation_mark(mark)
    }

    /// True when `mark` opens in some convention and closes in some
    /// convention.
    #[must_use]
    pub fn is_quotation_mark_direction_ambiguous(&self, mark: &str) -> bool {
        self.is_valid_opening_quotation_mark(mark) && self.is_valid_closing_quotation_mark(mark)
    }

    /// True when some level pairs `opening` with `closing`.
    #[must_use]
    pub fn marks_are_a_valid_pair(&self, opening: &str, closing: &str) -> bool {
        self.closing_by_opening
            .get(opening)
            .is_some_and(|closings| closings.contains(closing))
    }

    /// Marks that can pair with `mark` in the other direction.
    #[must_use]
    pub fn possible_paired_marks(
        &self,
        mark: &str,
        direction: QuotationMarkDirection,
    ) -> BTreeSet<&str> {
        let table = match direction {
            QuotationMarkDirection::Opening => &self.closing_by_opening,
            QuotationMarkDirection::Closing => &self.opening_by_closing,
        };
        table
            .get(mark)
            .map(|marks| marks.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Depths at which any convention uses `mark` in `direction`.
    #[must_use]
    pub fn possible_depths(&self, mark: &str, direction: QuotationMarkDirection) -> BTreeSet<usize> {
        self.conventions
            .iter()
            .flat_map(|c| c.depths_of(mark, direction))
            .collect()
    }

    /// Deepest level any convention declares.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.conventions
            .iter()
            .map(QuoteConvention::num_levels)
            .max()
            .unwrap_or(0)
    }

    /// Conventions consistent with the observed marks.
    #[must_use]
    pub fn filter_to_compatible(
        &self,
        opening: &BTreeSet<String>,
        closing: &BTreeSet<String>,
    ) -> Self {
        Self::new(
            self.conventions
                .iter()
                .filter(|c| c.is_compatible_with_observed_quotation_marks(opening, closing))
                .cloned()
                .collect(),
        )
    }

    /// The convention that best explains the tabulated marks, with its
    /// score. Earlier conventions win ties.
    #[must_use]
    pub fn find_most_similar_convention(
        &self,
        tabulator: &QuotationMarkTabulator,
    ) -> Option<(&QuoteConvention, f64)> {
        let mut best: Option<(&QuoteConvention, f64)> = None;
        for convention in &self.conventions {
            let score = tabulator.calculate_similarity(convention);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((convention, score));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_holds_every_builtin() {
        let set = QuoteConventionSet::standard();
        assert_eq!(set.len(), 19);
        for name in [
            "standard_english",
            "british_english",
            "typewriter_english",
            "hybrid_typewriter_english",
            "standard_french",
            "typewriter_french",
            "french_variant",
            "western_european",
            "typewriter_western_european",
            "typewriter_western_european_variant",
            "british_inspired_western_european",
            "hybrid_typewriter_western_european",
            "central_european",
            "central_european_guillemets",
            "standard_swedish",
            "standard_finnish",
            "eastern_european",
            "standard_russian",
            "standard_arabic",
        ] {
            assert!(set.get_by_name(name).is_some(), "{name}");
        }
        assert!(set.get_by_name("klingon").is_none());
    }

    #[test]
    fn mark_tables() {
        let set = QuoteConventionSet::standard();
        assert!(set.is_valid_opening_quotation_mark("\u{201C}"));
        assert!(set.is_valid_closing_quotation_mark("\u{201C}"));
        assert!(set.is_quotation_mark_direction_ambiguous("\""));
        assert!(set.marks_are_a_valid_pair("\u{201E}", "\u{201C}"));
        assert!(!set.marks_are_a_valid_pair("\u{201C}", "\u{00BB}"));
        assert!(set.is_quotation_mark("<<"));
        assert!(!set.is_quotation_mark("x"));
        assert_eq!(set.max_depth(), 4);
    }

    #[test]
    fn filtering_keeps_compatible_conventions() {
        let set = QuoteConventionSet::standard();
        let opening: BTreeSet<String> = ["\u{00AB}".to_string(), "\u{201C}".to_string()].into();
        let closing: BTreeSet<String> = ["\u{00BB}".to_string(), "\u{201D}".to_string()].into();
        let filtered = set.filter_to_compatible(&opening, &closing);
        let names: Vec<&str> = filtered.conventions().iter().map(QuoteConvention::name).collect();
        assert!(names.contains(&"western_european"));
        assert!(!names.contains(&"standard_english"));
    }
}
