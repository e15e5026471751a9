//! Integration tests for conventions and the registry

use std::collections::BTreeSet;

use scripture_quotes::{
    QuotationMarkDirection, QuoteConvention, QuoteConventionSet, STANDARD_QUOTE_CONVENTIONS,
    normalize_quotation_mark,
};

use crate::convention;

// =============================================================================
// Conventions
// =============================================================================

#[test]
fn marks_by_depth() {
    let english = convention("standard_english");
    assert_eq!(english.num_levels(), 4);
    assert_eq!(english.opening_mark_at_depth(1), Some("\u{201C}"));
    assert_eq!(english.closing_mark_at_depth(2), Some("\u{2019}"));
    assert_eq!(english.opening_mark_at_depth(5), None);
    assert_eq!(english.opening_mark_at_depth(0), None);
    assert_eq!(
        english.expected_mark(3, QuotationMarkDirection::Closing),
        Some("\u{201D}")
    );
}

#[test]
fn normalizing_collapses_to_ascii() {
    let normalized = convention("western_european").normalize();
    assert_eq!(normalized.name(), "western_european_normalized");
    assert_eq!(normalized.opening_mark_at_depth(1), Some("\""));
    assert_eq!(normalized.opening_mark_at_depth(2), Some("\""));
    assert_eq!(normalized.closing_mark_at_depth(3), Some("'"));
    assert_eq!(normalize_quotation_mark("\u{00BB}"), "\"");
    assert_eq!(normalize_quotation_mark("\u{203A}"), "'");
    assert_eq!(normalize_quotation_mark("x"), "x");
}

#[test]
fn compatibility_needs_the_first_opening_mark() {
    let english = convention("standard_english");
    let observed = |marks: &[&str]| -> BTreeSet<String> {
        marks.iter().map(ToString::to_string).collect()
    };
    assert!(english.is_compatible_with_observed_quotation_marks(
        &observed(&["\u{201C}", "\u{2018}"]),
        &observed(&["\u{201D}"])
    ));
    assert!(!english.is_compatible_with_observed_quotation_marks(
        &observed(&["\u{2018}"]),
        &observed(&["\u{2019}"])
    ));
    assert!(!english.is_compatible_with_observed_quotation_marks(
        &observed(&["\u{201C}"]),
        &observed(&["\u{00BB}"])
    ));
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn registry_is_shared_and_ordered() {
    let registry = QuoteConventionSet::standard();
    assert!(std::ptr::eq(registry, &*STANDARD_QUOTE_CONVENTIONS));
    assert_eq!(registry.conventions()[0].name(), "standard_english");
    assert_eq!(registry.len(), 19);
}

#[test]
fn custom_sets_build_their_own_tables() {
    let set = QuoteConventionSet::new(vec![
        QuoteConvention::from_pairs("angles", &[("<", ">"), ("[", "]")]),
        convention("standard_english"),
    ]);
    assert!(set.is_valid_opening_quotation_mark("<"));
    assert!(set.marks_are_a_valid_pair("[", "]"));
    assert!(!set.is_quotation_mark_direction_ambiguous("\u{201C}"));
    assert_eq!(
        set.possible_depths("\u{201C}", QuotationMarkDirection::Opening),
        BTreeSet::from([1, 3])
    );
    assert_eq!(set.max_depth(), 4);
}
