//! Integration tests for whole-document quotation conversion

use scripture_quotes::{
    QuotationDenormalizationSettings, QuotationMarkResolutionIssue, QuotationMarkUpdateFirstPass,
    QuotationMarkUpdateStrategy, change_quotation_marks, convert_quotation_marks,
    denormalize_quotation_marks,
};
use scripture_usfm::parse_usfm;

use crate::convention;

const MIXED: &str = "\\id GEN\n\\c 1\n\\p\n\\v 1 He said, \"Go.\"\n\
\\c 2\n\\p\n\\v 1 He said, \"Go.\n\
\\c 3\n\\p\n\\v 1 a\"b\n";

// =============================================================================
// Per-chapter Strategies
// =============================================================================

#[test]
fn first_pass_reports_each_chapter() {
    let mut first_pass = QuotationMarkUpdateFirstPass::for_denormalization(convention("standard_english"));
    parse_usfm(MIXED, &mut first_pass, None, None);
    assert!(first_pass.fallback_mode_feasible());

    let summaries = first_pass.find_best_chapter_strategies();
    assert_eq!(summaries.len(), 3);
    assert!(summaries[0].issues.is_empty());
    assert!(summaries[1]
        .issues
        .contains(&QuotationMarkResolutionIssue::UnpairedQuotationMark));
    assert!(summaries[2]
        .issues
        .contains(&QuotationMarkResolutionIssue::AmbiguousQuotationMark));
    assert_eq!(summaries[2].strategy, QuotationMarkUpdateStrategy::Skip);
}

#[test]
fn denormalization_applies_the_chosen_strategies() {
    let usfm = denormalize_quotation_marks(MIXED, &convention("standard_english"));
    assert!(usfm.contains("\\v 1 He said, \u{201C}Go.\u{201D}"), "{usfm}");
    assert!(usfm.contains("\\v 1 He said, \u{201C}Go.\r\n"), "{usfm}");
    assert!(usfm.contains("\\v 1 a\"b"), "{usfm}");
}

#[test]
fn summaries_feed_the_settings() {
    let mut first_pass = QuotationMarkUpdateFirstPass::for_denormalization(convention("standard_english"));
    parse_usfm(MIXED, &mut first_pass, None, None);
    let settings = QuotationDenormalizationSettings::for_target(convention("standard_english"))
        .with_chapter_summaries(&first_pass.find_best_chapter_strategies());
    assert_eq!(settings.strategy_for_chapter(1), QuotationMarkUpdateStrategy::ApplyFull);
    assert_eq!(settings.strategy_for_chapter(2), QuotationMarkUpdateStrategy::ApplyFallback);
    assert_eq!(settings.strategy_for_chapter(3), QuotationMarkUpdateStrategy::Skip);
    assert_eq!(settings.strategy_for_chapter(9), QuotationMarkUpdateStrategy::ApplyFull);
}

// =============================================================================
// Conventions
// =============================================================================

#[test]
fn british_to_american_swaps_levels() {
    let usfm = convert_quotation_marks(
        "\\id MAT\n\\c 1\n\\p\n\\v 1 He said, \u{2018}Who said \u{201C}Go\u{201D}?\u{2019}\n",
        &convention("british_english"),
        &convention("standard_english"),
    );
    assert!(
        usfm.contains("He said, \u{201C}Who said \u{2018}Go\u{2019}?\u{201D}"),
        "{usfm}"
    );
}

#[test]
fn headings_and_notes_are_converted_too() {
    let settings = QuotationDenormalizationSettings::new(
        convention("typewriter_english"),
        convention("standard_english"),
    );
    let usfm = change_quotation_marks(
        "\\id MAT\n\\c 1\n\\s The \"Word\"\n\\p\n\\v 1 a\\f + \\ft Or \"b\"\\f*\n",
        settings,
    );
    assert!(usfm.contains("\\s The \u{201C}Word\u{201D}"), "{usfm}");
    assert!(usfm.contains("\\ft Or \u{201C}b\u{201D}"), "{usfm}");
}

#[test]
fn apostrophes_are_left_alone() {
    let settings = QuotationDenormalizationSettings::new(
        convention("typewriter_english"),
        convention("standard_english"),
    );
    let usfm = change_quotation_marks(
        "\\id MAT\n\\c 1\n\\p\n\\v 1 \"Don't go,\" he said.\n",
        settings,
    );
    assert!(usfm.contains("\u{201C}Don't go,\u{201D} he said."), "{usfm}");
}
