//! Multi-step pipelines: check, update, then fix quotation marks

use scripture::quotes::{QuoteConventionSet, denormalize_quotation_marks, detect_quote_convention};
use scripture::usfm::{
    UpdateUsfmConfig, UpdateUsfmRow, UsfmTokenType, UsfmTokenizer, check_usfm_versification,
    update_usfm,
};
use scripture::versification::{ScriptureRef, Versification};

const SOURCE: &str = "\\id RUT - Sample\n\\c 1\n\\s1 Naomi\n\\p\n\\v 1 In the days\n\\v 2 The man\n";

fn rows() -> Vec<UpdateUsfmRow> {
    [
        ("RUT 1:1", "In the days when the judges ruled, she said, \"Go.\""),
        ("RUT 1:2", "He answered, \"I said, 'Stay.'\""),
    ]
    .into_iter()
    .map(|(reference, text)| {
        let scripture_ref =
            ScriptureRef::parse(reference, Versification::english()).expect("valid ref");
        UpdateUsfmRow::new(vec![scripture_ref], text)
    })
    .collect()
}

#[test]
fn translate_then_denormalize() {
    let draft = update_usfm(SOURCE, rows(), UpdateUsfmConfig::default(), None, None);
    let detected = detect_quote_convention(&draft).expect("marks found");
    assert_eq!(detected.best_quote_convention.name(), "typewriter_english");

    let english = QuoteConventionSet::standard()
        .get_by_name("standard_english")
        .expect("built-in");
    let finished = denormalize_quotation_marks(&draft, english);
    assert!(finished.contains("she said, \u{201C}Go.\u{201D}"), "{finished}");
    assert!(
        finished.contains("He answered, \u{201C}I said, \u{2018}Stay.\u{2019}\u{201D}"),
        "{finished}"
    );

    let detected = detect_quote_convention(&finished).expect("marks found");
    assert_eq!(detected.best_quote_convention.name(), "standard_english");
}

#[test]
fn markers_survive_every_step() {
    let markers = |usfm: &str| -> Vec<(UsfmTokenType, Option<String>)> {
        UsfmTokenizer::default()
            .tokenize(usfm)
            .into_iter()
            .filter(|t| t.token_type != UsfmTokenType::Text)
            .map(|t| (t.token_type, t.marker))
            .collect()
    };
    let draft = update_usfm(SOURCE, rows(), UpdateUsfmConfig::default(), None, None);
    let english = QuoteConventionSet::standard()
        .get_by_name("standard_english")
        .expect("built-in");
    let finished = denormalize_quotation_marks(&draft, english);
    assert_eq!(markers(&finished), markers(SOURCE));
    assert!(check_usfm_versification(&finished, Versification::english())
        .iter()
        .all(|e| e.error_type != scripture::usfm::UsfmVersificationErrorType::ExtraVerse));
}
