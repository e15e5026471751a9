//! Integration tests for quote convention detection

use scripture_quotes::{
    QuotationMarkDirection, QuoteConventionDetector, QuoteConventionSet, detect_quote_convention,
};
use scripture_usfm::parse_usfm;

use crate::convention;

fn best(usfm: &str) -> String {
    detect_quote_convention(usfm)
        .map(|analysis| analysis.best_quote_convention.name().to_string())
        .unwrap_or_default()
}

#[test]
fn detects_european_conventions() {
    assert_eq!(
        best("\\id GEN\n\\c 1\n\\p\n\\v 1 Er sagte: \u{201E}Geh, \u{201A}jetzt\u{2018}.\u{201C}\n"),
        "central_european"
    );
    assert_eq!(
        best("\\id GEN\n\\c 1\n\\p\n\\v 1 Il dit: <<Va, <maintenant>.>>\n"),
        "typewriter_french"
    );
}

#[test]
fn analysis_carries_the_tabulated_marks() {
    let analysis = detect_quote_convention(
        "\\id GEN\n\\c 1\n\\p\n\\v 1 \u{201C}One.\u{201D}\n\\v 2 \u{201C}Two.\u{201D}\n",
    )
    .expect("marks found");
    assert_eq!(analysis.best_quote_convention.name(), "standard_english");
    assert!((analysis.best_quote_convention_score - 1.0).abs() < f64::EPSILON);
    assert_eq!(
        analysis
            .tabulator
            .count(1, QuotationMarkDirection::Opening, "\u{201C}"),
        2
    );
}

#[test]
fn candidates_can_be_restricted() {
    let mut detector = QuoteConventionDetector::new();
    parse_usfm(
        "\\id GEN\n\\c 1\n\\p\n\\v 1 He said, \u{201C}Go.\u{201D}\n",
        &mut detector,
        None,
        None,
    );
    let only_british = QuoteConventionSet::new(vec![convention("british_english")]);
    let analysis = detector
        .detect_quote_convention(Some(&only_british))
        .expect("marks found");
    assert_eq!(analysis.best_quote_convention.name(), "british_english");
    assert!(analysis.best_quote_convention_score < 1.0);
}

#[test]
fn headings_do_not_count() {
    assert!(detect_quote_convention("\\id GEN\n\\c 1\n\\s The \u{201C}Word\u{201D}\n\\p\n\\v 1 Plain.\n").is_none());
}
