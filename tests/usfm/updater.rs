//! Integration tests for the token-stream updater

use scripture_usfm::{UpdateUsfmConfig, UpdateUsfmRow, UsfmTokenizer, detokenize, update_usfm};
use scripture_versification::{ScriptureRef, Versification};

fn row(reference: &str, text: &str) -> UpdateUsfmRow {
    let scripture_ref = ScriptureRef::parse(reference, Versification::english()).expect("valid ref");
    UpdateUsfmRow::new(vec![scripture_ref], text)
}

fn update(usfm: &str, rows: Vec<UpdateUsfmRow>, config: UpdateUsfmConfig) -> String {
    update_usfm(usfm, rows, config, None, None)
}

const BOOK: &str = "\\id LUK - Sample\n\\h Luke\n\\c 1\n\\s1 Dedication\n\\p\n\
\\v 1 Many have undertaken\\f + \\fr 1:1 \\ft Or \\fq fulfilled\\f* to compile\n\
\\v 2 just as \\nd they\\nd* delivered\n\\q1 them to us\n\\v 3 it seemed good\n";

// =============================================================================
// Preservation
// =============================================================================

#[test]
fn no_rows_reproduce_the_canonical_form() {
    let expected = detokenize(&UsfmTokenizer::default().tokenize(BOOK));
    assert_eq!(update(BOOK, Vec::new(), UpdateUsfmConfig::default()), expected);
}

#[test]
fn existing_text_wins_when_preferred() {
    let config = UpdateUsfmConfig::default().with_prefer_existing_text(true);
    let result = update(BOOK, vec![row("LUK 1:3", "replacement")], config);
    assert!(result.contains("\\v 3 it seemed good"));
    assert!(!result.contains("replacement"));
}

#[test]
fn strip_removes_every_text() {
    let config = UpdateUsfmConfig::default().with_strip_all_text(true);
    let result = update(BOOK, Vec::new(), config);
    for word in ["Many", "Dedication", "they", "them", "fulfilled"] {
        assert!(!result.contains(word), "{word} in {result}");
    }
    assert!(result.contains("\\v 3"));
}

// =============================================================================
// Replacement
// =============================================================================

#[test]
fn rows_replace_only_their_segments() {
    let rows = vec![
        row("LUK 1:2", "handed down"),
        row("LUK 1:0/2:s1", "Preface"),
    ];
    let result = update(BOOK, rows, UpdateUsfmConfig::default());
    assert!(result.contains("\\s1 Preface\r\n"), "{result}");
    assert!(result.contains("\\v 2 handed down"), "{result}");
    assert!(!result.contains("delivered"));
    assert!(result.contains("\\v 1 Many have undertaken"));
    assert!(result.contains("\\v 3 it seemed good"));
}

#[test]
fn id_text_and_remarks() {
    let config = UpdateUsfmConfig::default()
        .with_id_text("Draft")
        .with_remark("First pass")
        .with_remark("Second pass");
    let result = update(BOOK, Vec::new(), config);
    assert!(result.starts_with("\\id LUK - Draft\r\n\\rem First pass\r\n\\rem Second pass\r\n"), "{result}");
}
