//! Integration tests for the tokenizer against the stylesheet

use std::sync::Arc;

use scripture_usfm::{
    TokenizerOptions, UsfmStylesheet, UsfmTokenType, UsfmTokenizer, detokenize,
};

const DOCUMENT: &str = "\\id JHN - Sample\r\n\\h John\r\n\\mt1 John\r\n\\c 1\r\n\\s The Word\r\n\\p\r\n\
\\v 1 In the beginning was the \\w Word|logos\\w*\\f + \\fr 1:1 \\ft Greek \\fq logos\\f*.\r\n\
\\q1 \\qt-s |who=\"John\"\\*Behold\\qt-e\\*\r\n\\tr \\tc1 a \\tcr2 b\r\n";

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn canonical_document_round_trips() {
    let tokens = UsfmTokenizer::default().tokenize(DOCUMENT);
    assert_eq!(detokenize(&tokens), DOCUMENT);
}

#[test]
fn detokenizing_is_stable() {
    let tokenizer = UsfmTokenizer::default();
    let messy = "\\id JHN\n\\c 1\n\\p\n\\v 1   spaced    out\n\\v 2 \\nd Lord\\nd*  said\n";
    let once = detokenize(&tokenizer.tokenize(messy));
    let twice = detokenize(&tokenizer.tokenize(&once));
    assert_eq!(once, twice);
}

#[test]
fn preserved_whitespace_survives() {
    let tokenizer = UsfmTokenizer::default()
        .with_options(TokenizerOptions::default().with_preserve_whitespace(true));
    let tokens = tokenizer.tokenize("\\p\n\\v 1 a   b\n");
    let text: String = tokens.iter().filter_map(|t| t.text.clone()).collect();
    assert!(text.contains("a   b"));
}

// =============================================================================
// Stylesheets
// =============================================================================

#[test]
fn custom_markers_change_token_types() {
    let default = UsfmTokenizer::default().tokenize("\\zq hello\\zq*");
    assert_eq!(default[0].token_type, UsfmTokenType::Unknown);

    let custom = UsfmStylesheet::default_stylesheet()
        .with_custom("\\Marker zq\n\\StyleType Character\n\\TextType VerseText\n")
        .expect("valid custom stylesheet");
    let tokens = UsfmTokenizer::new(Arc::new(custom)).tokenize("\\zq hello\\zq*");
    assert_eq!(tokens[0].token_type, UsfmTokenType::Character);
    assert_eq!(tokens[0].end_marker.as_deref(), Some("zq*"));
    assert_eq!(tokens[2].token_type, UsfmTokenType::End);
}

#[test]
fn tokens_know_their_positions() {
    let tokens = UsfmTokenizer::default().tokenize(DOCUMENT);
    let verse = tokens
        .iter()
        .find(|t| t.token_type == UsfmTokenType::Verse)
        .expect("verse token");
    assert_eq!((verse.line, verse.column), (7, 1));
    let word = tokens
        .iter()
        .find(|t| t.marker.as_deref() == Some("w"))
        .expect("word token");
    assert_eq!(word.attribute("lemma"), Some("logos"));
}
