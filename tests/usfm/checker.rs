//! Integration tests for the verse-consistency checker

use std::sync::Arc;

use scripture_usfm::{UsfmVersificationErrorType, check_usfm_versification};
use scripture_versification::{Versification, VersificationType};

fn jude(last_verse: u32) -> String {
    let mut usfm = String::from("\\id JUD\n\\c 1\n\\p\n");
    for verse in 1..=last_verse {
        usfm.push_str(&format!("\\v {verse} text\n"));
    }
    usfm
}

#[test]
fn complete_book_is_clean() {
    assert!(check_usfm_versification(&jude(25), Versification::english()).is_empty());
}

#[test]
fn extra_verse_at_the_end() {
    let errors = check_usfm_versification(&jude(26), Versification::english());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_type, UsfmVersificationErrorType::ExtraVerse);
    assert_eq!(errors[0].actual.as_deref(), Some("1:26"));
    assert_eq!(errors[0].book(), "JUD");
}

#[test]
fn custom_versification_changes_the_verdict() {
    let shorter = Versification::english()
        .with_custom("JUD 1:24\n", "Short Jude")
        .expect("valid custom lines");
    let errors = check_usfm_versification(&jude(24), Arc::new(shorter));
    assert!(errors.is_empty());
    let errors = check_usfm_versification(&jude(24), Versification::english());
    assert_eq!(errors[0].error_type, UsfmVersificationErrorType::MissingVerse);
}

#[test]
fn original_numbering_for_malachi() {
    let mut usfm = String::from("\\id MAL\n");
    for (chapter, verses) in [(1u32, 14u32), (2, 17), (3, 24)] {
        usfm.push_str(&format!("\\c {chapter}\n\\p\n"));
        for verse in 1..=verses {
            usfm.push_str(&format!("\\v {verse} text\n"));
        }
    }
    let original = Versification::get_builtin(VersificationType::Original).expect("built-in");
    assert!(check_usfm_versification(&usfm, original).is_empty());
    let errors = check_usfm_versification(&usfm, Versification::english());
    assert!(errors
        .iter()
        .any(|e| e.error_type == UsfmVersificationErrorType::MissingChapter));
}
