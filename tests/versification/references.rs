//! Integration tests for verse and scripture references

use std::cmp::Ordering;

use scripture_foundation::ErrorKind;
use scripture_versification::{
    ScriptureElement, ScriptureRef, ValidStatus, VerseRef, Versification, VersificationType,
    are_overlapping_verse_ranges, bbbcccvvv, merge_verse_ranges,
};

fn vref(text: &str) -> VerseRef {
    VerseRef::from_string(text, Versification::english()).expect("valid reference")
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn parses_simple_references() {
    let r = vref("MAT 5:3");
    assert_eq!(r.book(), "MAT");
    assert_eq!(r.book_num(), 40);
    assert_eq!(r.chapter_num(), 5);
    assert_eq!(r.verse_num(), 3);
    assert_eq!(r.bbbcccvvv(), bbbcccvvv(40, 5, 3));
    assert_eq!(r.to_string(), "MAT 5:3");
    assert!(r.is_verse());
}

#[test]
fn versification_suffix_overrides_the_default() {
    let r = vref("JOL 3:1/3");
    assert_eq!(r.versification().versification_type(), VersificationType::Vulgate);
}

#[test]
fn rejects_malformed_references() {
    let err = VerseRef::from_string("MAT", Versification::english()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidReference(_)));
    let err = VerseRef::from_string("XYZ 1:1", Versification::english()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownBook(_)));
    assert!(VerseRef::from_string("MAT 1:1/99", Versification::english()).is_err());
}

// =============================================================================
// Selectors
// =============================================================================

#[test]
fn ranges_and_lists_expand() {
    let r = vref("MAT 1:1-3,5");
    assert!(r.has_multiple());
    let verses: Vec<u32> = r.all_verses().iter().map(VerseRef::verse_num).collect();
    assert_eq!(verses, vec![1, 2, 3, 5]);
}

#[test]
fn segments_survive_simplify_only_when_single() {
    let r = vref("MAT 1:2a");
    assert_eq!(r.segment(), "a");
    assert_eq!(r.simplify().verse(), "2");
}

#[test]
fn validity() {
    assert_eq!(vref("3JN 1:15").valid_status(), ValidStatus::Valid);
    assert_eq!(vref("3JN 1:16").valid_status(), ValidStatus::OutOfRange);
    assert_eq!(vref("MAT 1:3-2").valid_status(), ValidStatus::VerseOutOfOrder);
    assert_eq!(vref("MAT 1:2,2").valid_status(), ValidStatus::VerseRepeated);
}

#[test]
fn verse_range_helpers() {
    assert!(are_overlapping_verse_ranges("1-3", "3-5"));
    assert!(!are_overlapping_verse_ranges("1-2", "3"));
    assert_eq!(merge_verse_ranges("1-2", "3"), "1-3");
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn ordering_follows_canon_order() {
    let refs = [vref("GEN 1:1"), vref("GEN 1:2"), vref("GEN 2:1"), vref("MAT 1:1")];
    for pair in refs.windows(2) {
        assert_eq!(pair[0].partial_cmp(&pair[1]), Some(Ordering::Less), "{pair:?}");
    }
}

// =============================================================================
// Scripture References
// =============================================================================

#[test]
fn scripture_refs_carry_paths() {
    let r = ScriptureRef::parse("MAT 1:1/1:f", Versification::english()).expect("valid");
    assert_eq!(r.book(), "MAT");
    assert_eq!(r.chapter_num(), 1);
    assert!(!r.is_verse());
    assert_eq!(r.path(), &[ScriptureElement::new(1, "f")]);

    let verse = ScriptureRef::parse("MAT 1:1", Versification::english()).expect("valid");
    assert!(verse.is_verse());
    assert_eq!(verse.compare_to(&r, true, true), Ordering::Less);
}

#[test]
fn relaxed_paths_drop_positions() {
    let r = ScriptureRef::parse("MAT 1:0/2:s", Versification::english()).expect("valid");
    let relaxed = r.to_relaxed();
    assert_eq!(relaxed.path()[0].position(), 0);
    assert_eq!(relaxed.path()[0].name(), "s");
}
