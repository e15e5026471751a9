//! Integration tests for versification tables and mappings

use scripture_foundation::{ErrorKind, book_id_to_number};
use scripture_versification::{VerseRef, Versification, VersificationType, bbbcccvvv};

// =============================================================================
// Built-ins
// =============================================================================

#[test]
fn every_builtin_loads() {
    for ty in [
        VersificationType::Original,
        VersificationType::Septuagint,
        VersificationType::Vulgate,
        VersificationType::English,
        VersificationType::RussianProtestant,
        VersificationType::RussianOrthodox,
    ] {
        let versification = Versification::get_builtin(ty).expect("built-in");
        assert_eq!(versification.versification_type(), ty);
        assert!(versification.last_book() > 0, "{ty}");
    }
    assert!(Versification::get_builtin(VersificationType::Unknown).is_err());
}

#[test]
fn builtins_by_name_and_stem() {
    let by_name = Versification::get_builtin_by_name("English").expect("built-in");
    let by_stem = Versification::get_builtin_by_name("eng").expect("built-in");
    assert_eq!(by_name, by_stem);
    let err = Versification::get_builtin_by_name("klingon").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownVersification(_)));
}

#[test]
fn chapter_and_verse_counts() {
    let eng = Versification::english();
    let mal = book_id_to_number("MAL");
    assert_eq!(eng.last_chapter(mal), 4);
    assert_eq!(eng.last_verse(mal, 4), 6);
    assert_eq!(eng.last_verse(book_id_to_number("3JN"), 1), 15);
    assert_eq!(Versification::original().last_chapter(mal), 3);
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn header_names_the_versification() {
    let custom = Versification::load("# Versification \"Tiny\"\nGEN 1:31 2:25\n", "fallback")
        .expect("valid vrs");
    assert_eq!(custom.name(), "Tiny");
    assert_eq!(custom.versification_type(), VersificationType::Unknown);
    assert_eq!(custom.last_verse(1, 2), 25);

    let unnamed = Versification::load("GEN 1:31\n", "fallback").expect("valid vrs");
    assert_eq!(unnamed.name(), "fallback");
}

#[test]
fn bad_lines_report_their_number() {
    let err = Versification::load("GEN 1:31\nGEN 1:x\n", "bad").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidVersification { line: 2, .. }));
    let err = Versification::load("QQQ 1:5\n", "bad").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidVersification { line: 1, .. }));
}

#[test]
fn missing_files_are_io_errors() {
    let err = Versification::from_file("/nonexistent/custom.vrs").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Io { .. }));
}

#[test]
fn custom_layers_exclusions_and_segments() {
    let custom = Versification::english()
        .with_custom("-PHM 1:3\n*PHM 1:4,a,b\n", "Custom")
        .expect("valid custom lines");
    let phm = book_id_to_number("PHM");
    assert!(custom.is_excluded(bbbcccvvv(phm, 1, 3)));
    assert_eq!(
        custom.verse_segments(bbbcccvvv(phm, 1, 4)),
        Some(&["a".to_string(), "b".to_string()][..])
    );
    assert_eq!(custom.versification_type(), VersificationType::English);
    assert_eq!(custom.first_included_verse(phm, 1), Some(1));
}

// =============================================================================
// Mapping
// =============================================================================

#[test]
fn english_maps_through_original() {
    let eng = Versification::english();
    let org = Versification::original();
    let english = VerseRef::from_string("MAL 4:1", eng.clone()).expect("valid");
    let original = english.change_versification(&org);
    assert_eq!(original.to_string(), "MAL 3:19");
    assert_eq!(original.change_versification(&eng), english);
}

#[test]
fn english_psalms_map_to_russian_orthodox() {
    let eng = Versification::english();
    let rso = Versification::get_builtin(VersificationType::RussianOrthodox).expect("built-in");
    let english = VerseRef::from_string("PSA 51:1", eng.clone()).expect("valid");
    let orthodox = english.change_versification(&rso);
    assert_eq!(orthodox.to_string(), "PSA 50:3");
    assert_eq!(orthodox.change_versification(&eng), english);

    let title = VerseRef::from_string("PSA 51:0", eng.clone()).expect("valid");
    assert_eq!(title.change_versification(&rso).to_string(), "PSA 50:1");
}

#[test]
fn septuagint_psalms_merge_and_split() {
    let org = Versification::original();
    let lxx = Versification::get_builtin(VersificationType::Septuagint).expect("built-in");
    let psa = book_id_to_number("PSA");
    assert_eq!(lxx.last_verse(psa, 9), 39);
    assert_eq!(lxx.last_chapter(psa), 151);

    let hebrew = VerseRef::from_string("PSA 10:1", org.clone()).expect("valid");
    let greek = hebrew.change_versification(&lxx);
    assert_eq!(greek.to_string(), "PSA 9:22");
    assert_eq!(greek.change_versification(&org), hebrew);

    let shepherd = VerseRef::from_string("PSA 23:1", Versification::english()).expect("valid");
    assert_eq!(shepherd.change_versification(&lxx).to_string(), "PSA 22:1");

    let split = VerseRef::from_string("PSA 115:1", lxx.clone()).expect("valid");
    assert_eq!(split.change_versification(&org).to_string(), "PSA 116:10");
}

#[test]
fn orthodox_and_protestant_tables_differ() {
    let rso = Versification::get_builtin(VersificationType::RussianOrthodox).expect("built-in");
    let rsc = Versification::get_builtin(VersificationType::RussianProtestant).expect("built-in");
    let dan = book_id_to_number("DAN");
    assert_eq!(rso.last_chapter(dan), 14);
    assert_eq!(rso.last_verse(dan, 3), 100);
    assert_eq!(rsc.last_chapter(dan), 12);
    assert_eq!(rsc.last_verse(dan, 3), 30);
    assert_eq!(rso.last_chapter(book_id_to_number("TOB")), 14);
    assert_ne!(rso, rsc);

    let susanna = VerseRef::from_string("DAN 13:1", rso.clone()).expect("valid");
    assert_eq!(
        susanna.change_versification(&Versification::original()).to_string(),
        "SUS 1:1"
    );
}

#[test]
fn unmapped_verses_keep_their_numbers() {
    let org = Versification::original();
    let r = VerseRef::from_string("MAT 5:3", Versification::english()).expect("valid");
    assert_eq!(r.change_versification(&org).bbbcccvvv(), r.bbbcccvvv());
}

#[test]
fn vrs_text_round_trips() {
    let eng = Versification::english();
    let reloaded = Versification::load(&eng.to_vrs(), "copy").expect("valid vrs");
    assert_eq!(reloaded.name(), eng.name());
    let mat = book_id_to_number("MAT");
    assert_eq!(reloaded.last_verse(mat, 28), eng.last_verse(mat, 28));
    assert_eq!(
        reloaded.to_original(bbbcccvvv(book_id_to_number("MAL"), 4, 1)),
        eng.to_original(bbbcccvvv(book_id_to_number("MAL"), 4, 1))
    );
}
