//! Integration tests for book numbers and codes

use scripture_foundation::{
    LAST_BOOK, all_book_ids, book_id_from_file_part, book_id_to_number, book_number_to_id,
    is_canonical, is_deuterocanonical, is_nt, is_ot,
};

// =============================================================================
// Numbering
// =============================================================================

#[test]
fn every_code_round_trips() {
    for (index, id) in all_book_ids().iter().enumerate() {
        let number = book_id_to_number(id);
        assert_eq!(number as usize, index + 1, "{id}");
        assert_eq!(book_number_to_id(number), Some(*id));
    }
    assert_eq!(all_book_ids().len() as u32, LAST_BOOK);
}

#[test]
fn unknown_codes_and_numbers() {
    assert_eq!(book_id_to_number("XYZ"), 0);
    assert_eq!(book_id_to_number(""), 0);
    assert_eq!(book_number_to_id(0), None);
    assert_eq!(book_number_to_id(LAST_BOOK + 1), None);
}

#[test]
fn codes_are_case_insensitive() {
    assert_eq!(book_id_to_number("1jn"), book_id_to_number("1JN"));
    assert_eq!(book_id_to_number(" Mat "), 40);
}

// =============================================================================
// Canon Groups
// =============================================================================

#[test]
fn testaments() {
    assert!(is_ot(book_id_to_number("GEN")));
    assert!(is_ot(book_id_to_number("MAL")));
    assert!(!is_ot(book_id_to_number("MAT")));
    assert!(is_nt(book_id_to_number("MAT")));
    assert!(is_nt(book_id_to_number("REV")));
    assert!(!is_nt(book_id_to_number("TOB")));
}

#[test]
fn deuterocanon_excludes_front_matter_and_obsolete_codes() {
    assert!(is_deuterocanonical(book_id_to_number("TOB")));
    assert!(is_deuterocanonical(book_id_to_number("SIR")));
    assert!(!is_deuterocanonical(book_id_to_number("REV")));
    assert!(!is_deuterocanonical(book_id_to_number("FRT")));
    assert!(!is_deuterocanonical(book_id_to_number("JSA")));
    assert!(is_canonical(book_id_to_number("TOB")));
    assert!(!is_canonical(book_id_to_number("GLO")));
    assert!(!is_canonical(0));
}

// =============================================================================
// File Names
// =============================================================================

#[test]
fn book_codes_from_file_parts() {
    assert_eq!(book_id_from_file_part("41MAT"), Some("MAT".to_string()));
    assert_eq!(book_id_from_file_part("100XXA"), Some("XXA".to_string()));
    assert_eq!(book_id_from_file_part("MAT"), None);
    assert_eq!(book_id_from_file_part("41QQQ"), None);
    assert_eq!(book_id_from_file_part("1234567"), None);
}
