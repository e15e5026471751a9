//! Book numbers and three-letter book codes.
//!
//! Books are numbered from 1 in canonical order: the 39 Old Testament books,
//! the 27 New Testament books, then deuterocanonical and non-scripture books.
//! Number 0 is never a valid book.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Every book code, indexed by `book number - 1`.
const ALL_BOOK_IDS: [&str; 123] = [
    "GEN", "EXO", "LEV", "NUM", "DEU", "JOS", "JDG", "RUT", "1SA", "2SA", "1KI", "2KI", "1CH",
    "2CH", "EZR", "NEH", "EST", "JOB", "PSA", "PRO", "ECC", "SNG", "ISA", "JER", "LAM", "EZK",
    "DAN", "HOS", "JOL", "AMO", "OBA", "JON", "MIC", "NAM", "HAB", "ZEP", "HAG", "ZEC", "MAL",
    "MAT", "MRK", "LUK", "JHN", "ACT", "ROM", "1CO", "2CO", "GAL", "EPH", "PHP", "COL", "1TH",
    "2TH", "1TI", "2TI", "TIT", "PHM", "HEB", "JAS", "1PE", "2PE", "1JN", "2JN", "3JN", "JUD",
    "REV", "TOB", "JDT", "ESG", "WIS", "SIR", "BAR", "LJE", "S3Y", "SUS", "BEL", "1MA", "2MA",
    "3MA", "4MA", "1ES", "2ES", "MAN", "PS2", "ODA", "PSS", "JSA", "JDB", "TBS", "SST", "DNT",
    "BLT", "XXA", "XXB", "XXC", "XXD", "XXE", "XXF", "XXG", "FRT", "BAK", "OTH", "3ES", "EZA",
    "5EZ", "6EZ", "INT", "CNC", "GLO", "TDX", "NDX", "DAG", "PS3", "2BA", "LBA", "JUB", "ENO",
    "1MQ", "2MQ", "3MQ", "REP", "4BA", "LAO",
];

/// Books that hold front matter, back matter or other non-scripture content.
const NON_CANONICAL_IDS: [&str; 15] = [
    "XXA", "XXB", "XXC", "XXD", "XXE", "XXF", "XXG", "FRT", "BAK", "OTH", "INT", "CNC", "GLO",
    "TDX", "NDX",
];

/// Codes kept only so that old book numbers stay stable.
const OBSOLETE_IDS: [&str; 6] = ["JSA", "JDB", "TBS", "SST", "DNT", "BLT"];

/// Number of the last book (1-based).
#[allow(clippy::cast_possible_truncation)]
pub const LAST_BOOK: u32 = ALL_BOOK_IDS.len() as u32;

/// Number of the last Old Testament book (Malachi).
const LAST_OT_BOOK: u32 = 39;

/// Number of the last New Testament book (Revelation).
const LAST_NT_BOOK: u32 = 66;

static BOOK_NUMBERS: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    ALL_BOOK_IDS
        .iter()
        .zip(1u32..)
        .map(|(id, num)| (*id, num))
        .collect()
});

/// Returns the book number for a three-letter code, or 0 if unknown.
///
/// Matching is case-insensitive.
#[must_use]
pub fn book_id_to_number(id: &str) -> u32 {
    let upper = id.trim().to_ascii_uppercase();
    BOOK_NUMBERS.get(upper.as_str()).copied().unwrap_or(0)
}

/// Returns the three-letter code for a book number, or `None` if out of range.
#[must_use]
pub fn book_number_to_id(number: u32) -> Option<&'static str> {
    if number == 0 {
        return None;
    }
    ALL_BOOK_IDS.get((number - 1) as usize).copied()
}

/// Returns every book code in canonical order.
#[must_use]
pub fn all_book_ids() -> &'static [&'static str] {
    &ALL_BOOK_IDS
}

/// Returns true if the book holds scripture text (not front/back matter).
#[must_use]
pub fn is_canonical(number: u32) -> bool {
    book_number_to_id(number).is_some_and(|id| !NON_CANONICAL_IDS.contains(&id))
}

/// Returns true for Old Testament books.
#[must_use]
pub fn is_ot(number: u32) -> bool {
    (1..=LAST_OT_BOOK).contains(&number)
}

/// Returns true for New Testament books.
#[must_use]
pub fn is_nt(number: u32) -> bool {
    (LAST_OT_BOOK + 1..=LAST_NT_BOOK).contains(&number)
}

/// Returns true for deuterocanonical books.
#[must_use]
pub fn is_deuterocanonical(number: u32) -> bool {
    number > LAST_NT_BOOK
        && book_number_to_id(number)
            .is_some_and(|id| !NON_CANONICAL_IDS.contains(&id) && !OBSOLETE_IDS.contains(&id))
}

/// Extracts a book code from the book part of a numbered project file name.
///
/// Project files are named like `41MAT` for books numbered below 100 and
/// `100XXA`-style names otherwise. A five-character part drops its two-digit
/// prefix, a six-character part drops its three-digit prefix; any other
/// length is not a book file.
#[must_use]
pub fn book_id_from_file_part(part: &str) -> Option<String> {
    let code = match part.chars().count() {
        5 => part.get(2..)?,
        6 => part.get(3..)?,
        _ => return None,
    };
    (book_id_to_number(code) > 0).then(|| code.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_numbers_round_trip() {
        assert_eq!(book_id_to_number("GEN"), 1);
        assert_eq!(book_id_to_number("mat"), 40);
        assert_eq!(book_id_to_number("REV"), 66);
        assert_eq!(book_number_to_id(40), Some("MAT"));
        assert_eq!(book_number_to_id(LAST_BOOK), Some("LAO"));
    }

    #[test]
    fn unknown_books() {
        assert_eq!(book_id_to_number("XYZ"), 0);
        assert_eq!(book_id_to_number(""), 0);
        assert_eq!(book_number_to_id(0), None);
        assert_eq!(book_number_to_id(LAST_BOOK + 1), None);
    }

    #[test]
    fn canon_groups() {
        assert!(is_ot(book_id_to_number("MAL")));
        assert!(!is_ot(book_id_to_number("MAT")));
        assert!(is_nt(book_id_to_number("MAT")));
        assert!(is_deuterocanonical(book_id_to_number("TOB")));
        assert!(!is_deuterocanonical(book_id_to_number("FRT")));
        assert!(!is_deuterocanonical(book_id_to_number("JSA")));
        assert!(!is_canonical(book_id_to_number("FRT")));
        assert!(is_canonical(book_id_to_number("3JN")));
    }

    #[test]
    fn file_parts() {
        assert_eq!(book_id_from_file_part("41MAT"), Some("MAT".to_string()));
        assert_eq!(book_id_from_file_part("100XXA"), Some("XXA".to_string()));
        assert_eq!(book_id_from_file_part("MAT"), None);
        assert_eq!(book_id_from_file_part("1000MAT"), None);
        assert_eq!(book_id_from_file_part("41ZZZ"), None);
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn number_to_id_to_number(num in 1u32..=LAST_BOOK) {
                let id = book_number_to_id(num).unwrap();
                prop_assert_eq!(book_id_to_number(id), num);
            }

            #[test]
            fn lookup_never_panics(id in "\\PC{0,6}") {
                let _ = book_id_to_number(&id);
                let _ = book_id_from_file_part(&id);
            }
        }
    }
}
