//! Documented end-to-end scenarios

use scripture::quotes::{
    QuotationDenormalizationSettings, QuoteConventionSet, change_quotation_marks,
};
use scripture::usfm::{
    UpdateUsfmConfig, UpdateUsfmRow, UsfmParserHandler, UsfmParserState,
    UsfmVersificationErrorType, check_usfm_versification, parse_usfm, update_usfm,
};
use scripture::usfm::{CellAlignment, UsfmParserElementType};
use scripture::versification::{ScriptureRef, VerseRef, Versification, VersificationType};

fn row(reference: &str, text: &str) -> UpdateUsfmRow {
    let scripture_ref = ScriptureRef::parse(reference, Versification::english()).expect("valid ref");
    UpdateUsfmRow::new(vec![scripture_ref], text)
}

// =============================================================================
// Updating
// =============================================================================

#[test]
fn replaces_a_single_verse() {
    let result = update_usfm(
        "\\id MAT\n\\c 1\n\\v 1 hello\n",
        vec![row("MAT 1:1", "goodbye")],
        UpdateUsfmConfig::default(),
        None,
        None,
    );
    assert!(result.contains("\\v 1 goodbye"), "{result}");
    assert!(result.contains("\\id MAT"), "{result}");
    assert!(!result.contains("hello"));
}

#[test]
fn a_row_for_part_of_a_range_fills_the_range() {
    let result = update_usfm(
        "\\id MAT\n\\c 1\n\\v 1-2 merged\n",
        vec![row("MAT 1:1", "a b")],
        UpdateUsfmConfig::default().with_prefer_existing_text(false),
        None,
        None,
    );
    assert!(result.contains("\\v 1-2 a b"), "{result}");
    assert!(!result.contains("merged"));
}

// =============================================================================
// Versification
// =============================================================================

#[test]
fn changing_versification_follows_the_mapping_table() {
    let vulgate = Versification::get_builtin(VersificationType::Vulgate).expect("built-in");
    let original = Versification::original();

    let luke = VerseRef::from_string("LUK 3:4", vulgate.clone()).expect("valid");
    let mapped = luke.change_versification(&original);
    let expected = original.from_original(vulgate.to_original(luke.bbbcccvvv()));
    assert_eq!(mapped.bbbcccvvv(), expected);
    assert_eq!(mapped.change_versification(&vulgate), luke);

    let joel = VerseRef::from_string("JOL 3:1", vulgate.clone()).expect("valid");
    let mapped = joel.change_versification(&original);
    assert_ne!(mapped.bbbcccvvv(), joel.bbbcccvvv());
    assert_eq!(mapped.to_string(), "JOL 4:1");
    assert_eq!(mapped.change_versification(&vulgate), joel);

    let psalm = VerseRef::from_string("PSA 50:3", vulgate.clone()).expect("valid");
    let mapped = psalm.change_versification(&original);
    assert_eq!(mapped.to_string(), "PSA 51:3");
    assert_eq!(mapped.change_versification(&vulgate), psalm);
}

// =============================================================================
// Quotation Marks
// =============================================================================

#[test]
fn typewriter_quotes_become_curly() {
    let conventions = QuoteConventionSet::standard();
    let settings = QuotationDenormalizationSettings::new(
        conventions.get_by_name("typewriter_english").expect("built-in").clone(),
        conventions.get_by_name("standard_english").expect("built-in").clone(),
    );
    let result = change_quotation_marks(
        "\\c 1\n\\v 1 He said, \"Has God really said, 'You shall not eat'?\"\n",
        settings,
    );
    assert!(
        result.contains(
            "He said, \u{201C}Has God really said, \u{2018}You shall not eat\u{2019}?\u{201D}"
        ),
        "{result}"
    );
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn cell_ranges_become_one_spanning_cell() {
    #[derive(Default)]
    struct Cells(Vec<(String, u32, Option<UsfmParserElementType>, Option<String>)>);
    impl UsfmParserHandler for Cells {
        fn start_cell(
            &mut self,
            state: &UsfmParserState,
            marker: &str,
            _align: CellAlignment,
            col_span: u32,
        ) {
            let top = state.peek();
            self.0.push((
                marker.to_string(),
                col_span,
                top.map(|e| e.element_type),
                top.map(|e| e.marker().to_string()),
            ));
        }
    }

    let mut cells = Cells::default();
    parse_usfm("\\id MAT\n\\c 1\n\\tr \\tc1-2 spans two\n", &mut cells, None, None);
    assert_eq!(
        cells.0,
        vec![(
            "tc1".to_string(),
            2,
            Some(UsfmParserElementType::Cell),
            Some("tc1".to_string())
        )]
    );
}

// =============================================================================
// Consistency Checking
// =============================================================================

#[test]
fn missing_last_verse_is_one_error() {
    let mut usfm = String::from("\\id 3JN\n\\c 1\n");
    for verse in 1..=14 {
        usfm.push_str(&format!("\\v {verse}\n"));
    }
    let errors = check_usfm_versification(&usfm, Versification::english());
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].error_type, UsfmVersificationErrorType::MissingVerse);
    assert_eq!(errors[0].expected.as_deref(), Some("1:15"));
    assert_eq!(errors[0].error_type.to_string(), "MISSING_VERSE");
}
