//! Integration tests for the parser and its handlers

use scripture_usfm::{
    EventRecorder, UsfmEvent, UsfmParserHandler, UsfmParserState, parse_usfm,
};
use scripture_versification::{Versification, VersificationType};

/// Counts opened and closed elements and checks the stack at the end.
#[derive(Default)]
struct Balance {
    depth: i64,
    lowest: i64,
    stack_empty_at_end: bool,
    verses: Vec<String>,
}

impl UsfmParserHandler for Balance {
    fn handle_event(&mut self, state: &UsfmParserState, event: &UsfmEvent<'_>) {
        match event {
            UsfmEvent::StartUsfm | UsfmEvent::EndUsfm => {}
            _ if event.name().starts_with("start_") => self.depth += 1,
            _ if event.name().starts_with("end_") => self.depth -= 1,
            _ => {}
        }
        self.lowest = self.lowest.min(self.depth);
        if let UsfmEvent::Verse { .. } = event {
            self.verses.push(state.verse_ref().to_string());
        }
        if let UsfmEvent::EndUsfm = event {
            self.stack_empty_at_end = state.stack().is_empty();
        }
    }
}

fn balance(usfm: &str) -> Balance {
    let mut handler = Balance::default();
    parse_usfm(usfm, &mut handler, None, None);
    handler
}

// =============================================================================
// Element Balance
// =============================================================================

#[test]
fn every_start_has_an_end() {
    for usfm in [
        "\\id MAT\n\\c 1\n\\p\n\\v 1 a \\nd b \\+w c\\+w*\\nd* d\n",
        "\\p a \\nd b \\v 1 c \\f + \\ft d \\v 2 e\n\\p f",
        "\\tr \\th1 A \\th2 B\n\\tr \\tc1-2 wide\n\\p after",
        "\\esb \\ms Title\n\\p text\n\\esbe\n\\p after",
        "\\p a\\nd* b\\f*\\esbe\n",
        "\\v 1 \\f + \\fr 1:1 \\ft unclosed",
    ] {
        let result = balance(usfm);
        assert_eq!(result.depth, 0, "{usfm}");
        assert!(result.lowest >= 0, "{usfm}");
        assert!(result.stack_empty_at_end, "{usfm}");
    }
}

// =============================================================================
// References
// =============================================================================

#[test]
fn verse_refs_follow_the_document() {
    let result = balance("\\id ROM\n\\c 16\n\\p\n\\v 1 a\n\\v 2-3 b\n\\v 4a c\n");
    assert_eq!(result.verses, vec!["ROM 16:1", "ROM 16:2-3", "ROM 16:4a"]);
}

#[test]
fn verse_refs_use_the_given_versification() {
    struct Versifications(Vec<VersificationType>);
    impl UsfmParserHandler for Versifications {
        fn text(&mut self, state: &UsfmParserState, _text: &str) {
            self.0.push(state.verse_ref().versification().versification_type());
        }
    }

    let vulgate = Versification::get_builtin(VersificationType::Vulgate).expect("built-in");
    let mut handler = Versifications(Vec::new());
    parse_usfm("\\id JOL\n\\c 3\n\\p\n\\v 1 a\n", &mut handler, None, Some(vulgate));
    assert_eq!(handler.0, vec![VersificationType::Vulgate]);
}

#[test]
fn unknown_markers_do_not_stop_parsing() {
    let mut recorder = EventRecorder::default();
    parse_usfm("\\id MAT\n\\c 1\n\\zz odd\n\\p\n\\v 1 a\\yy*\n", &mut recorder, None, None);
    assert!(recorder.events.contains(&"verse 1".to_string()));
    assert!(recorder.events.contains(&"unmatched yy*".to_string()));
    assert_eq!(recorder.events.last().map(String::as_str), Some("end_usfm"));
}
