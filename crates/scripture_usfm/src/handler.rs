//! Handler trait for parser events.
//!
//! A handler receives every [`UsfmEvent`] together with a read-only view of
//! the parser state. Implement the methods for the events of interest; the
//! defaults do nothing.
//!
//! # Example
//!
//! ```
//! use scripture_usfm::{UsfmParserHandler, UsfmParserState, parse_usfm};
//!
//! struct VerseCounter(usize);
//!
//! impl UsfmParserHandler for VerseCounter {
//!     fn verse(&mut self, _state: &UsfmParserState, _number: &str, _marker: &str,
//!              _alt: Option<&str>, _pub: Option<&str>) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut counter = VerseCounter(0);
//! parse_usfm("\\id MAT\n\\c 1\n\\p\n\\v 1 a\n\\v 2 b\n", &mut counter, None, None);
//! assert_eq!(counter.0, 2);
//! ```

use crate::event::{CellAlignment, UsfmEvent};
use crate::state::UsfmParserState;
use crate::token::UsfmAttribute;

// =============================================================================
// Handler Trait
// =============================================================================

/// Receives parser events.
///
/// [`handle_event`](Self::handle_event) is the single entry point the
/// parser calls. Its default implementation dispatches to the per-event
/// methods, so a handler either overrides the per-event methods or matches
/// on the event itself.
#[allow(unused_variables)]
pub trait UsfmParserHandler {
    /// Called for every event. Dispatches to the per-event methods.
    fn handle_event(&mut self, state: &UsfmParserState, event: &UsfmEvent<'_>) {
        dispatch(self, state, event);
    }

    /// Before the first token.
    fn start_usfm(&mut self, state: &UsfmParserState) {}

    /// After the last token.
    fn end_usfm(&mut self, state: &UsfmParserState) {}

    /// Any token that carries a marker.
    fn got_marker(&mut self, state: &UsfmParserState, marker: &str) {}

    /// Book marker.
    fn start_book(&mut self, state: &UsfmParserState, marker: &str, code: &str) {}

    /// End of the book paragraph.
    fn end_book(&mut self, state: &UsfmParserState, marker: &str) {}

    /// Chapter marker.
    fn chapter(
        &mut self,
        state: &UsfmParserState,
        number: &str,
        marker: &str,
        alt_number: Option<&str>,
        pub_number: Option<&str>,
    ) {
    }

    /// Verse marker.
    fn verse(
        &mut self,
        state: &UsfmParserState,
        number: &str,
        marker: &str,
        alt_number: Option<&str>,
        pub_number: Option<&str>,
    ) {
    }

    /// Paragraph start.
    fn start_para(
        &mut self,
        state: &UsfmParserState,
        marker: &str,
        unknown: bool,
        attributes: &[UsfmAttribute],
    ) {
    }

    /// Paragraph end.
    fn end_para(&mut self, state: &UsfmParserState, marker: &str) {}

    /// Character style start.
    fn start_char(
        &mut self,
        state: &UsfmParserState,
        marker: &str,
        unknown: bool,
        attributes: &[UsfmAttribute],
    ) {
    }

    /// Character style end.
    fn end_char(
        &mut self,
        state: &UsfmParserState,
        marker: &str,
        attributes: &[UsfmAttribute],
        closed: bool,
    ) {
    }

    /// Note start.
    fn start_note(
        &mut self,
        state: &UsfmParserState,
        marker: &str,
        caller: &str,
        category: Option<&str>,
    ) {
    }

    /// Note end.
    fn end_note(&mut self, state: &UsfmParserState, marker: &str, closed: bool) {}

    /// Table start.
    fn start_table(&mut self, state: &UsfmParserState) {}

    /// Table end.
    fn end_table(&mut self, state: &UsfmParserState) {}

    /// Row start.
    fn start_row(&mut self, state: &UsfmParserState, marker: &str) {}

    /// Row end.
    fn end_row(&mut self, state: &UsfmParserState, marker: &str) {}

    /// Cell start.
    fn start_cell(
        &mut self,
        state: &UsfmParserState,
        marker: &str,
        align: CellAlignment,
        col_span: u32,
    ) {
    }

    /// Cell end.
    fn end_cell(&mut self, state: &UsfmParserState, marker: &str) {}

    /// Sidebar start.
    fn start_sidebar(&mut self, state: &UsfmParserState, marker: &str, category: Option<&str>) {}

    /// Sidebar end.
    fn end_sidebar(&mut self, state: &UsfmParserState, marker: &str, closed: bool) {}

    /// Text.
    fn text(&mut self, state: &UsfmParserState, text: &str) {}

    /// Optional line break.
    fn opt_break(&mut self, state: &UsfmParserState) {}

    /// Reference.
    fn reference(&mut self, state: &UsfmParserState, marker: &str, display: &str, target: &str) {}

    /// Milestone.
    fn milestone(
        &mut self,
        state: &UsfmParserState,
        marker: &str,
        start: bool,
        attributes: &[UsfmAttribute],
    ) {
    }

    /// End marker with nothing to close.
    fn unmatched(&mut self, state: &UsfmParserState, marker: &str) {}
}

/// Calls the per-event method of `handler` for `event`.
pub fn dispatch<H: UsfmParserHandler + ?Sized>(
    handler: &mut H,
    state: &UsfmParserState,
    event: &UsfmEvent<'_>,
) {
    match *event {
        UsfmEvent::StartUsfm => handler.start_usfm(state),
        UsfmEvent::EndUsfm => handler.end_usfm(state),
        UsfmEvent::GotMarker { marker } => handler.got_marker(state, marker),
        UsfmEvent::StartBook { marker, code } => handler.start_book(state, marker, code),
        UsfmEvent::EndBook { marker } => handler.end_book(state, marker),
        UsfmEvent::Chapter {
            number,
            marker,
            alt_number,
            pub_number,
        } => handler.chapter(state, number, marker, alt_number, pub_number),
        UsfmEvent::Verse {
            number,
            marker,
            alt_number,
            pub_number,
        } => handler.verse(state, number, marker, alt_number, pub_number),
        UsfmEvent::StartPara {
            marker,
            unknown,
            attributes,
        } => handler.start_para(state, marker, unknown, attributes),
        UsfmEvent::EndPara { marker } => handler.end_para(state, marker),
        UsfmEvent::StartChar {
            marker,
            unknown,
            attributes,
        } => handler.start_char(state, marker, unknown, attributes),
        UsfmEvent::EndChar {
            marker,
            attributes,
            closed,
        } => handler.end_char(state, marker, attributes, closed),
        UsfmEvent::StartNote {
            marker,
            caller,
            category,
        } => handler.start_note(state, marker, caller, category),
        UsfmEvent::EndNote { marker, closed } => handler.end_note(state, marker, closed),
        UsfmEvent::StartTable => handler.start_table(state),
        UsfmEvent::EndTable => handler.end_table(state),
        UsfmEvent::StartRow { marker } => handler.start_row(state, marker),
        UsfmEvent::EndRow { marker } => handler.end_row(state, marker),
        UsfmEvent::StartCell {
            marker,
            align,
            col_span,
        } => handler.start_cell(state, marker, align, col_span),
        UsfmEvent::EndCell { marker } => handler.end_cell(state, marker),
        UsfmEvent::StartSidebar { marker, category } => {
            handler.start_sidebar(state, marker, category);
        }
        UsfmEvent::EndSidebar { marker, closed } => handler.end_sidebar(state, marker, closed),
        UsfmEvent::Text { text } => handler.text(state, text),
        UsfmEvent::OptBreak => handler.opt_break(state),
        UsfmEvent::Ref {
            marker,
            display,
            target,
        } => handler.reference(state, marker, display, target),
        UsfmEvent::Milestone {
            marker,
            start,
            attributes,
        } => handler.milestone(state, marker, start, attributes),
        UsfmEvent::Unmatched { marker } => handler.unmatched(state, marker),
    }
}

/// Records the names of events, for tests and debugging.
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    /// One line per event, e.g. `start_para p` or `text "In the"`.
    pub events: Vec<String>,
}

impl UsfmParserHandler for EventRecorder {
    fn handle_event(&mut self, _state: &UsfmParserState, event: &UsfmEvent<'_>) {
        let detail = match *event {
            UsfmEvent::GotMarker { .. } => return,
            UsfmEvent::StartBook { code, .. } => code.to_string(),
            UsfmEvent::Chapter { number, .. } | UsfmEvent::Verse { number, .. } => {
                number.to_string()
            }
            UsfmEvent::StartPara { marker, .. }
            | UsfmEvent::EndPara { marker }
            | UsfmEvent::StartChar { marker, .. }
            | UsfmEvent::StartNote { marker, .. }
            | UsfmEvent::StartRow { marker }
            | UsfmEvent::EndRow { marker }
            | UsfmEvent::EndCell { marker }
            | UsfmEvent::StartSidebar { marker, .. }
            | UsfmEvent::Milestone { marker, .. }
            | UsfmEvent::Unmatched { marker } => marker.to_string(),
            UsfmEvent::EndChar { marker, closed, .. }
            | UsfmEvent::EndNote { marker, closed }
            | UsfmEvent::EndSidebar { marker, closed } => {
                if closed {
                    marker.to_string()
                } else {
                    format!("{marker} (implicit)")
                }
            }
            UsfmEvent::StartCell {
                marker, col_span, ..
            } => format!("{marker} {col_span}"),
            UsfmEvent::Text { text } => format!("{text:?}"),
            UsfmEvent::Ref {
                display, target, ..
            } => format!("{display}|{target}"),
            _ => String::new(),
        };
        let line = if detail.is_empty() {
            event.name().to_string()
        } else {
            format!("{} {detail}", event.name())
        };
        self.events.push(line);
    }
}
