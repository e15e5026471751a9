//! Event parser for USFM.
//!
//! The parser walks a token stream, maintains the stack of open elements
//! and reports each structural step to a [`UsfmParserHandler`]. Malformed
//! input never aborts a parse: stray end markers become
//! [`UsfmEvent::Unmatched`] and unclosed elements are closed implicitly.

use std::sync::Arc;

use scripture_foundation::book_id_to_number;
use scripture_versification::Versification;

use crate::element::{UsfmParserElement, UsfmParserElementType};
use crate::event::{CellAlignment, UsfmEvent};
use crate::handler::UsfmParserHandler;
use crate::state::UsfmParserState;
use crate::stylesheet::{UsfmStylesheet, is_cell_range};
use crate::token::{UsfmToken, UsfmTokenType};
use crate::tokenizer::UsfmTokenizer;

/// Parser over one document.
pub struct UsfmParser<'h> {
    state: UsfmParserState,
    handler: Option<&'h mut dyn UsfmParserHandler>,
    started: bool,
    skip: usize,
}

impl<'h> UsfmParser<'h> {
    /// Tokenizes `usfm` and creates a parser for it.
    #[must_use]
    pub fn new(
        usfm: &str,
        stylesheet: Arc<UsfmStylesheet>,
        versification: Arc<Versification>,
    ) -> Self {
        let tokens = UsfmTokenizer::new(Arc::clone(&stylesheet)).tokenize(usfm);
        Self::from_tokens(tokens, stylesheet, versification)
    }

    /// Creates a parser over already tokenized input.
    #[must_use]
    pub fn from_tokens(
        tokens: Vec<UsfmToken>,
        stylesheet: Arc<UsfmStylesheet>,
        versification: Arc<Versification>,
    ) -> Self {
        Self {
            state: UsfmParserState::new(stylesheet, versification, tokens),
            handler: None,
            started: false,
            skip: 0,
        }
    }

    /// Sets the handler that receives events.
    #[must_use]
    pub fn with_handler(mut self, handler: &'h mut dyn UsfmParserHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// The parser state.
    #[must_use]
    pub fn state(&self) -> &UsfmParserState {
        &self.state
    }

    /// Processes every remaining token.
    pub fn process_tokens(&mut self) {
        while self.process_token() {}
    }

    /// Processes one token. Returns false once the document is exhausted
    /// and [`UsfmEvent::EndUsfm`] has been emitted.
    pub fn process_token(&mut self) -> bool {
        if !self.started {
            self.started = true;
            self.emit(&UsfmEvent::StartUsfm);
        }
        if self.state.next_index > self.state.tokens.len() {
            return false;
        }

        if let Some(prev) = self.state.token() {
            self.state.verse_offset += prev.len();
        }
        self.state.next_index += 1;

        let Some(index) = self.state.index() else {
            return false;
        };
        let Some(token) = self.state.tokens.get(index).cloned() else {
            self.close_all();
            self.emit(&UsfmEvent::EndUsfm);
            return false;
        };
        self.state.line_number = token.line;
        self.state.column_number = token.column;

        if self.skip > 0 {
            self.skip -= 1;
            self.state.special_token_count = self.state.special_token_count.saturating_sub(1);
            self.state.special_token = true;
            return true;
        }
        self.state.special_token = false;

        let token_type = match token.token_type {
            UsfmTokenType::Unknown if self.in_note() => UsfmTokenType::Character,
            UsfmTokenType::Unknown => UsfmTokenType::Paragraph,
            other => other,
        };

        if let Some(marker) = token.marker.as_deref() {
            self.emit(&UsfmEvent::GotMarker { marker });
        }

        self.close_for(&token, token_type);
        self.open_for(&token, token_type, index);
        true
    }

    // =========================================================================
    // Closure
    // =========================================================================

    fn close_for(&mut self, token: &UsfmToken, token_type: UsfmTokenType) {
        let marker = token.marker.as_deref().unwrap_or_default();
        match token_type {
            UsfmTokenType::Book | UsfmTokenType::Chapter => self.close_all(),
            UsfmTokenType::Paragraph => match marker {
                "tr" => self.close_until(|e| {
                    matches!(
                        e.element_type,
                        UsfmParserElementType::Table | UsfmParserElementType::Sidebar
                    )
                }),
                "esb" => self.close_all(),
                _ => self.close_until(|e| e.element_type == UsfmParserElementType::Sidebar),
            },
            UsfmTokenType::Character => {
                if is_cell(marker) {
                    self.close_until(|e| e.element_type == UsfmParserElementType::Row);
                } else if marker != "ref" && !marker.starts_with('+') {
                    self.close_char_styles();
                }
            }
            UsfmTokenType::Verse => {
                let outside_verse_text = self
                    .state
                    .para_tag()
                    .is_some_and(|tag| !tag.is_verse_text_type());
                if outside_verse_text {
                    self.close_all();
                } else {
                    self.close_note(false);
                }
            }
            UsfmTokenType::Note => self.close_note(false),
            UsfmTokenType::End => self.close_for_end(marker),
            _ => {}
        }
    }

    fn close_for_end(&mut self, marker: &str) {
        let closes_note = self.state.stack.iter().any(|e| {
            e.element_type == UsfmParserElementType::Note
                && e.marker.as_deref().is_some_and(|m| {
                    marker.strip_suffix('*') == Some(m)
                })
        });
        if closes_note {
            self.close_note(true);
            return;
        }

        while let Some(top) = self.state.peek() {
            if top.element_type != UsfmParserElementType::Char {
                break;
            }
            let depth = self.state.stack.len();
            let nested = depth > 1
                && self.state.stack[depth - 2].element_type == UsfmParserElementType::Char;
            let expected = format!("{}{}*", if nested { "+" } else { "" }, top.marker());
            if expected == marker {
                self.close_element(true);
                return;
            }
            self.close_element(false);
        }
        log::debug!(
            "unmatched end marker \\{marker} at {}:{}",
            self.state.line_number,
            self.state.column_number
        );
        self.emit(&UsfmEvent::Unmatched { marker });
    }

    fn close_all(&mut self) {
        while !self.state.stack.is_empty() {
            self.close_element(false);
        }
    }

    /// Closes elements until `stop` matches the top of the stack.
    fn close_until(&mut self, stop: impl Fn(&UsfmParserElement) -> bool) {
        while self.state.peek().is_some_and(|e| !stop(e)) {
            self.close_element(false);
        }
    }

    fn close_char_styles(&mut self) {
        while self
            .state
            .peek()
            .is_some_and(|e| e.element_type == UsfmParserElementType::Char)
        {
            self.close_element(false);
        }
    }

    /// Closes the innermost note and everything inside it.
    fn close_note(&mut self, closed: bool) {
        if !self.in_note() {
            return;
        }
        while let Some(top) = self.state.peek() {
            let is_note = top.element_type == UsfmParserElementType::Note;
            self.close_element(closed && is_note);
            if is_note {
                break;
            }
        }
    }

    fn close_element(&mut self, closed: bool) {
        let Some(element) = self.state.pop() else {
            return;
        };
        let marker = element.marker();
        let event = match element.element_type {
            UsfmParserElementType::Book => UsfmEvent::EndBook { marker },
            UsfmParserElementType::Para => UsfmEvent::EndPara { marker },
            UsfmParserElementType::Char => UsfmEvent::EndChar {
                marker,
                attributes: &element.attributes,
                closed,
            },
            UsfmParserElementType::Note => UsfmEvent::EndNote { marker, closed },
            UsfmParserElementType::Table => UsfmEvent::EndTable,
            UsfmParserElementType::Row => UsfmEvent::EndRow { marker },
            UsfmParserElementType::Cell => UsfmEvent::EndCell { marker },
            UsfmParserElementType::Sidebar => UsfmEvent::EndSidebar { marker, closed },
        };
        self.emit(&event);
    }

    // =========================================================================
    // Opening
    // =========================================================================

    fn open_for(&mut self, token: &UsfmToken, token_type: UsfmTokenType, index: usize) {
        let marker = token.marker.as_deref().unwrap_or_default();
        let data = token.data.as_deref().unwrap_or_default();
        match token_type {
            UsfmTokenType::Book => self.open_book(marker, data),
            UsfmTokenType::Chapter => self.open_chapter(marker, data, index),
            UsfmTokenType::Verse => self.open_verse(marker, data, index),
            UsfmTokenType::Paragraph => self.open_paragraph(token, index),
            UsfmTokenType::Character => self.open_character(token, index),
            UsfmTokenType::Note => {
                let category = self.take_enclosed(index, "cat");
                self.push(UsfmParserElementType::Note, marker, token);
                self.emit(&UsfmEvent::StartNote {
                    marker,
                    caller: data,
                    category: category.as_deref(),
                });
            }
            UsfmTokenType::Text => self.text(token, index),
            UsfmTokenType::Milestone | UsfmTokenType::MilestoneEnd => {
                self.emit(&UsfmEvent::Milestone {
                    marker,
                    start: token_type == UsfmTokenType::Milestone,
                    attributes: &token.attributes,
                });
            }
            UsfmTokenType::End | UsfmTokenType::Attribute | UsfmTokenType::Unknown => {}
        }
    }

    fn open_book(&mut self, marker: &str, data: &str) {
        let code = data.to_uppercase();
        self.state.push(UsfmParserElement::new(
            UsfmParserElementType::Book,
            Some(marker.to_string()),
        ));
        let book_num = book_id_to_number(&code);
        let verse_ref = &mut self.state.verse_ref;
        if verse_ref.book_num() == 0 && book_num != 0 {
            verse_ref.set_book_num(book_num);
        }
        verse_ref.set_chapter_num(1);
        verse_ref.set_verse_num(0);
        self.state.verse_offset = 0;
        self.emit(&UsfmEvent::StartBook {
            marker,
            code: &code,
        });
    }

    fn open_chapter(&mut self, marker: &str, data: &str, index: usize) {
        let alt_number = self.take_enclosed(index, "ca");
        if alt_number.is_some() && self.is_blank_text(index + self.skip + 1) {
            self.skip += 1;
            self.state.special_token_count += 1;
        }
        let pub_number = self.take_following(index, "cp");

        let verse_ref = &mut self.state.verse_ref;
        verse_ref.set_chapter_num(leading_number(data));
        verse_ref.set_verse_num(0);
        if verse_ref.chapter_num() != 1 {
            self.state.verse_offset = 0;
        }
        self.emit(&UsfmEvent::Chapter {
            number: data,
            marker,
            alt_number: alt_number.as_deref(),
            pub_number: pub_number.as_deref(),
        });
    }

    fn open_verse(&mut self, marker: &str, data: &str, index: usize) {
        let alt_number = self.take_enclosed(index, "va");
        let pub_number = self.take_enclosed(index, "vp");

        let verse_ref = &mut self.state.verse_ref;
        if verse_ref.set_verse(data).is_err() {
            log::debug!("verse selector {data:?} is malformed, using its leading number");
            verse_ref.set_verse_num(leading_number(data));
        }
        self.state.verse_offset = 0;
        self.emit(&UsfmEvent::Verse {
            number: data,
            marker,
            alt_number: alt_number.as_deref(),
            pub_number: pub_number.as_deref(),
        });
    }

    fn open_paragraph(&mut self, token: &UsfmToken, index: usize) {
        let marker = token.marker.as_deref().unwrap_or_default();
        match marker {
            "tr" => {
                if self
                    .state
                    .peek()
                    .is_none_or(|e| e.element_type != UsfmParserElementType::Table)
                {
                    self.state
                        .push(UsfmParserElement::new(UsfmParserElementType::Table, None));
                    self.emit(&UsfmEvent::StartTable);
                }
                self.push(UsfmParserElementType::Row, marker, token);
                self.emit(&UsfmEvent::StartRow { marker });
            }
            "esb" => {
                let category = self.take_enclosed(index, "esbc");
                self.push(UsfmParserElementType::Sidebar, marker, token);
                self.emit(&UsfmEvent::StartSidebar {
                    marker,
                    category: category.as_deref(),
                });
            }
            "esbe" => {
                if self
                    .state
                    .peek()
                    .is_some_and(|e| e.element_type == UsfmParserElementType::Sidebar)
                {
                    self.close_element(true);
                } else {
                    self.emit(&UsfmEvent::Unmatched { marker });
                }
            }
            _ => {
                self.push(UsfmParserElementType::Para, marker, token);
                self.emit(&UsfmEvent::StartPara {
                    marker,
                    unknown: token.token_type == UsfmTokenType::Unknown,
                    attributes: &token.attributes,
                });
            }
        }
    }

    fn open_character(&mut self, token: &UsfmToken, index: usize) {
        let marker = token.marker.as_deref().unwrap_or_default();
        if is_cell(marker) {
            let (base, col_span) = is_cell_range(marker).unwrap_or_else(|| (marker.to_string(), 0));
            self.push(UsfmParserElementType::Cell, &base, token);
            self.emit(&UsfmEvent::StartCell {
                marker: &base,
                align: CellAlignment::from_marker(&base),
                col_span,
            });
            return;
        }

        if marker == "ref" {
            if let Some((display, target)) = self.take_reference(index) {
                self.emit(&UsfmEvent::Ref {
                    marker,
                    display: &display,
                    target: &target,
                });
                return;
            }
        }

        let nested_outside_style = marker.starts_with('+') && self.state.char_tag().is_none();
        let stack_marker = if nested_outside_style {
            marker
        } else {
            marker.trim_start_matches('+')
        };
        self.push(UsfmParserElementType::Char, stack_marker, token);
        self.emit(&UsfmEvent::StartChar {
            marker: marker.trim_start_matches('+'),
            unknown: token.token_type == UsfmTokenType::Unknown || nested_outside_style,
            attributes: &token.attributes,
        });
    }

    fn text(&mut self, token: &UsfmToken, index: usize) {
        let mut text = token.text.clone().unwrap_or_default();
        let at_line_end = self.state.tokens.get(index + 1).is_none_or(|next| {
            matches!(
                next.token_type,
                UsfmTokenType::Paragraph | UsfmTokenType::Book | UsfmTokenType::Chapter
            )
        });
        if at_line_end && text.ends_with(' ') {
            text.pop();
        }
        let text = text.replace('~', "\u{00A0}");
        for (i, part) in text.split("//").enumerate() {
            if i > 0 {
                self.emit(&UsfmEvent::OptBreak);
            }
            if !part.is_empty() {
                self.emit(&UsfmEvent::Text { text: part });
            }
        }
    }

    // =========================================================================
    // Look-ahead
    // =========================================================================

    /// Consumes `\m text\m*` right after the current token and any earlier
    /// look-ahead. Returns the trimmed text.
    fn take_enclosed(&mut self, index: usize, marker: &str) -> Option<String> {
        let start = index + self.skip + 1;
        let tokens = &self.state.tokens;
        let open = tokens.get(start)?;
        let text = tokens.get(start + 1)?;
        let close = tokens.get(start + 2)?;
        let end_marker = format!("{marker}*");
        if open.marker.as_deref() != Some(marker)
            || text.token_type != UsfmTokenType::Text
            || close.marker.as_deref() != Some(end_marker.as_str())
        {
            return None;
        }
        let value = text.text.as_deref().unwrap_or_default().trim().to_string();
        self.skip += 3;
        self.state.special_token_count += 3;
        Some(value)
    }

    /// Consumes `\m text` right after the current token.
    fn take_following(&mut self, index: usize, marker: &str) -> Option<String> {
        let start = index + self.skip + 1;
        let tokens = &self.state.tokens;
        let open = tokens.get(start)?;
        let text = tokens.get(start + 1)?;
        if open.marker.as_deref() != Some(marker) || text.token_type != UsfmTokenType::Text {
            return None;
        }
        let value = text.text.as_deref().unwrap_or_default().trim().to_string();
        self.skip += 2;
        self.state.special_token_count += 2;
        Some(value)
    }

    /// Consumes `display|target\ref*` after `\ref`.
    fn take_reference(&mut self, index: usize) -> Option<(String, String)> {
        let tokens = &self.state.tokens;
        let text = tokens.get(index + 1)?;
        let close = tokens.get(index + 2)?;
        if text.token_type != UsfmTokenType::Text || close.marker.as_deref() != Some("ref*") {
            return None;
        }
        let text = text.text.as_deref().unwrap_or_default();
        let (display, target) = text.split_once('|').unwrap_or((text, ""));
        let result = (display.to_string(), target.to_string());
        self.skip += 2;
        self.state.special_token_count += 2;
        Some(result)
    }

    fn is_blank_text(&self, index: usize) -> bool {
        self.state.tokens.get(index).is_some_and(|t| {
            t.token_type == UsfmTokenType::Text
                && t.text.as_deref().is_none_or(|s| s.trim().is_empty())
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn in_note(&self) -> bool {
        self.state
            .stack
            .iter()
            .any(|e| e.element_type == UsfmParserElementType::Note)
    }

    fn push(&mut self, element_type: UsfmParserElementType, marker: &str, token: &UsfmToken) {
        self.state.push(
            UsfmParserElement::new(element_type, Some(marker.to_string()))
                .with_attributes(token.attributes.clone()),
        );
    }

    fn emit(&mut self, event: &UsfmEvent<'_>) {
        if let Some(handler) = self.handler.as_deref_mut() {
            handler.handle_event(&self.state, event);
        }
    }
}

/// Table cell markers: `th1`, `thc2`, `tcr3`, `tc1-2`.
pub(crate) fn is_cell(marker: &str) -> bool {
    marker
        .strip_prefix("th")
        .or_else(|| marker.strip_prefix("tc"))
        .map(|rest| rest.trim_start_matches(['c', 'r']))
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
}

/// Leading digits of a chapter or verse number, or 0.
fn leading_number(text: &str) -> u32 {
    let digits = text.trim().len() - text.trim().trim_start_matches(|c: char| c.is_ascii_digit()).len();
    text.trim()[..digits].parse().unwrap_or(0)
}

/// Parses a document and sends every event to `handler`.
///
/// Uses the default stylesheet and English versification unless others are
/// given.
pub fn parse_usfm(
    usfm: &str,
    handler: &mut dyn UsfmParserHandler,
    stylesheet: Option<Arc<UsfmStylesheet>>,
    versification: Option<Arc<Versification>>,
) {
    let stylesheet = stylesheet.unwrap_or_else(UsfmStylesheet::default_stylesheet);
    let versification = versification.unwrap_or_else(Versification::english);
    UsfmParser::new(usfm, stylesheet, versification)
        .with_handler(handler)
        .process_tokens();
}
