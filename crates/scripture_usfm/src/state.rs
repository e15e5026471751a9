//! Parser state visible to handlers.

use std::sync::Arc;

use scripture_versification::{VerseRef, Versification};

use crate::element::{UsfmParserElement, UsfmParserElementType};
use crate::stylesheet::UsfmStylesheet;
use crate::tag::{UsfmTag, UsfmTextProperties, UsfmTextType};
use crate::token::UsfmToken;

/// Cursor, element stack and verse position of a parse.
///
/// Handlers receive a shared reference to the state with every event and
/// may query it freely.
#[derive(Debug, Clone)]
pub struct UsfmParserState {
    pub(crate) stylesheet: Arc<UsfmStylesheet>,
    pub(crate) tokens: Vec<UsfmToken>,
    pub(crate) stack: Vec<UsfmParserElement>,
    pub(crate) verse_ref: VerseRef,
    pub(crate) verse_offset: usize,
    pub(crate) line_number: u32,
    pub(crate) column_number: u32,
    /// Number of tokens processed; the current token is `next_index - 1`.
    pub(crate) next_index: usize,
    pub(crate) special_token: bool,
    pub(crate) special_token_count: usize,
}

impl UsfmParserState {
    /// Creates a state positioned before the first token.
    #[must_use]
    pub fn new(
        stylesheet: Arc<UsfmStylesheet>,
        versification: Arc<Versification>,
        tokens: Vec<UsfmToken>,
    ) -> Self {
        Self {
            stylesheet,
            tokens,
            stack: Vec::new(),
            verse_ref: VerseRef::from_numbers(0, 0, 0, versification),
            verse_offset: 0,
            line_number: 1,
            column_number: 0,
            next_index: 0,
            special_token: false,
            special_token_count: 0,
        }
    }

    /// The stylesheet markers are classified with.
    #[must_use]
    pub fn stylesheet(&self) -> &Arc<UsfmStylesheet> {
        &self.stylesheet
    }

    /// The versification of [`verse_ref`](Self::verse_ref).
    #[must_use]
    pub fn versification(&self) -> &Arc<Versification> {
        self.verse_ref.versification()
    }

    /// All tokens of the document.
    #[must_use]
    pub fn tokens(&self) -> &[UsfmToken] {
        &self.tokens
    }

    /// Index of the current token, `None` before the first.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.next_index.checked_sub(1)
    }

    /// The current token.
    #[must_use]
    pub fn token(&self) -> Option<&UsfmToken> {
        self.index().and_then(|i| self.tokens.get(i))
    }

    /// The token before the current one.
    #[must_use]
    pub fn prev_token(&self) -> Option<&UsfmToken> {
        self.index()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.tokens.get(i))
    }

    /// True while the current token is being consumed as part of a
    /// preceding marker, such as the number inside `\ca 2\ca*`.
    #[must_use]
    pub fn is_special_token(&self) -> bool {
        self.special_token
    }

    /// Tokens after the current one that the current marker has consumed.
    #[must_use]
    pub fn special_token_count(&self) -> usize {
        self.special_token_count
    }

    /// Open elements, outermost first.
    #[must_use]
    pub fn stack(&self) -> &[UsfmParserElement] {
        &self.stack
    }

    /// The innermost open element.
    #[must_use]
    pub fn peek(&self) -> Option<&UsfmParserElement> {
        self.stack.last()
    }

    /// The current verse.
    #[must_use]
    pub fn verse_ref(&self) -> &VerseRef {
        &self.verse_ref
    }

    /// Characters written since the current verse (or chapter) began.
    #[must_use]
    pub fn verse_offset(&self) -> usize {
        self.verse_offset
    }

    /// Source line of the current token.
    #[must_use]
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// Source column of the current token.
    #[must_use]
    pub fn column_number(&self) -> u32 {
        self.column_number
    }

    /// Tag of the innermost paragraph-like element: paragraph, book, row or
    /// sidebar.
    #[must_use]
    pub fn para_tag(&self) -> Option<Arc<UsfmTag>> {
        self.stack
            .iter()
            .rev()
            .find(|e| {
                matches!(
                    e.element_type,
                    UsfmParserElementType::Para
                        | UsfmParserElementType::Book
                        | UsfmParserElementType::Row
                        | UsfmParserElementType::Sidebar
                )
            })
            .map(|e| self.stylesheet.get_tag(e.marker()))
    }

    /// Tags of the character styles at the top of the stack, innermost
    /// first.
    #[must_use]
    pub fn char_tags(&self) -> Vec<Arc<UsfmTag>> {
        self.stack
            .iter()
            .rev()
            .take_while(|e| e.element_type == UsfmParserElementType::Char)
            .map(|e| self.stylesheet.get_tag(e.marker()))
            .collect()
    }

    /// Tag of the innermost character style.
    #[must_use]
    pub fn char_tag(&self) -> Option<Arc<UsfmTag>> {
        self.stack
            .last()
            .filter(|e| e.element_type == UsfmParserElementType::Char)
            .map(|e| self.stylesheet.get_tag(e.marker()))
    }

    /// Tag of the innermost open note.
    #[must_use]
    pub fn note_tag(&self) -> Option<Arc<UsfmTag>> {
        self.stack
            .iter()
            .rev()
            .find(|e| e.element_type == UsfmParserElementType::Note)
            .map(|e| self.stylesheet.get_tag(e.marker()))
    }

    /// True inside `\fig`.
    #[must_use]
    pub fn is_figure(&self) -> bool {
        self.char_tag().is_some_and(|t| t.marker == "fig")
    }

    /// True when the current paragraph holds verse text. Text outside any
    /// paragraph counts as verse text.
    #[must_use]
    pub fn is_verse_para(&self) -> bool {
        let Some(tag) = self.para_tag() else {
            return true;
        };
        tag.is_verse_text_type() && !tag.has_property(UsfmTextProperties::NONPUBLISHABLE)
    }

    /// True when text at this point is verse text: in a verse paragraph,
    /// outside notes and sidebars, and only under verse-text character
    /// styles.
    #[must_use]
    pub fn is_verse_text(&self) -> bool {
        if self.stack.iter().any(|e| {
            matches!(
                e.element_type,
                UsfmParserElementType::Sidebar | UsfmParserElementType::Note
            )
        }) {
            return false;
        }
        self.is_verse_para()
            && self
                .char_tags()
                .iter()
                .all(|t| t.text_type == UsfmTextType::VerseText)
    }

    /// True inside a character style whose text is not publishable, such as
    /// `\fig` descriptions.
    #[must_use]
    pub fn is_special_text(&self) -> bool {
        self.char_tags()
            .iter()
            .any(|t| !t.has_property(UsfmTextProperties::PUBLISHABLE))
    }

    pub(crate) fn push(&mut self, element: UsfmParserElement) {
        self.stack.push(element);
    }

    pub(crate) fn pop(&mut self) -> Option<UsfmParserElement> {
        self.stack.pop()
    }
}
