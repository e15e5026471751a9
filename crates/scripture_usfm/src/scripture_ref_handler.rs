//! Reference-aware event handling.
//!
//! [`ScriptureRefUsfmParserHandler`] turns the raw event stream into
//! segments addressed by [`ScriptureRef`]: verse text, non-verse text such
//! as headings and table cells, and embeds such as footnotes. The
//! segment-level callbacks go to a [`ScriptureRefHooks`] implementation.

use scripture_versification::{
    ScriptureElement, ScriptureRef, VerseRef, are_overlapping_verse_ranges, merge_verse_ranges,
};

use crate::event::UsfmEvent;
use crate::handler::UsfmParserHandler;
use crate::state::UsfmParserState;
use crate::token::UsfmAttribute;

const EMBED_STYLES: [&str; 5] = ["f", "fe", "fig", "fm", "x"];
const EMBED_PART_PREFIXES: [char; 3] = ['f', 'x', 'z'];
const NOTE_TEXT_STYLE: &str = "ft";

/// True for markers that start an embed: notes, figures and `\fm`.
#[must_use]
pub fn is_embed_style(marker: &str) -> bool {
    EMBED_STYLES.contains(&marker.trim_start_matches('+'))
}

/// True for character markers that make up the inside of a note.
#[must_use]
pub fn is_embed_part_style(marker: &str) -> bool {
    marker.trim_start_matches('+').starts_with(EMBED_PART_PREFIXES)
}

/// Kind of the text segment currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptureTextType {
    /// Inside a verse.
    Verse,
    /// Headings, introductions, table cells and other text outside verses.
    NonVerse,
    /// The `\ft` payload of a note.
    NoteText,
}

/// Segment callbacks for a [`ScriptureRefUsfmParserHandler`].
///
/// Each callback receives the handler's [`ScriptureRefContext`] and the
/// parser state. [`on_event`](Self::on_event) sees every raw event, after
/// the segment ends it causes and before the segment starts it causes.
#[allow(unused_variables)]
pub trait ScriptureRefHooks {
    /// Verse text begins for `refs`.
    fn start_verse_text(
        &mut self,
        context: &ScriptureRefContext,
        state: &UsfmParserState,
        refs: &[ScriptureRef],
    ) {
    }

    /// Verse text for `refs` ends.
    fn end_verse_text(
        &mut self,
        context: &ScriptureRefContext,
        state: &UsfmParserState,
        refs: &[ScriptureRef],
    ) {
    }

    /// Non-verse text begins.
    fn start_non_verse_text(
        &mut self,
        context: &ScriptureRefContext,
        state: &UsfmParserState,
        scripture_ref: &ScriptureRef,
    ) {
    }

    /// Non-verse text ends.
    fn end_non_verse_text(
        &mut self,
        context: &ScriptureRefContext,
        state: &UsfmParserState,
        scripture_ref: &ScriptureRef,
    ) {
    }

    /// The `\ft` text of a note begins.
    fn start_note_text(
        &mut self,
        context: &ScriptureRefContext,
        state: &UsfmParserState,
        scripture_ref: &ScriptureRef,
    ) {
    }

    /// The `\ft` text of a note ends.
    fn end_note_text(
        &mut self,
        context: &ScriptureRefContext,
        state: &UsfmParserState,
        scripture_ref: &ScriptureRef,
    ) {
    }

    /// A note, figure or other embed begins.
    fn start_embed(
        &mut self,
        context: &ScriptureRefContext,
        state: &UsfmParserState,
        scripture_ref: &ScriptureRef,
    ) {
    }

    /// An embed ends.
    fn end_embed(
        &mut self,
        context: &ScriptureRefContext,
        state: &UsfmParserState,
        marker: &str,
        attributes: &[UsfmAttribute],
        closed: bool,
    ) {
    }

    /// Every parser event.
    fn on_event(
        &mut self,
        context: &ScriptureRefContext,
        state: &UsfmParserState,
        event: &UsfmEvent<'_>,
    ) {
    }
}

/// Position tracking shared with the hooks.
#[derive(Debug, Clone, Default)]
pub struct ScriptureRefContext {
    cur_verse_ref: VerseRef,
    cur_elements: Vec<ScriptureElement>,
    cur_text_types: Vec<ScriptureTextType>,
    duplicate_verse: bool,
    in_embed: bool,
    in_note_text: bool,
    in_nested_embed: bool,
}

impl ScriptureRefContext {
    /// The current verse, after merging overlapping ranges.
    #[must_use]
    pub fn verse_ref(&self) -> &VerseRef {
        &self.cur_verse_ref
    }

    /// Path of elements below the current verse, including unnumbered
    /// placeholders.
    #[must_use]
    pub fn elements(&self) -> &[ScriptureElement] {
        &self.cur_elements
    }

    /// Kind of the innermost open segment.
    #[must_use]
    pub fn current_text_type(&self) -> Option<ScriptureTextType> {
        self.cur_text_types.last().copied()
    }

    /// True after a verse marker that repeats the current verse.
    #[must_use]
    pub fn is_duplicate_verse(&self) -> bool {
        self.duplicate_verse
    }

    /// True inside a note or figure.
    #[must_use]
    pub fn in_embed(&self) -> bool {
        self.in_embed
    }

    /// True inside the `\ft` text of a note.
    #[must_use]
    pub fn in_note_text(&self) -> bool {
        self.in_note_text
    }

    /// True inside a `+`-nested embed part within note text.
    #[must_use]
    pub fn in_nested_embed(&self) -> bool {
        self.in_nested_embed
    }

    /// References for the current verse text, one per verse of a range.
    #[must_use]
    pub fn verse_refs(&self) -> Vec<ScriptureRef> {
        if self.cur_verse_ref.has_multiple() {
            self.cur_verse_ref
                .all_verses()
                .into_iter()
                .map(ScriptureRef::from)
                .collect()
        } else {
            vec![ScriptureRef::from(self.cur_verse_ref.clone())]
        }
    }

    /// Reference for the current non-verse location. A range is addressed
    /// by its last verse.
    #[must_use]
    pub fn non_verse_ref(&self) -> ScriptureRef {
        let verse_ref = if self.cur_verse_ref.has_multiple() {
            self.cur_verse_ref
                .all_verses()
                .pop()
                .unwrap_or_else(|| self.cur_verse_ref.clone())
        } else {
            self.cur_verse_ref.clone()
        };
        let path = self
            .cur_elements
            .iter()
            .filter(|e| e.position() > 0)
            .cloned()
            .collect();
        ScriptureRef::new(verse_ref, path)
    }

    fn update_verse_ref(&mut self, verse_ref: &VerseRef, marker: &str) {
        if !verse_ref.overlaps(&self.cur_verse_ref) {
            self.cur_elements.clear();
            self.cur_elements.push(ScriptureElement::new(0, marker));
        }
        self.cur_verse_ref = verse_ref.clone();
    }

    fn next_element(&mut self, marker: &str) {
        let position = self.cur_elements.pop().map_or(0, |e| e.position());
        self.cur_elements
            .push(ScriptureElement::new(position + 1, marker));
    }

    fn start_parent_element(&mut self, marker: &str) {
        self.next_element(marker);
        self.cur_elements.push(ScriptureElement::new(0, marker));
    }

    fn end_parent_element(&mut self) {
        self.cur_elements.pop();
    }
}

/// Handler that tracks scripture references and reports segments to its
/// hooks.
#[derive(Debug, Default)]
pub struct ScriptureRefUsfmParserHandler<H> {
    hooks: H,
    context: ScriptureRefContext,
}

impl<H: ScriptureRefHooks> ScriptureRefUsfmParserHandler<H> {
    /// Wraps `hooks`.
    #[must_use]
    pub fn new(hooks: H) -> Self {
        Self {
            hooks,
            context: ScriptureRefContext::default(),
        }
    }

    /// The hooks.
    #[must_use]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// The hooks, mutably.
    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Unwraps the hooks.
    #[must_use]
    pub fn into_hooks(self) -> H {
        self.hooks
    }

    /// The reference context.
    #[must_use]
    pub fn context(&self) -> &ScriptureRefContext {
        &self.context
    }

    fn on_event(&mut self, state: &UsfmParserState, event: &UsfmEvent<'_>) {
        self.hooks.on_event(&self.context, state, event);
    }

    // =========================================================================
    // Segments
    // =========================================================================

    fn start_verse_text(&mut self, state: &UsfmParserState) {
        self.context.duplicate_verse = false;
        self.context.cur_text_types.push(ScriptureTextType::Verse);
        let refs = self.context.verse_refs();
        self.hooks.start_verse_text(&self.context, state, &refs);
    }

    fn end_verse_text(&mut self, state: &UsfmParserState) {
        if self.context.cur_verse_ref.verse_num() == 0 {
            return;
        }
        if !self.context.duplicate_verse {
            let refs = self.context.verse_refs();
            self.hooks.end_verse_text(&self.context, state, &refs);
        }
        if self.context.current_text_type() == Some(ScriptureTextType::Verse) {
            self.context.cur_text_types.pop();
        }
    }

    fn start_non_verse_text(&mut self, state: &UsfmParserState) {
        self.context.cur_text_types.push(ScriptureTextType::NonVerse);
        let scripture_ref = self.context.non_verse_ref();
        self.hooks
            .start_non_verse_text(&self.context, state, &scripture_ref);
    }

    fn end_non_verse_text(&mut self, state: &UsfmParserState) {
        let scripture_ref = self.context.non_verse_ref();
        self.hooks
            .end_non_verse_text(&self.context, state, &scripture_ref);
        self.context.cur_text_types.pop();
    }

    fn start_note_text(&mut self, state: &UsfmParserState) {
        self.context.in_note_text = true;
        self.context.cur_text_types.push(ScriptureTextType::NoteText);
        let scripture_ref = self.context.non_verse_ref();
        self.hooks.start_note_text(&self.context, state, &scripture_ref);
    }

    fn end_note_text(&mut self, state: &UsfmParserState) {
        if self.context.current_text_type() != Some(ScriptureTextType::NoteText) {
            return;
        }
        let scripture_ref = self.context.non_verse_ref();
        self.hooks.end_note_text(&self.context, state, &scripture_ref);
        self.context.cur_text_types.pop();
        self.context.in_note_text = false;
    }

    fn start_embed(&mut self, state: &UsfmParserState, marker: &str) {
        if self.context.cur_verse_ref.is_default() {
            self.context.update_verse_ref(state.verse_ref(), marker);
        }
        self.context.in_embed = true;
        self.context.next_element(marker);
        let scripture_ref = self.context.non_verse_ref();
        self.hooks.start_embed(&self.context, state, &scripture_ref);
    }

    fn end_embed(
        &mut self,
        state: &UsfmParserState,
        marker: &str,
        attributes: &[UsfmAttribute],
        closed: bool,
    ) {
        self.hooks
            .end_embed(&self.context, state, marker, attributes, closed);
        self.context.in_embed = false;
    }

    /// Text in a verse paragraph before the first verse of a chapter is
    /// non-verse text of that paragraph.
    fn check_convert_verse_para(&mut self, state: &UsfmParserState) {
        if self.context.current_text_type().is_some() || self.context.cur_verse_ref.verse_num() != 0
        {
            return;
        }
        let Some(para_tag) = state.para_tag() else {
            return;
        };
        if para_tag.marker == "tr" || !state.is_verse_text() {
            return;
        }
        self.context.start_parent_element(&para_tag.marker);
        self.start_non_verse_text(state);
    }

    // =========================================================================
    // Events
    // =========================================================================

    fn verse(&mut self, state: &UsfmParserState, number: &str, marker: &str, event: &UsfmEvent<'_>) {
        let verse_ref = state.verse_ref();
        if *verse_ref == self.context.cur_verse_ref && !self.context.duplicate_verse {
            if verse_ref.verse_num() > 0 {
                let refs = self.context.verse_refs();
                self.hooks.end_verse_text(&self.context, state, &refs);
                self.context.duplicate_verse = true;
            }
            self.on_event(state, event);
        } else if are_overlapping_verse_ranges(number, &self.context.cur_verse_ref.verse()) {
            let mut merged = self.context.cur_verse_ref.clone();
            let range = merge_verse_ranges(number, &merged.verse());
            if merged.set_verse(&range).is_err() {
                log::debug!("could not merge verse ranges {number:?} and {range:?}");
            }
            self.context.update_verse_ref(&merged, marker);
            self.on_event(state, event);
        } else {
            if self.context.current_text_type() == Some(ScriptureTextType::NonVerse) {
                self.end_non_verse_text(state);
            }
            if self.context.current_text_type() == Some(ScriptureTextType::Verse) {
                self.end_verse_text(state);
            }
            self.context.update_verse_ref(verse_ref, marker);
            self.on_event(state, event);
            self.start_verse_text(state);
        }
    }

    fn start_char(&mut self, state: &UsfmParserState, marker: &str, event: &UsfmEvent<'_>) {
        if is_embed_style(marker) {
            self.start_embed(state, marker);
            self.on_event(state, event);
            return;
        }
        self.check_convert_verse_para(state);
        let nested = state.token().is_some_and(|t| t.is_nested());
        if nested && self.context.in_note_text && is_embed_part_style(marker) {
            self.context.in_nested_embed = true;
        }
        self.on_event(state, event);
        if marker == NOTE_TEXT_STYLE && self.context.in_embed && !self.context.in_note_text {
            self.start_note_text(state);
        }
    }

    fn end_char(
        &mut self,
        state: &UsfmParserState,
        marker: &str,
        attributes: &[UsfmAttribute],
        closed: bool,
        event: &UsfmEvent<'_>,
    ) {
        if is_embed_style(marker) {
            self.on_event(state, event);
            self.end_embed(state, marker, attributes, closed);
            return;
        }
        if is_embed_part_style(marker) {
            if self.context.in_nested_embed {
                self.context.in_nested_embed = false;
            } else {
                self.end_note_text(state);
            }
        }
        self.on_event(state, event);
    }
}

impl<H: ScriptureRefHooks> UsfmParserHandler for ScriptureRefUsfmParserHandler<H> {
    fn handle_event(&mut self, state: &UsfmParserState, event: &UsfmEvent<'_>) {
        match *event {
            UsfmEvent::EndUsfm => {
                self.end_verse_text(state);
                self.on_event(state, event);
            }
            UsfmEvent::Chapter { marker, .. } => {
                self.end_verse_text(state);
                self.context.update_verse_ref(state.verse_ref(), marker);
                self.on_event(state, event);
            }
            UsfmEvent::Verse { number, marker, .. } => self.verse(state, number, marker, event),
            UsfmEvent::StartPara { marker, .. } => {
                if self.context.cur_verse_ref.is_default() {
                    self.context.update_verse_ref(state.verse_ref(), marker);
                }
                self.on_event(state, event);
                if !state.is_verse_text() {
                    self.context.start_parent_element(marker);
                    self.start_non_verse_text(state);
                }
            }
            UsfmEvent::EndPara { marker } => {
                match self.context.current_text_type() {
                    Some(ScriptureTextType::NonVerse) => {
                        self.context.end_parent_element();
                        self.end_non_verse_text(state);
                    }
                    None if !self.context.in_embed => {
                        // An empty paragraph is still an addressable segment.
                        self.context.start_parent_element(marker);
                        self.start_non_verse_text(state);
                        self.context.end_parent_element();
                        self.end_non_verse_text(state);
                    }
                    _ => {}
                }
                self.on_event(state, event);
            }
            UsfmEvent::StartRow { marker } => {
                self.on_event(state, event);
                if self.context.current_text_type().is_none() {
                    self.context.start_parent_element(marker);
                }
            }
            UsfmEvent::EndRow { .. } => {
                if self.context.current_text_type().is_none() {
                    self.context.end_parent_element();
                }
                self.on_event(state, event);
            }
            UsfmEvent::StartCell { marker, .. } => {
                self.on_event(state, event);
                if self.context.current_text_type().is_none() {
                    self.context.start_parent_element(marker);
                    self.start_non_verse_text(state);
                }
            }
            UsfmEvent::EndCell { .. } => {
                if self.context.current_text_type() == Some(ScriptureTextType::NonVerse) {
                    self.context.end_parent_element();
                    self.end_non_verse_text(state);
                }
                self.on_event(state, event);
            }
            UsfmEvent::StartSidebar { marker, .. } => {
                self.on_event(state, event);
                self.context.start_parent_element(marker);
            }
            UsfmEvent::EndSidebar { .. } => {
                self.context.end_parent_element();
                self.on_event(state, event);
            }
            UsfmEvent::Text { text } => {
                if !text.trim().is_empty() {
                    self.check_convert_verse_para(state);
                }
                self.on_event(state, event);
            }
            UsfmEvent::OptBreak => {
                self.check_convert_verse_para(state);
                self.on_event(state, event);
            }
            UsfmEvent::StartChar { marker, .. } => self.start_char(state, marker, event),
            UsfmEvent::EndChar {
                marker,
                attributes,
                closed,
            } => self.end_char(state, marker, attributes, closed, event),
            UsfmEvent::StartNote { marker, .. } => {
                self.start_embed(state, marker);
                self.on_event(state, event);
            }
            UsfmEvent::EndNote { marker, closed } => {
                self.on_event(state, event);
                self.end_note_text(state);
                self.end_embed(state, marker, &[], closed);
            }
            _ => self.on_event(state, event),
        }
    }
}
