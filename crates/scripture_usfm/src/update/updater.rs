//! The update handler.
//!
//! The updater re-emits the source token stream through a cursor. Every
//! event that owns source tokens copies them forward, either kept or marked
//! for removal, and replacement text is spliced in where a segment with a
//! matching row begins. Tokens are grouped into an [`UsfmUpdateBlock`] per
//! segment so that block handlers can rewrite them before they reach the
//! output.

use std::cmp::Ordering;
use std::slice;
use std::sync::Arc;

use scripture_versification::{ScriptureRef, Versification};

use crate::event::UsfmEvent;
use crate::handler::UsfmParserHandler;
use crate::parser::{is_cell, parse_usfm};
use crate::scripture_ref_handler::{
    ScriptureRefContext, ScriptureRefHooks, ScriptureRefUsfmParserHandler, is_embed_style,
};
use crate::state::UsfmParserState;
use crate::stylesheet::UsfmStylesheet;
use crate::token::{UsfmAttribute, UsfmToken, UsfmTokenType};
use crate::tokenizer::detokenize;

use super::block::UsfmUpdateBlock;
use super::config::{UpdateUsfmConfig, UpdateUsfmRow};
use super::handler::UsfmUpdateBlockHandler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Id,
    Verse,
    NonVerse,
    Embed,
}

/// One open segment and what the updater decided for it.
#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    refs: Vec<ScriptureRef>,
    use_new: bool,
    pending: Option<String>,
}

impl Frame {
    /// Whether the frame governs the text at the current position.
    fn applies(&self, context: &ScriptureRefContext) -> bool {
        match self.kind {
            FrameKind::Embed => context.in_note_text(),
            _ => !context.in_embed(),
        }
    }
}

struct UsfmUpdater<'a> {
    rows: Vec<UpdateUsfmRow>,
    config: UpdateUsfmConfig,
    row_index: usize,
    tokens: Vec<UsfmToken>,
    cursor: usize,
    frames: Vec<Frame>,
    block: Option<UsfmUpdateBlock>,
    embed: Option<Vec<(UsfmToken, bool)>>,
    /// Position in `embed` of replacement note text.
    note_text_at: Option<usize>,
    skipped_styles: Vec<bool>,
    block_handlers: Vec<Box<dyn UsfmUpdateBlockHandler + 'a>>,
}

impl UsfmUpdater<'_> {
    /// Moves the row cursor past rows that precede `seg_refs` and returns
    /// the text of the rows that match.
    fn advance_rows(&mut self, seg_refs: &[ScriptureRef]) -> Vec<String> {
        let mut texts = Vec::new();
        let mut source_index = 0;
        while source_index < seg_refs.len() {
            let Some(row) = self.rows.get(self.row_index) else {
                break;
            };
            let mut compare = Ordering::Equal;
            for row_ref in &row.refs {
                while let Some(seg_ref) = seg_refs.get(source_index) {
                    compare = row_ref.compare_to(seg_ref, false, true);
                    if compare == Ordering::Greater {
                        source_index += 1;
                    } else {
                        break;
                    }
                }
                if compare == Ordering::Equal {
                    log::trace!("row {} matches {row_ref}", self.row_index);
                    texts.push(row.text.clone());
                    break;
                }
            }
            if compare != Ordering::Greater {
                self.row_index += 1;
            }
        }
        texts
    }

    fn push_frame(
        &mut self,
        kind: FrameKind,
        refs: Vec<ScriptureRef>,
        texts: &[String],
        state: &UsfmParserState,
    ) {
        let has_new = !texts.is_empty();
        let use_new = self.config.strip_all_text
            || (has_new && (!self.config.prefer_existing_text || !has_existing_text(kind, state)));
        let pending = (use_new && has_new).then(|| texts.join(" "));
        if matches!(kind, FrameKind::Verse | FrameKind::NonVerse) {
            self.finish_block();
            self.block = Some(UsfmUpdateBlock::new(refs.clone()));
        }
        self.frames.push(Frame {
            kind,
            refs,
            use_new,
            pending,
        });
        if kind != FrameKind::Embed {
            self.flush_pending();
        }
    }

    /// Pops frames up to and including the innermost one of `kind`.
    fn pop_frame(&mut self, kind: FrameKind) {
        let Some(position) = self.frames.iter().rposition(|f| f.kind == kind) else {
            return;
        };
        self.frames.truncate(position);
        if matches!(kind, FrameKind::Verse | FrameKind::NonVerse) {
            self.finish_block();
            let parent = self
                .frames
                .iter()
                .rev()
                .find(|f| matches!(f.kind, FrameKind::Verse | FrameKind::NonVerse));
            if let Some(parent) = parent {
                self.block = Some(UsfmUpdateBlock::new(parent.refs.clone()));
            }
        }
    }

    fn flush_pending(&mut self) {
        let Some(frame) = self.frames.last_mut() else {
            return;
        };
        let in_embed = frame.kind == FrameKind::Embed;
        if let Some(text) = frame.pending.take() {
            self.emit(UsfmToken::new_text(format!("{text} ")), false);
            if in_embed {
                self.note_text_at = self.embed.as_ref().and_then(|e| e.len().checked_sub(1));
            }
        }
    }

    /// Drops the separator space after replacement note text when nothing
    /// kept follows it before the note closes.
    fn trim_note_text(&mut self) {
        let (Some(at), Some(embed)) = (self.note_text_at.take(), self.embed.as_mut()) else {
            return;
        };
        if !embed.get(at + 1..).is_some_and(|rest| rest.iter().all(|(_, removed)| *removed)) {
            return;
        }
        if let Some(text) = embed.get_mut(at).and_then(|(token, _)| token.text.as_mut()) {
            text.truncate(text.trim_end().len());
        }
    }

    /// True when the innermost frame replaces the text at this position.
    fn replacing(&self, context: &ScriptureRefContext) -> bool {
        self.frames
            .last()
            .is_some_and(|f| f.use_new && f.applies(context))
    }

    fn finish_block(&mut self) {
        let Some(mut block) = self.block.take() else {
            return;
        };
        for handler in &mut self.block_handlers {
            block = handler.process_block(block);
        }
        self.tokens.extend(block.output_tokens());
    }

    fn finish_embed(&mut self) {
        if self.frames.iter().any(|f| f.kind == FrameKind::Embed) {
            return;
        }
        let Some(buffer) = self.embed.take() else {
            return;
        };
        self.note_text_at = None;
        let tokens: Vec<UsfmToken> = buffer
            .into_iter()
            .filter(|(_, removed)| !removed)
            .map(|(token, _)| token)
            .collect();
        match self.block.as_mut() {
            Some(block) => block.add_embed(tokens, false),
            None => self.tokens.extend(tokens),
        }
    }

    /// Copies the source tokens owned by the current event.
    fn collect(&mut self, state: &UsfmParserState, removed: bool) {
        let Some(index) = state.index() else {
            return;
        };
        let end = (index + state.special_token_count() + 1).min(state.tokens().len());
        self.collect_to(state, end, removed);
    }

    fn collect_to(&mut self, state: &UsfmParserState, end: usize, removed: bool) {
        while self.cursor < end {
            let Some(token) = state.tokens().get(self.cursor).cloned() else {
                break;
            };
            self.cursor += 1;
            self.emit(token, removed);
        }
    }

    fn emit(&mut self, token: UsfmToken, removed: bool) {
        if let Some(embed) = self.embed.as_mut() {
            embed.push((token, removed));
        } else if let Some(block) = self.block.as_mut() {
            block.add_token(token, removed);
        } else if !removed {
            self.tokens.push(token);
        }
    }
}

impl ScriptureRefHooks for UsfmUpdater<'_> {
    fn start_verse_text(
        &mut self,
        _context: &ScriptureRefContext,
        state: &UsfmParserState,
        refs: &[ScriptureRef],
    ) {
        let texts = self.advance_rows(refs);
        self.push_frame(FrameKind::Verse, refs.to_vec(), &texts, state);
    }

    fn end_verse_text(
        &mut self,
        _context: &ScriptureRefContext,
        _state: &UsfmParserState,
        _refs: &[ScriptureRef],
    ) {
        self.pop_frame(FrameKind::Verse);
    }

    fn start_non_verse_text(
        &mut self,
        _context: &ScriptureRefContext,
        state: &UsfmParserState,
        scripture_ref: &ScriptureRef,
    ) {
        let texts = self.advance_rows(slice::from_ref(scripture_ref));
        self.push_frame(FrameKind::NonVerse, vec![scripture_ref.clone()], &texts, state);
    }

    fn end_non_verse_text(
        &mut self,
        _context: &ScriptureRefContext,
        _state: &UsfmParserState,
        _scripture_ref: &ScriptureRef,
    ) {
        self.pop_frame(FrameKind::NonVerse);
    }

    fn start_note_text(
        &mut self,
        _context: &ScriptureRefContext,
        _state: &UsfmParserState,
        _scripture_ref: &ScriptureRef,
    ) {
        if self.frames.last().is_some_and(|f| f.kind == FrameKind::Embed) {
            self.flush_pending();
        }
    }

    fn start_embed(
        &mut self,
        _context: &ScriptureRefContext,
        state: &UsfmParserState,
        scripture_ref: &ScriptureRef,
    ) {
        let texts = self.advance_rows(slice::from_ref(scripture_ref));
        self.push_frame(FrameKind::Embed, vec![scripture_ref.clone()], &texts, state);
        if self.embed.is_none() {
            self.embed = Some(Vec::new());
        }
    }

    fn end_embed(
        &mut self,
        _context: &ScriptureRefContext,
        _state: &UsfmParserState,
        _marker: &str,
        _attributes: &[UsfmAttribute],
        _closed: bool,
    ) {
        self.pop_frame(FrameKind::Embed);
        self.finish_embed();
    }

    fn on_event(
        &mut self,
        context: &ScriptureRefContext,
        state: &UsfmParserState,
        event: &UsfmEvent<'_>,
    ) {
        match *event {
            UsfmEvent::StartBook { .. } => {
                self.collect(state, false);
                if let Some(id_text) = &self.config.id_text {
                    self.frames.push(Frame {
                        kind: FrameKind::Id,
                        refs: Vec::new(),
                        use_new: true,
                        pending: Some(format!("- {id_text}")),
                    });
                    self.flush_pending();
                }
            }
            UsfmEvent::EndBook { .. } => self.pop_frame(FrameKind::Id),
            UsfmEvent::Text { .. } | UsfmEvent::OptBreak | UsfmEvent::Ref { .. } => {
                let removed = self.config.strip_all_text || self.replacing(context);
                self.collect(state, removed);
            }
            UsfmEvent::StartChar { marker, .. } => {
                let removed = !is_embed_style(marker) && self.replacing(context);
                self.skipped_styles.push(removed);
                self.collect(state, removed);
            }
            UsfmEvent::EndChar { closed, .. } => {
                let removed = self.skipped_styles.pop().unwrap_or(false);
                if closed {
                    self.collect(state, removed);
                }
            }
            UsfmEvent::Unmatched { .. } => {
                let removed = self.replacing(context);
                self.collect(state, removed);
            }
            UsfmEvent::EndNote { closed, .. } => {
                let pending = self
                    .frames
                    .last_mut()
                    .filter(|f| f.kind == FrameKind::Embed)
                    .and_then(|f| f.pending.take());
                if let Some(text) = pending {
                    self.emit(UsfmToken::new_marker(UsfmTokenType::Character, "ft"), false);
                    self.emit(UsfmToken::new_text(text), false);
                }
                self.trim_note_text();
                if closed {
                    self.collect(state, false);
                }
            }
            UsfmEvent::EndSidebar { closed, .. } => {
                if closed {
                    self.collect(state, false);
                }
            }
            UsfmEvent::Chapter { .. }
            | UsfmEvent::Verse { .. }
            | UsfmEvent::StartPara { .. }
            | UsfmEvent::StartNote { .. }
            | UsfmEvent::StartRow { .. }
            | UsfmEvent::StartCell { .. }
            | UsfmEvent::StartSidebar { .. }
            | UsfmEvent::Milestone { .. } => self.collect(state, false),
            UsfmEvent::EndUsfm => {
                self.collect_to(state, state.tokens().len(), false);
                self.frames.clear();
                self.finish_embed();
                self.finish_block();
            }
            _ => {}
        }
    }
}

/// Index of the first token that can belong to a segment starting at the
/// current event.
fn segment_start(state: &UsfmParserState) -> usize {
    let (Some(index), Some(token)) = (state.index(), state.token()) else {
        return state.tokens().len();
    };
    let after = index + state.special_token_count() + 1;
    match token.token_type {
        UsfmTokenType::Text => index,
        UsfmTokenType::Verse | UsfmTokenType::Note => after,
        UsfmTokenType::Paragraph | UsfmTokenType::Character | UsfmTokenType::Unknown => {
            // The segment is opened by this token only if it is now on top
            // of the stack. Otherwise the token is closing an earlier one.
            let opened = state
                .peek()
                .zip(token.nestless_marker())
                .is_some_and(|(top, marker)| marker.starts_with(top.marker().trim_start_matches('+')));
            if opened { after } else { index }
        }
        _ => index,
    }
}

/// Whether the source already has text where a segment of `kind` begins.
fn has_existing_text(kind: FrameKind, state: &UsfmParserState) -> bool {
    let tokens = state.tokens();
    let start = segment_start(state).min(tokens.len());
    let stylesheet = state.stylesheet();
    let mut in_embed = false;
    let mut in_note_text = false;

    for token in &tokens[start..] {
        let marker = token.nestless_marker().unwrap_or_default();
        let is_text = token.token_type == UsfmTokenType::Text
            && token.text.as_deref().is_some_and(|t| !t.trim().is_empty());
        match kind {
            FrameKind::Verse | FrameKind::NonVerse => match token.token_type {
                UsfmTokenType::Verse | UsfmTokenType::Chapter | UsfmTokenType::Book => break,
                UsfmTokenType::Paragraph
                    if kind == FrameKind::NonVerse
                        || !stylesheet.get_tag(marker).is_verse_text_type() =>
                {
                    break;
                }
                UsfmTokenType::Character if kind == FrameKind::NonVerse && is_cell(marker) => {
                    break;
                }
                UsfmTokenType::Note => in_embed = true,
                UsfmTokenType::Character if is_embed_style(marker) => in_embed = true,
                UsfmTokenType::End if is_embed_style(marker.trim_end_matches('*')) => {
                    in_embed = false;
                }
                _ if is_text && !in_embed => return true,
                _ => {}
            },
            FrameKind::Embed => match token.token_type {
                UsfmTokenType::End if is_embed_style(marker.trim_end_matches('*')) => break,
                UsfmTokenType::Note
                | UsfmTokenType::Verse
                | UsfmTokenType::Chapter
                | UsfmTokenType::Book
                | UsfmTokenType::Paragraph => break,
                UsfmTokenType::Character if !token.is_nested() => in_note_text = marker == "ft",
                _ if is_text && in_note_text => return true,
                _ => {}
            },
            FrameKind::Id => return is_text,
        }
    }
    false
}

/// Parser handler that rewrites text by scripture reference.
///
/// Feed it events with [`parse_usfm`] or a
/// [`UsfmParser`](crate::parser::UsfmParser), then read the result with
/// [`get_usfm`](Self::get_usfm).
pub struct UpdateUsfmParserHandler<'a> {
    inner: ScriptureRefUsfmParserHandler<UsfmUpdater<'a>>,
}

impl<'a> UpdateUsfmParserHandler<'a> {
    /// Creates an updater. `rows` must be sorted by reference.
    #[must_use]
    pub fn new(rows: Vec<UpdateUsfmRow>, config: UpdateUsfmConfig) -> Self {
        Self {
            inner: ScriptureRefUsfmParserHandler::new(UsfmUpdater {
                rows,
                config,
                row_index: 0,
                tokens: Vec::new(),
                cursor: 0,
                frames: Vec::new(),
                block: None,
                embed: None,
                note_text_at: None,
                skipped_styles: Vec::new(),
                block_handlers: Vec::new(),
            }),
        }
    }

    /// Adds a block handler. Handlers run in the order they are added.
    #[must_use]
    pub fn with_block_handler(mut self, handler: impl UsfmUpdateBlockHandler + 'a) -> Self {
        self.inner
            .hooks_mut()
            .block_handlers
            .push(Box::new(handler));
        self
    }

    /// The updated tokens.
    #[must_use]
    pub fn tokens(&self) -> &[UsfmToken] {
        &self.inner.hooks().tokens
    }

    /// The updated document, with any configured remarks added after the
    /// `\id` line.
    #[must_use]
    pub fn get_usfm(&self) -> String {
        let remarks = &self.inner.hooks().config.remarks;
        if remarks.is_empty() {
            return detokenize(self.tokens());
        }

        let mut tokens = self.tokens().to_vec();
        let mut at = tokens
            .iter()
            .position(|t| t.token_type == UsfmTokenType::Book)
            .map_or(0, |i| i + 1);
        while let Some(token) = tokens.get(at) {
            let header_para = token.token_type == UsfmTokenType::Paragraph
                && matches!(token.marker.as_deref(), Some("ide" | "rem"));
            if token.token_type != UsfmTokenType::Text && !header_para {
                break;
            }
            at += 1;
        }
        let inserted = remarks.iter().flat_map(|remark| {
            [
                UsfmToken::new_marker(UsfmTokenType::Paragraph, "rem"),
                UsfmToken::new_text(remark.clone()),
            ]
        });
        tokens.splice(at..at, inserted);
        detokenize(&tokens)
    }
}

impl UsfmParserHandler for UpdateUsfmParserHandler<'_> {
    fn handle_event(&mut self, state: &UsfmParserState, event: &UsfmEvent<'_>) {
        self.inner.handle_event(state, event);
    }
}

/// Rewrites `usfm` with `rows` using the default stylesheet and English
/// versification unless others are given.
#[must_use]
pub fn update_usfm(
    usfm: &str,
    rows: Vec<UpdateUsfmRow>,
    config: UpdateUsfmConfig,
    stylesheet: Option<Arc<UsfmStylesheet>>,
    versification: Option<Arc<Versification>>,
) -> String {
    let mut handler = UpdateUsfmParserHandler::new(rows, config);
    parse_usfm(usfm, &mut handler, stylesheet, versification);
    handler.get_usfm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::UsfmTokenizer;
    use crate::update::block::UsfmUpdateBlockElementType;

    fn row(reference: &str, text: &str) -> UpdateUsfmRow {
        let scripture_ref = ScriptureRef::parse(reference, Versification::english()).unwrap();
        UpdateUsfmRow::new(vec![scripture_ref], text)
    }

    fn update(usfm: &str, rows: Vec<UpdateUsfmRow>, config: UpdateUsfmConfig) -> String {
        update_usfm(usfm, rows, config, None, None)
    }

    #[test]
    fn replaces_verse_text() {
        let usfm = "\\id MAT - Test\n\\c 1\n\\p\n\\v 1 old one\n\\v 2 old two\n";
        let result = update(usfm, vec![row("MAT 1:1", "new one")], UpdateUsfmConfig::default());
        assert_eq!(
            result,
            "\\id MAT - Test\r\n\\c 1\r\n\\p\r\n\\v 1 new one\r\n\\v 2 old two\r\n"
        );
    }

    #[test]
    fn prefers_existing_text() {
        let usfm = "\\id MAT\n\\c 1\n\\p\n\\v 1 old\n\\v 2\n";
        let config = UpdateUsfmConfig::default().with_prefer_existing_text(true);
        let rows = vec![row("MAT 1:1", "new"), row("MAT 1:2", "filled")];
        let result = update(usfm, rows, config);
        assert!(result.contains("\\v 1 old\r\n"));
        assert!(result.contains("\\v 2 filled\r\n"));
    }

    #[test]
    fn strips_all_text() {
        let usfm = "\\id MAT - Test\n\\c 1\n\\s Head\n\\p\n\\v 1 a \\nd Lord\\nd* b\n";
        let config = UpdateUsfmConfig::default().with_strip_all_text(true);
        assert_eq!(
            update(usfm, Vec::new(), config),
            "\\id MAT\r\n\\c 1\r\n\\s\r\n\\p\r\n\\v 1\r\n"
        );
    }

    #[test]
    fn replaces_id_text() {
        let usfm = "\\id MAT - Old\n\\c 1\n\\p\n\\v 1 a\n";
        let config = UpdateUsfmConfig::default().with_id_text("New");
        assert_eq!(
            update(usfm, Vec::new(), config),
            "\\id MAT - New\r\n\\c 1\r\n\\p\r\n\\v 1 a\r\n"
        );
    }

    #[test]
    fn replaces_heading() {
        let usfm = "\\id MAT\n\\c 1\n\\s Old heading\n\\p\n\\v 1 a\n";
        let result = update(
            usfm,
            vec![row("MAT 1:0/1:s", "New heading")],
            UpdateUsfmConfig::default(),
        );
        assert_eq!(result, "\\id MAT\r\n\\c 1\r\n\\s New heading\r\n\\p\r\n\\v 1 a\r\n");
    }

    #[test]
    fn replaces_note_text_only() {
        let usfm = "\\id MAT\n\\c 1\n\\p\n\\v 1 a\\f + \\fr 1:1 \\ft old note\\f* b\n";
        let result = update(
            usfm,
            vec![row("MAT 1:1/1:f", "new note")],
            UpdateUsfmConfig::default(),
        );
        assert!(result.contains("\\v 1 a\\f + \\fr 1:1 \\ft new note\\f* b"), "{result}");
    }

    #[test]
    fn inserts_missing_note_text() {
        let usfm = "\\id MAT\n\\c 1\n\\p\n\\v 1 a\\f + \\fr 1:1\\f* b\n";
        let result = update(
            usfm,
            vec![row("MAT 1:1/1:f", "new note")],
            UpdateUsfmConfig::default(),
        );
        assert!(result.contains("\\ft new note\\f* b"), "{result}");
    }

    #[test]
    fn replaced_verse_keeps_notes() {
        let usfm = "\\id MAT\n\\c 1\n\\p\n\\v 1 a\\f + \\ft note\\f* b\n";
        let result = update(usfm, vec![row("MAT 1:1", "new")], UpdateUsfmConfig::default());
        assert!(result.contains("\\v 1 new \\f + \\ft note\\f*"), "{result}");
        assert!(!result.contains(" b"));
    }

    #[test]
    fn no_rows_reproduces_tokens() {
        let usfm = "\\id MAT - Test\n\\c 1\n\\s Head\n\\p\n\\v 1 a \\nd Lord\\nd* b\\f + \\fr 1:1 \\ft note\\f*\n\
                    \\tr \\tc1 x \\tc2 y\n\\q1\n\\v 2 \\qt-s |who=\"Jesus\"\\*c\\qt-e\\*\n";
        let expected = detokenize(&UsfmTokenizer::default().tokenize(usfm));
        assert_eq!(update(usfm, Vec::new(), UpdateUsfmConfig::default()), expected);
    }

    #[test]
    fn adds_remarks_after_id() {
        let usfm = "\\id MAT - Test\n\\c 1\n\\p\n\\v 1 a\n";
        let config = UpdateUsfmConfig::default().with_remark("Updated");
        assert_eq!(
            update(usfm, Vec::new(), config),
            "\\id MAT - Test\r\n\\rem Updated\r\n\\c 1\r\n\\p\r\n\\v 1 a\r\n"
        );
    }

    struct Shout {
        refs: Vec<String>,
    }

    impl UsfmUpdateBlockHandler for Shout {
        fn process_block(&mut self, mut block: UsfmUpdateBlock) -> UsfmUpdateBlock {
            self.refs
                .extend(block.refs.iter().map(ToString::to_string));
            for element in block.text_elements_mut() {
                for token in &mut element.tokens {
                    token.text = token.text.as_deref().map(str::to_uppercase);
                }
            }
            block
        }
    }

    #[test]
    fn block_handlers_see_each_segment() {
        let usfm = "\\id MAT\n\\c 1\n\\s Head\n\\p\n\\v 1 one\\f + \\ft note\\f*\n\\v 2 two\n";
        let mut shout = Shout { refs: Vec::new() };
        let mut handler = UpdateUsfmParserHandler::new(Vec::new(), UpdateUsfmConfig::default())
            .with_block_handler(&mut shout);
        parse_usfm(usfm, &mut handler, None, None);
        let result = handler.get_usfm();
        assert!(result.contains("\\s HEAD\r\n"));
        assert!(result.contains("\\v 1 ONE\\f + \\ft note\\f*"), "{result}");
        drop(handler);
        assert_eq!(shout.refs, vec!["MAT 1:0/1:s", "MAT 1:1", "MAT 1:2"]);
    }

    #[test]
    fn embeds_are_single_elements() {
        struct Kinds(Vec<UsfmUpdateBlockElementType>);
        impl UsfmUpdateBlockHandler for Kinds {
            fn process_block(&mut self, block: UsfmUpdateBlock) -> UsfmUpdateBlock {
                self.0.extend(block.elements.iter().map(|e| e.element_type));
                block
            }
        }

        let mut kinds = Kinds(Vec::new());
        let mut handler = UpdateUsfmParserHandler::new(Vec::new(), UpdateUsfmConfig::default())
            .with_block_handler(&mut kinds);
        parse_usfm("\\id MAT\n\\c 1\n\\p\n\\v 1 a\\f + \\ft n\\f* b\n", &mut handler, None, None);
        drop(handler);
        assert_eq!(
            kinds.0,
            vec![
                UsfmUpdateBlockElementType::Text,
                UsfmUpdateBlockElementType::Embed,
                UsfmUpdateBlockElementType::Text,
            ]
        );
    }
}
