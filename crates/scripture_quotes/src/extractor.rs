//! Collects the verse text of a USFM document into chapters, verses and
//! text segments.

use std::collections::BTreeSet;

use scripture_usfm::{UsfmAttribute, UsfmParserHandler, UsfmParserState};

use crate::text_segment::{TextSegment, UsfmMarkerType};

/// The text segments of one verse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verse {
    text_segments: Vec<TextSegment>,
}

impl Verse {
    /// Segments in document order.
    #[must_use]
    pub fn text_segments(&self) -> &[TextSegment] {
        &self.text_segments
    }
}

/// The verses of one chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chapter {
    number: u32,
    verses: Vec<Verse>,
}

impl Chapter {
    /// Chapter number.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Verses in document order. Text before the first verse forms a verse
    /// of its own.
    #[must_use]
    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    /// Every segment of the chapter in document order.
    #[must_use]
    pub fn text_segments(&self) -> Vec<TextSegment> {
        self.verses
            .iter()
            .flat_map(|v| v.text_segments.iter().cloned())
            .collect()
    }
}

/// Parser handler that records verse text with its marker context.
///
/// Note text, headings and anything before the first chapter are skipped.
#[derive(Debug, Clone, Default)]
pub struct UsfmStructureExtractor {
    chapters: Vec<Chapter>,
    next_marker: UsfmMarkerType,
    context: BTreeSet<UsfmMarkerType>,
}

impl UsfmStructureExtractor {
    /// Creates an empty extractor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chapters seen so far.
    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    fn note_marker(&mut self, marker: UsfmMarkerType) {
        self.next_marker = marker;
        self.context.insert(marker);
    }
}

impl UsfmParserHandler for UsfmStructureExtractor {
    fn chapter(
        &mut self,
        state: &UsfmParserState,
        _number: &str,
        _marker: &str,
        _alt_number: Option<&str>,
        _pub_number: Option<&str>,
    ) {
        self.chapters.push(Chapter {
            number: state.verse_ref().chapter_num(),
            verses: Vec::new(),
        });
        self.note_marker(UsfmMarkerType::Chapter);
    }

    fn verse(
        &mut self,
        _state: &UsfmParserState,
        _number: &str,
        _marker: &str,
        _alt_number: Option<&str>,
        _pub_number: Option<&str>,
    ) {
        if let Some(chapter) = self.chapters.last_mut() {
            chapter.verses.push(Verse::default());
        }
        self.note_marker(UsfmMarkerType::Verse);
    }

    fn start_para(
        &mut self,
        _state: &UsfmParserState,
        _marker: &str,
        _unknown: bool,
        _attributes: &[UsfmAttribute],
    ) {
        self.note_marker(UsfmMarkerType::Paragraph);
    }

    fn start_char(
        &mut self,
        _state: &UsfmParserState,
        _marker: &str,
        _unknown: bool,
        _attributes: &[UsfmAttribute],
    ) {
        self.note_marker(UsfmMarkerType::Character);
    }

    fn end_char(
        &mut self,
        _state: &UsfmParserState,
        _marker: &str,
        _attributes: &[UsfmAttribute],
        _closed: bool,
    ) {
        self.note_marker(UsfmMarkerType::Character);
    }

    fn start_note(
        &mut self,
        _state: &UsfmParserState,
        _marker: &str,
        _caller: &str,
        _category: Option<&str>,
    ) {
        self.note_marker(UsfmMarkerType::Embed);
    }

    fn end_note(&mut self, _state: &UsfmParserState, _marker: &str, _closed: bool) {
        self.note_marker(UsfmMarkerType::Embed);
    }

    fn milestone(
        &mut self,
        _state: &UsfmParserState,
        _marker: &str,
        _start: bool,
        _attributes: &[UsfmAttribute],
    ) {
        self.note_marker(UsfmMarkerType::Other);
    }

    fn text(&mut self, state: &UsfmParserState, text: &str) {
        if text.is_empty() || !state.is_verse_text() {
            return;
        }
        let Some(chapter) = self.chapters.last_mut() else {
            return;
        };
        if chapter.verses.is_empty() {
            chapter.verses.push(Verse::default());
        }
        let segment = TextSegment::new(text)
            .with_preceding_marker(self.next_marker)
            .with_preceding_context(std::mem::take(&mut self.context));
        if let Some(verse) = chapter.verses.last_mut() {
            verse.text_segments.push(segment);
        }
        self.next_marker = UsfmMarkerType::NoMarker;
    }

    fn end_usfm(&mut self, _state: &UsfmParserState) {
        for verse in self.chapters.iter_mut().flat_map(|c| c.verses.iter_mut()) {
            let count = verse.text_segments.len();
            for (index, segment) in verse.text_segments.iter_mut().enumerate() {
                segment.set_index_in_verse(index, count);
            }
        }
    }
}
