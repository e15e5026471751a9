//! Runs of text between markers, with the markup context they sit in.

use std::collections::BTreeSet;

/// The kind of marker that precedes a text segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum UsfmMarkerType {
    /// Paragraph marker such as `\p` or `\q1`.
    Paragraph,
    /// Character style marker or its end.
    Character,
    /// `\v`.
    Verse,
    /// `\c`.
    Chapter,
    /// A note or figure.
    Embed,
    /// Any other marker.
    Other,
    /// No marker: the segment continues the previous one.
    #[default]
    NoMarker,
}

/// A run of text from one text token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextSegment {
    text: String,
    immediate_preceding_marker: UsfmMarkerType,
    markers_in_preceding_context: BTreeSet<UsfmMarkerType>,
    index_in_verse: usize,
    num_segments_in_verse: usize,
}

impl TextSegment {
    /// Creates a segment with no marker context.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            num_segments_in_verse: 1,
            ..Self::default()
        }
    }

    /// Sets the marker directly before the text and records it in the
    /// preceding context.
    #[must_use]
    pub fn with_preceding_marker(mut self, marker: UsfmMarkerType) -> Self {
        self.immediate_preceding_marker = marker;
        self.markers_in_preceding_context.insert(marker);
        self
    }

    /// Adds markers seen since the previous segment.
    #[must_use]
    pub fn with_preceding_context(
        mut self,
        markers: impl IntoIterator<Item = UsfmMarkerType>,
    ) -> Self {
        self.markers_in_preceding_context.extend(markers);
        self
    }

    /// Sets the position of the segment within its verse.
    #[must_use]
    pub fn with_index_in_verse(mut self, index: usize, count: usize) -> Self {
        self.index_in_verse = index;
        self.num_segments_in_verse = count;
        self
    }

    pub(crate) fn set_index_in_verse(&mut self, index: usize, count: usize) {
        self.index_in_verse = index;
        self.num_segments_in_verse = count;
    }

    /// The text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the segment, returning its text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True for an empty segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Marker directly before the text.
    #[must_use]
    pub fn immediate_preceding_marker(&self) -> UsfmMarkerType {
        self.immediate_preceding_marker
    }

    /// True when `marker` occurred between the previous segment and this
    /// one.
    #[must_use]
    pub fn marker_is_in_preceding_context(&self, marker: UsfmMarkerType) -> bool {
        self.markers_in_preceding_context.contains(&marker)
    }

    /// 0-based index within the verse.
    #[must_use]
    pub fn index_in_verse(&self) -> usize {
        self.index_in_verse
    }

    /// True for the first segment of its verse.
    #[must_use]
    pub fn is_first_segment_in_verse(&self) -> bool {
        self.index_in_verse == 0
    }

    /// True for the last segment of its verse.
    #[must_use]
    pub fn is_last_segment_in_verse(&self) -> bool {
        self.index_in_verse + 1 >= self.num_segments_in_verse
    }

    /// Text before byte offset `index`.
    #[must_use]
    pub fn substring_before(&self, index: usize) -> &str {
        self.text.get(..index).unwrap_or_default()
    }

    /// Text from byte offset `index`.
    #[must_use]
    pub fn substring_after(&self, index: usize) -> &str {
        self.text.get(index..).unwrap_or_default()
    }

    /// Replaces the bytes in `start..end`. Ranges that do not fall on
    /// character boundaries are ignored.
    pub fn replace_substring(&mut self, start: usize, end: usize, replacement: &str) {
        if start <= end && self.text.is_char_boundary(start) && self.text.is_char_boundary(end)
            && end <= self.text.len()
        {
            self.text.replace_range(start..end, replacement);
        }
    }
}
