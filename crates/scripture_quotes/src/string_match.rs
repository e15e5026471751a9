//! A candidate quotation mark found in a text segment, with queries over the
//! characters around it.

use crate::text_segment::{TextSegment, UsfmMarkerType};

/// Characters that commonly introduce a quotation.
const QUOTE_INTRODUCERS: [char; 5] = [':', ',', '(', '[', '{'];

/// Characters that make up quotation marks.
const QUOTATION_MARK_CHARS: &str =
    "\"'<>\u{2018}\u{2019}\u{201A}\u{201B}\u{201C}\u{201D}\u{201E}\u{201F}\u{00AB}\u{00BB}\u{2039}\u{203A}";

pub(crate) fn is_punctuation(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace()
}

/// A potential quotation mark at a byte range of a segment.
#[derive(Debug, Clone, Copy)]
pub struct QuotationMarkStringMatch<'a> {
    segment: &'a TextSegment,
    segment_index: usize,
    start: usize,
    end: usize,
}

impl<'a> QuotationMarkStringMatch<'a> {
    /// Creates a match over `segment.text()[start..end]`.
    #[must_use]
    pub fn new(segment: &'a TextSegment, segment_index: usize, start: usize, end: usize) -> Self {
        Self {
            segment,
            segment_index,
            start,
            end,
        }
    }

    /// The matched mark.
    #[must_use]
    pub fn quotation_mark(&self) -> &'a str {
        self.segment.text().get(self.start..self.end).unwrap_or_default()
    }

    /// The segment the mark is in.
    #[must_use]
    pub fn segment(&self) -> &'a TextSegment {
        self.segment
    }

    /// Index of the segment in the slice it was found in.
    #[must_use]
    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    /// Start byte offset.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// End byte offset.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Character before the mark within the segment.
    #[must_use]
    pub fn previous_character(&self) -> Option<char> {
        self.segment.substring_before(self.start).chars().next_back()
    }

    /// Character after the mark within the segment.
    #[must_use]
    pub fn next_character(&self) -> Option<char> {
        self.segment.substring_after(self.end).chars().next()
    }

    /// True when the mark begins the segment.
    #[must_use]
    pub fn is_at_start_of_segment(&self) -> bool {
        self.start == 0
    }

    /// True when the mark ends the segment.
    #[must_use]
    pub fn is_at_end_of_segment(&self) -> bool {
        self.end >= self.segment.len()
    }

    /// Whitespace before the mark. A mark at the start of a segment that
    /// follows a paragraph, verse, chapter or embed counts as preceded by
    /// whitespace.
    #[must_use]
    pub fn has_leading_whitespace(&self) -> bool {
        match self.previous_character() {
            Some(c) => c.is_whitespace(),
            None => matches!(
                self.segment.immediate_preceding_marker(),
                UsfmMarkerType::Paragraph
                    | UsfmMarkerType::Verse
                    | UsfmMarkerType::Chapter
                    | UsfmMarkerType::Embed
            ),
        }
    }

    /// Whitespace after the mark.
    #[must_use]
    pub fn has_trailing_whitespace(&self) -> bool {
        self.next_character().is_some_and(char::is_whitespace)
    }

    /// Punctuation before the mark.
    #[must_use]
    pub fn has_leading_punctuation(&self) -> bool {
        self.previous_character().is_some_and(is_punctuation)
    }

    /// Punctuation after the mark.
    #[must_use]
    pub fn has_trailing_punctuation(&self) -> bool {
        self.next_character().is_some_and(is_punctuation)
    }

    /// Another quotation-mark character directly after the mark.
    #[must_use]
    pub fn has_trailing_quotation_mark(&self) -> bool {
        self.next_character()
            .is_some_and(|c| QUOTATION_MARK_CHARS.contains(c))
    }

    /// A letter directly before the mark.
    #[must_use]
    pub fn has_leading_letter(&self) -> bool {
        self.previous_character().is_some_and(char::is_alphanumeric)
    }

    /// A letter directly after the mark.
    #[must_use]
    pub fn has_trailing_letter(&self) -> bool {
        self.next_character().is_some_and(char::is_alphanumeric)
    }

    /// The text before the mark ends, ignoring whitespace, with a character
    /// that introduces quotations.
    #[must_use]
    pub fn has_quote_introducer_in_leading_substring(&self) -> bool {
        self.segment
            .substring_before(self.start)
            .trim_end()
            .chars()
            .next_back()
            .is_some_and(|c| QUOTE_INTRODUCERS.contains(&c))
    }

    /// Only whitespace separates the mark from `other`, which ends before
    /// it in the same segment.
    #[must_use]
    pub fn immediately_follows(&self, other: &QuotationMarkStringMatch<'_>) -> bool {
        self.segment_index == other.segment_index
            && other.end <= self.start
            && self
                .segment
                .text()
                .get(other.end..self.start)
                .is_some_and(|between| between.trim().is_empty())
    }

    /// The mark starts its paragraph, possibly after a verse number, other
    /// quotation marks and whitespace.
    #[must_use]
    pub fn is_at_start_of_paragraph(&self) -> bool {
        self.segment
            .marker_is_in_preceding_context(UsfmMarkerType::Paragraph)
            && self
                .segment
                .substring_before(self.start)
                .chars()
                .all(|c| c.is_whitespace() || QUOTATION_MARK_CHARS.contains(c))
    }
}
