//! Locates candidate quotation marks in text segments.

use std::sync::LazyLock;

use regex::Regex;

use crate::registry::QuoteConventionSet;
use crate::string_match::QuotationMarkStringMatch;
use crate::text_segment::TextSegment;

/// Every glyph any convention might use as a quotation mark.
static QUOTATION_MARK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("<<|>>|[<>\"'\u{2018}-\u{201F}\u{00AB}\u{00BB}\u{2039}\u{203A}\u{300C}-\u{300F}]")
        .expect("quotation mark pattern is valid")
});

/// Finds marks that belong to at least one convention of a set.
#[derive(Debug, Clone, Copy)]
pub struct QuotationMarkFinder<'s> {
    conventions: &'s QuoteConventionSet,
}

impl<'s> QuotationMarkFinder<'s> {
    /// Creates a finder for a set of conventions.
    #[must_use]
    pub fn new(conventions: &'s QuoteConventionSet) -> Self {
        Self { conventions }
    }

    /// All candidate marks in one segment.
    #[must_use]
    pub fn find_in_segment<'a>(
        &self,
        segment: &'a TextSegment,
        segment_index: usize,
    ) -> Vec<QuotationMarkStringMatch<'a>> {
        QUOTATION_MARK_REGEX
            .find_iter(segment.text())
            .filter(|m| self.conventions.is_quotation_mark(m.as_str()))
            .map(|m| QuotationMarkStringMatch::new(segment, segment_index, m.start(), m.end()))
            .collect()
    }

    /// All candidate marks in the segments, in document order.
    #[must_use]
    pub fn find_all_potential_quotation_marks<'a>(
        &self,
        segments: &'a [TextSegment],
    ) -> Vec<QuotationMarkStringMatch<'a>> {
        segments
            .iter()
            .enumerate()
            .flat_map(|(i, segment)| self.find_in_segment(segment, i))
            .collect()
    }
}
