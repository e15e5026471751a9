//! Resolved quotation marks and the issues found while resolving them.

use std::fmt;

use crate::convention::{QuotationMarkDirection, QuoteConvention};
use crate::string_match::QuotationMarkStringMatch;
use crate::text_segment::TextSegment;

/// A quotation mark whose direction and depth are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotationMarkMetadata {
    /// The mark as found.
    pub quotation_mark: String,
    /// 1-based nesting depth.
    pub depth: usize,
    /// Opening or closing.
    pub direction: QuotationMarkDirection,
    /// Index of the segment the mark is in.
    pub segment_index: usize,
    /// Start byte offset in the segment.
    pub start: usize,
    /// End byte offset in the segment.
    pub end: usize,
}

impl QuotationMarkMetadata {
    /// Metadata for a match.
    #[must_use]
    pub fn from_match(
        string_match: &QuotationMarkStringMatch<'_>,
        depth: usize,
        direction: QuotationMarkDirection,
    ) -> Self {
        Self {
            quotation_mark: string_match.quotation_mark().to_string(),
            depth,
            direction,
            segment_index: string_match.segment_index(),
            start: string_match.start(),
            end: string_match.end(),
        }
    }

    /// The mark `convention` uses for this depth and direction.
    #[must_use]
    pub fn target_mark<'c>(&self, convention: &'c QuoteConvention) -> Option<&'c str> {
        convention.expected_mark(self.depth, self.direction)
    }
}

/// Rewrites each resolved mark to the mark `target` uses for its depth and
/// direction. Marks deeper than `target` declares are left alone.
pub fn apply_quotation_mark_updates(
    segments: &mut [TextSegment],
    metadata: &[QuotationMarkMetadata],
    target: &QuoteConvention,
) {
    let mut ordered: Vec<&QuotationMarkMetadata> = metadata.iter().collect();
    ordered.sort_by(|a, b| (b.segment_index, b.start).cmp(&(a.segment_index, a.start)));
    for mark in ordered {
        let Some(replacement) = mark.target_mark(target) else {
            continue;
        };
        if replacement == mark.quotation_mark {
            continue;
        }
        if let Some(segment) = segments.get_mut(mark.segment_index) {
            segment.replace_substring(mark.start, mark.end, replacement);
        }
    }
}

/// A problem that makes full resolution of a chapter unreliable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuotationMarkResolutionIssue {
    /// A mark has no partner.
    UnpairedQuotationMark,
    /// A mark could open or close and its context does not say which.
    AmbiguousQuotationMark,
    /// Quotations nest deeper than the convention declares.
    TooDeepNesting,
}

impl QuotationMarkResolutionIssue {
    /// Upper-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnpairedQuotationMark => "UNPAIRED_QUOTATION_MARK",
            Self::AmbiguousQuotationMark => "AMBIGUOUS_QUOTATION_MARK",
            Self::TooDeepNesting => "TOO_DEEP_NESTING",
        }
    }
}

impl fmt::Display for QuotationMarkResolutionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
