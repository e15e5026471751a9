//! What a resolver needs to know about the conventions in play.

use std::collections::BTreeSet;

use crate::convention::{QuotationMarkDirection, QuoteConvention};
use crate::registry::QuoteConventionSet;
use crate::string_match::QuotationMarkStringMatch;

/// Deepest nesting considered while detecting a convention.
const DETECTION_MAX_DEPTH: usize = 4;

/// Questions a resolver asks about candidate marks.
pub trait QuotationMarkResolutionSettings {
    /// The mark can open a quotation.
    fn is_valid_opening_quotation_mark(&self, string_match: &QuotationMarkStringMatch<'_>) -> bool;

    /// The mark can close a quotation.
    fn is_valid_closing_quotation_mark(&self, string_match: &QuotationMarkStringMatch<'_>) -> bool;

    /// `closing` ends a quotation that `opening` began.
    fn marks_are_a_valid_pair(&self, opening: &str, closing: &str) -> bool;

    /// Depths at which `mark` is used in `direction`.
    fn possible_depths(&self, mark: &str, direction: QuotationMarkDirection) -> BTreeSet<usize>;

    /// Deepest nesting allowed before reporting an issue.
    fn max_depth(&self) -> usize;

    /// Paragraph starts may repeat the open marks as continuers.
    fn should_rely_on_paragraph_markers(&self) -> bool;

    /// The mark can be read in both directions.
    fn is_ambiguous(&self, string_match: &QuotationMarkStringMatch<'_>) -> bool {
        self.is_valid_opening_quotation_mark(string_match)
            && self.is_valid_closing_quotation_mark(string_match)
    }
}

/// Resolution against every convention of a set, used while the
/// convention is still unknown.
#[derive(Debug, Clone, Copy)]
pub struct QuoteConventionDetectionResolutionSettings<'s> {
    conventions: &'s QuoteConventionSet,
}

impl<'s> QuoteConventionDetectionResolutionSettings<'s> {
    /// Settings over a set.
    #[must_use]
    pub fn new(conventions: &'s QuoteConventionSet) -> Self {
        Self { conventions }
    }
}

impl QuotationMarkResolutionSettings for QuoteConventionDetectionResolutionSettings<'_> {
    fn is_valid_opening_quotation_mark(&self, string_match: &QuotationMarkStringMatch<'_>) -> bool {
        self.conventions
            .is_valid_opening_quotation_mark(string_match.quotation_mark())
    }

    fn is_valid_closing_quotation_mark(&self, string_match: &QuotationMarkStringMatch<'_>) -> bool {
        self.conventions
            .is_valid_closing_quotation_mark(string_match.quotation_mark())
    }

    fn marks_are_a_valid_pair(&self, opening: &str, closing: &str) -> bool {
        self.conventions.marks_are_a_valid_pair(opening, closing)
    }

    fn possible_depths(&self, mark: &str, direction: QuotationMarkDirection) -> BTreeSet<usize> {
        self.conventions.possible_depths(mark, direction)
    }

    fn max_depth(&self) -> usize {
        DETECTION_MAX_DEPTH
    }

    fn should_rely_on_paragraph_markers(&self) -> bool {
        true
    }
}

/// Resolution against the one convention a text is known to use.
#[derive(Debug, Clone)]
pub struct QuotationMarkUpdateResolutionSettings {
    source: QuoteConvention,
}

impl QuotationMarkUpdateResolutionSettings {
    /// Settings for text written in `source`.
    #[must_use]
    pub fn new(source: QuoteConvention) -> Self {
        Self { source }
    }

    /// The source convention.
    #[must_use]
    pub fn source(&self) -> &QuoteConvention {
        &self.source
    }

    fn uses(&self, mark: &str, direction: QuotationMarkDirection) -> bool {
        self.source.marks(direction).contains(mark)
    }
}

impl QuotationMarkResolutionSettings for QuotationMarkUpdateResolutionSettings {
    fn is_valid_opening_quotation_mark(&self, string_match: &QuotationMarkStringMatch<'_>) -> bool {
        self.uses(string_match.quotation_mark(), QuotationMarkDirection::Opening)
    }

    fn is_valid_closing_quotation_mark(&self, string_match: &QuotationMarkStringMatch<'_>) -> bool {
        self.uses(string_match.quotation_mark(), QuotationMarkDirection::Closing)
    }

    fn marks_are_a_valid_pair(&self, opening: &str, closing: &str) -> bool {
        self.source
            .levels()
            .iter()
            .any(|level| level.opening() == opening && level.closing() == closing)
    }

    fn possible_depths(&self, mark: &str, direction: QuotationMarkDirection) -> BTreeSet<usize> {
        self.source.depths_of(mark, direction).into_iter().collect()
    }

    fn max_depth(&self) -> usize {
        self.source.num_levels()
    }

    fn should_rely_on_paragraph_markers(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_segment::TextSegment;

    #[test]
    fn update_settings_follow_the_source() {
        let settings = QuotationMarkUpdateResolutionSettings::new(
            QuoteConventionSet::standard()
                .get_by_name("typewriter_english")
                .cloned()
                .unwrap_or_else(|| QuoteConvention::new("empty", Vec::new())),
        );
        let segment = TextSegment::new("\"");
        let string_match = QuotationMarkStringMatch::new(&segment, 0, 0, 1);
        assert!(settings.is_ambiguous(&string_match));
        assert!(settings.marks_are_a_valid_pair("'", "'"));
        assert!(!settings.marks_are_a_valid_pair("\"", "'"));
        assert_eq!(
            settings.possible_depths("'", QuotationMarkDirection::Opening),
            BTreeSet::from([2, 4])
        );
        assert_eq!(settings.max_depth(), 4);
    }

    #[test]
    fn detection_settings_cover_the_set() {
        let settings = QuoteConventionDetectionResolutionSettings::new(QuoteConventionSet::standard());
        let segment = TextSegment::new("\u{00AB}");
        let string_match = QuotationMarkStringMatch::new(&segment, 0, 0, 2);
        assert!(settings.is_valid_opening_quotation_mark(&string_match));
        assert!(settings.is_valid_closing_quotation_mark(&string_match));
        assert_eq!(settings.max_depth(), 4);
    }
}
