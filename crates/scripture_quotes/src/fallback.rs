//! A context-only resolver for text whose nesting cannot be trusted.
//!
//! Each mark gets a direction from its own surroundings and the depth of
//! the first level that uses it, so a rewrite through the result is a
//! glyph-for-glyph substitution.

use std::collections::BTreeSet;

use crate::convention::QuotationMarkDirection;
use crate::metadata::{QuotationMarkMetadata, QuotationMarkResolutionIssue};
use crate::settings::QuotationMarkResolutionSettings;
use crate::string_match::QuotationMarkStringMatch;

const APOSTROPHES: [&str; 2] = ["'", "\u{2019}"];

#[derive(Debug, Clone, Copy)]
struct LastMark {
    segment_index: usize,
    end: usize,
    direction: QuotationMarkDirection,
}

/// Resolves marks one at a time from their surroundings.
#[derive(Debug, Clone)]
pub struct FallbackQuotationMarkResolver<S> {
    settings: S,
    last_mark: Option<LastMark>,
    open_count: usize,
    issues: BTreeSet<QuotationMarkResolutionIssue>,
}

impl<S: QuotationMarkResolutionSettings> FallbackQuotationMarkResolver<S> {
    /// Creates a resolver.
    #[must_use]
    pub fn new(settings: S) -> Self {
        Self {
            settings,
            last_mark: None,
            open_count: 0,
            issues: BTreeSet::new(),
        }
    }

    /// Forgets everything seen so far.
    pub fn reset(&mut self) {
        self.last_mark = None;
        self.open_count = 0;
        self.issues.clear();
    }

    /// Issues so far. Quotations still open count as unpaired.
    #[must_use]
    pub fn issues(&self) -> BTreeSet<QuotationMarkResolutionIssue> {
        let mut issues = self.issues.clone();
        if self.open_count > 0 {
            issues.insert(QuotationMarkResolutionIssue::UnpairedQuotationMark);
        }
        issues
    }

    /// Resolves matches in document order.
    pub fn resolve_quotation_marks(
        &mut self,
        matches: &[QuotationMarkStringMatch<'_>],
    ) -> Vec<QuotationMarkMetadata> {
        self.last_mark = None;
        let mut resolved = Vec::new();
        for string_match in matches {
            let mark = string_match.quotation_mark();
            if APOSTROPHES.contains(&mark)
                && string_match.has_leading_letter()
                && string_match.has_trailing_letter()
            {
                continue;
            }
            let Some(direction) = self.direction_of(string_match) else {
                continue;
            };
            let Some(depth) = self
                .settings
                .possible_depths(mark, direction)
                .first()
                .copied()
            else {
                continue;
            };
            match direction {
                QuotationMarkDirection::Opening => self.open_count += 1,
                QuotationMarkDirection::Closing if self.open_count == 0 => {
                    self.issues
                        .insert(QuotationMarkResolutionIssue::UnpairedQuotationMark);
                }
                QuotationMarkDirection::Closing => self.open_count -= 1,
            }
            self.last_mark = Some(LastMark {
                segment_index: string_match.segment_index(),
                end: string_match.end(),
                direction,
            });
            resolved.push(QuotationMarkMetadata::from_match(string_match, depth, direction));
        }
        resolved
    }

    fn direction_of(&mut self, string_match: &QuotationMarkStringMatch<'_>) -> Option<QuotationMarkDirection> {
        let can_open = self.settings.is_valid_opening_quotation_mark(string_match);
        let can_close = self.settings.is_valid_closing_quotation_mark(string_match);
        match (can_open, can_close) {
            (false, false) => return None,
            (true, false) => return Some(QuotationMarkDirection::Opening),
            (false, true) => return Some(QuotationMarkDirection::Closing),
            (true, true) => {}
        }

        let after_break = string_match.is_at_start_of_segment()
            || string_match.has_leading_whitespace()
            || string_match.has_quote_introducer_in_leading_substring();
        if after_break && string_match.has_trailing_letter() {
            return Some(QuotationMarkDirection::Opening);
        }

        let before_break = string_match.is_at_end_of_segment()
            || string_match.has_trailing_whitespace()
            || string_match.has_trailing_punctuation();
        if before_break && (string_match.has_leading_letter() || string_match.has_leading_punctuation())
        {
            return Some(QuotationMarkDirection::Closing);
        }

        if let Some(last) = self.last_mark {
            let adjacent = last.segment_index == string_match.segment_index()
                && string_match
                    .segment()
                    .text()
                    .get(last.end..string_match.start())
                    .is_some_and(|between| between.trim().is_empty());
            if adjacent {
                return Some(last.direction);
            }
        }

        self.issues
            .insert(QuotationMarkResolutionIssue::AmbiguousQuotationMark);
        None
    }
}
