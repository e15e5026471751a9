//! Resolves candidate marks into opening and closing quotation marks with
//! nesting depths.
//!
//! The resolver keeps a stack of open quotations. State carries across
//! calls so a chapter can be fed one segment group at a time; call
//! [`reset`](DepthBasedQuotationMarkResolver::reset) between chapters.

use std::collections::BTreeSet;

use crate::convention::QuotationMarkDirection;
use crate::metadata::{QuotationMarkMetadata, QuotationMarkResolutionIssue};
use crate::settings::QuotationMarkResolutionSettings;
use crate::string_match::QuotationMarkStringMatch;

/// Marks that double as apostrophes.
const APOSTROPHES: [&str; 2] = ["'", "\u{2019}"];

/// Position of the last resolved mark in the current call.
#[derive(Debug, Clone, Copy)]
struct LastMark {
    segment_index: usize,
    end: usize,
    direction: QuotationMarkDirection,
}

/// Resolves marks by tracking how deeply quotations are nested.
#[derive(Debug, Clone)]
pub struct DepthBasedQuotationMarkResolver<S> {
    settings: S,
    open: Vec<QuotationMarkMetadata>,
    continuers: usize,
    last_continuer: Option<(usize, usize)>,
    last_mark: Option<LastMark>,
    issues: BTreeSet<QuotationMarkResolutionIssue>,
}

impl<S: QuotationMarkResolutionSettings> DepthBasedQuotationMarkResolver<S> {
    /// Creates a resolver with nothing open.
    #[must_use]
    pub fn new(settings: S) -> Self {
        Self {
            settings,
            open: Vec::new(),
            continuers: 0,
            last_continuer: None,
            last_mark: None,
            issues: BTreeSet::new(),
        }
    }

    /// The settings.
    #[must_use]
    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Forgets open quotations and issues.
    pub fn reset(&mut self) {
        self.open.clear();
        self.continuers = 0;
        self.last_continuer = None;
        self.last_mark = None;
        self.issues.clear();
    }

    /// Number of open quotations.
    #[must_use]
    pub fn current_depth(&self) -> usize {
        self.open.len()
    }

    /// Issues so far. Quotations still open count as unpaired.
    #[must_use]
    pub fn issues(&self) -> BTreeSet<QuotationMarkResolutionIssue> {
        let mut issues = self.issues.clone();
        if !self.open.is_empty() {
            issues.insert(QuotationMarkResolutionIssue::UnpairedQuotationMark);
        }
        issues
    }

    /// Resolves matches in document order. Marks that are apostrophes or
    /// cannot be resolved produce no metadata.
    pub fn resolve_quotation_marks(
        &mut self,
        matches: &[QuotationMarkStringMatch<'_>],
    ) -> Vec<QuotationMarkMetadata> {
        self.last_continuer = None;
        self.last_mark = None;
        matches
            .iter()
            .filter_map(|string_match| self.resolve(string_match))
            .collect()
    }

    fn resolve(&mut self, string_match: &QuotationMarkStringMatch<'_>) -> Option<QuotationMarkMetadata> {
        if let Some(index) = self.continuer_index(string_match) {
            self.continuers = index + 1;
            self.last_continuer = Some((string_match.segment_index(), string_match.end()));
            return Some(QuotationMarkMetadata::from_match(
                string_match,
                index + 1,
                QuotationMarkDirection::Opening,
            ));
        }
        self.continuers = 0;
        self.last_continuer = None;

        if self.is_apostrophe(string_match) {
            return None;
        }
        if self.is_opening(string_match) {
            return Some(self.open_quotation(string_match));
        }
        if self.is_closing(string_match) {
            return self.close_quotation(string_match);
        }
        if self.settings.is_ambiguous(string_match) {
            log::trace!(
                "ambiguous quotation mark {:?} at {}",
                string_match.quotation_mark(),
                string_match.start()
            );
            self.issues
                .insert(QuotationMarkResolutionIssue::AmbiguousQuotationMark);
        }
        None
    }

    fn open_quotation(&mut self, string_match: &QuotationMarkStringMatch<'_>) -> QuotationMarkMetadata {
        let depth = self.open.len() + 1;
        if depth > self.settings.max_depth() {
            self.issues.insert(QuotationMarkResolutionIssue::TooDeepNesting);
        }
        let metadata =
            QuotationMarkMetadata::from_match(string_match, depth, QuotationMarkDirection::Opening);
        self.open.push(metadata.clone());
        self.remember(string_match, QuotationMarkDirection::Opening);
        metadata
    }

    fn close_quotation(
        &mut self,
        string_match: &QuotationMarkStringMatch<'_>,
    ) -> Option<QuotationMarkMetadata> {
        let mark = string_match.quotation_mark();
        let Some(position) = self
            .open
            .iter()
            .rposition(|open| self.settings.marks_are_a_valid_pair(&open.quotation_mark, mark))
        else {
            self.issues
                .insert(QuotationMarkResolutionIssue::UnpairedQuotationMark);
            return None;
        };
        if position + 1 != self.open.len() {
            // Inner quotations were never closed.
            self.issues
                .insert(QuotationMarkResolutionIssue::UnpairedQuotationMark);
            self.open.truncate(position + 1);
        }
        let depth = self.open.len();
        self.open.pop();
        self.remember(string_match, QuotationMarkDirection::Closing);
        Some(QuotationMarkMetadata::from_match(
            string_match,
            depth,
            QuotationMarkDirection::Closing,
        ))
    }

    fn remember(&mut self, string_match: &QuotationMarkStringMatch<'_>, direction: QuotationMarkDirection) {
        self.last_mark = Some(LastMark {
            segment_index: string_match.segment_index(),
            end: string_match.end(),
            direction,
        });
    }

    fn follows_last_mark(
        &self,
        string_match: &QuotationMarkStringMatch<'_>,
        direction: QuotationMarkDirection,
    ) -> bool {
        self.last_mark.is_some_and(|last| {
            last.direction == direction
                && last.segment_index == string_match.segment_index()
                && last.end == string_match.start()
        })
    }

    /// Index into the open stack that a paragraph-initial continuer repeats.
    fn continuer_index(&self, string_match: &QuotationMarkStringMatch<'_>) -> Option<usize> {
        if !self.settings.should_rely_on_paragraph_markers()
            || self.open.is_empty()
            || !string_match.is_at_start_of_paragraph()
        {
            return None;
        }
        let index = match self.last_continuer {
            Some((segment_index, end))
                if segment_index == string_match.segment_index() && end <= string_match.start() =>
            {
                self.continuers
            }
            _ => 0,
        };
        let open = self.open.get(index)?;
        (open.quotation_mark == string_match.quotation_mark()).then_some(index)
    }

    fn is_apostrophe(&self, string_match: &QuotationMarkStringMatch<'_>) -> bool {
        let mark = string_match.quotation_mark();
        if !APOSTROPHES.contains(&mark) || !string_match.has_leading_letter() {
            return false;
        }
        if string_match.has_trailing_letter() {
            return true;
        }
        // "prophets' words": an apostrophe unless it closes the innermost quotation.
        !self
            .open
            .last()
            .is_some_and(|top| self.settings.marks_are_a_valid_pair(&top.quotation_mark, mark))
    }

    fn is_opening(&self, string_match: &QuotationMarkStringMatch<'_>) -> bool {
        if !self.settings.is_valid_opening_quotation_mark(string_match) {
            return false;
        }
        if !self.settings.is_valid_closing_quotation_mark(string_match) {
            return true;
        }
        let opens_here = string_match.is_at_start_of_segment()
            || string_match.has_leading_whitespace()
            || string_match.has_quote_introducer_in_leading_substring()
            || self.follows_last_mark(string_match, QuotationMarkDirection::Opening);
        let blocked_after = string_match.has_trailing_whitespace()
            || string_match.is_at_end_of_segment()
            || (string_match.has_trailing_punctuation() && !string_match.has_trailing_quotation_mark());
        opens_here && !blocked_after
    }

    fn is_closing(&self, string_match: &QuotationMarkStringMatch<'_>) -> bool {
        if !self.settings.is_valid_closing_quotation_mark(string_match) {
            return false;
        }
        if !self.settings.is_valid_opening_quotation_mark(string_match) {
            return true;
        }
        if self.follows_last_mark(string_match, QuotationMarkDirection::Closing) {
            return true;
        }
        let closes_here = string_match.has_trailing_whitespace()
            || string_match.has_trailing_punctuation()
            || string_match.is_at_end_of_segment();
        closes_here && !string_match.has_leading_whitespace()
    }
}
