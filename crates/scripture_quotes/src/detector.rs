//! Works out which quote convention a document uses.

use std::collections::{BTreeMap, BTreeSet};

use scripture_usfm::{UsfmEvent, UsfmParserHandler, UsfmParserState, parse_usfm};

use crate::convention::{QuotationMarkDirection, QuoteConvention};
use crate::extractor::{Chapter, UsfmStructureExtractor};
use crate::finder::QuotationMarkFinder;
use crate::metadata::QuotationMarkMetadata;
use crate::registry::QuoteConventionSet;
use crate::resolver::DepthBasedQuotationMarkResolver;
use crate::settings::QuoteConventionDetectionResolutionSettings;

/// Counts of resolved marks by depth and direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotationMarkTabulator {
    counts: BTreeMap<(usize, QuotationMarkDirection), BTreeMap<String, usize>>,
}

impl QuotationMarkTabulator {
    /// Creates an empty tabulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds resolved marks.
    pub fn tabulate(&mut self, metadata: &[QuotationMarkMetadata]) {
        for mark in metadata {
            *self
                .counts
                .entry((mark.depth, mark.direction))
                .or_default()
                .entry(mark.quotation_mark.clone())
                .or_default() += 1;
        }
    }

    /// True when nothing has been tabulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// How often `mark` was seen at a depth and direction.
    #[must_use]
    pub fn count(&self, depth: usize, direction: QuotationMarkDirection, mark: &str) -> usize {
        self.counts
            .get(&(depth, direction))
            .and_then(|marks| marks.get(mark))
            .copied()
            .unwrap_or(0)
    }

    /// Score in `0.0..=1.0` for how well `convention` explains the
    /// tabulated marks. Shallow depths weigh more than deep ones.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn calculate_similarity(&self, convention: &QuoteConvention) -> f64 {
        let mut weighted_difference = 0.0;
        let mut total_weight = 0.0;
        for (&(depth, direction), marks) in &self.counts {
            let total: usize = marks.values().sum();
            if total == 0 {
                continue;
            }
            let matching = convention
                .expected_mark(depth, direction)
                .and_then(|expected| marks.get(expected))
                .copied()
                .unwrap_or(0);
            let weight = 1.0 / f64::from(1u32 << depth.saturating_sub(1).min(31));
            weighted_difference += weight * (1.0 - matching as f64 / total as f64);
            total_weight += weight;
        }
        if total_weight == 0.0 {
            0.0
        } else {
            1.0 - weighted_difference / total_weight
        }
    }
}

/// The result of detection.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteConventionAnalysis {
    /// The convention that best explains the document.
    pub best_quote_convention: QuoteConvention,
    /// Its similarity score.
    pub best_quote_convention_score: f64,
    /// The marks the score was computed from.
    pub tabulator: QuotationMarkTabulator,
}

/// Parser handler that collects verse text for detection.
#[derive(Debug, Clone, Default)]
pub struct QuoteConventionDetector {
    extractor: UsfmStructureExtractor,
}

impl QuoteConventionDetector {
    /// Creates a detector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores every convention of `conventions`, or of the built-in
    /// registry, against the collected text. `None` when the text has no
    /// resolvable quotation marks.
    #[must_use]
    pub fn detect_quote_convention(
        &self,
        conventions: Option<&QuoteConventionSet>,
    ) -> Option<QuoteConventionAnalysis> {
        let all = conventions.unwrap_or(QuoteConventionSet::standard());
        let chapters = self.extractor.chapters();

        let preliminary = resolve_chapters(chapters, all);
        let opening = observed_marks(&preliminary, QuotationMarkDirection::Opening);
        let closing = observed_marks(&preliminary, QuotationMarkDirection::Closing);
        let compatible = all.filter_to_compatible(&opening, &closing);

        let (candidates, metadata) = if compatible.is_empty() {
            log::debug!("no convention matches the observed marks; scoring all of them");
            (all.clone(), preliminary)
        } else {
            let metadata = resolve_chapters(chapters, &compatible);
            (compatible, metadata)
        };

        let mut tabulator = QuotationMarkTabulator::new();
        tabulator.tabulate(&metadata);
        if tabulator.is_empty() {
            return None;
        }
        let (best, score) = candidates.find_most_similar_convention(&tabulator)?;
        log::debug!("best quote convention {best} with score {score:.3}");
        Some(QuoteConventionAnalysis {
            best_quote_convention: best.clone(),
            best_quote_convention_score: score,
            tabulator,
        })
    }
}

impl UsfmParserHandler for QuoteConventionDetector {
    fn handle_event(&mut self, state: &UsfmParserState, event: &UsfmEvent<'_>) {
        self.extractor.handle_event(state, event);
    }
}

fn resolve_chapters(chapters: &[Chapter], conventions: &QuoteConventionSet) -> Vec<QuotationMarkMetadata> {
    let finder = QuotationMarkFinder::new(conventions);
    let mut resolver =
        DepthBasedQuotationMarkResolver::new(QuoteConventionDetectionResolutionSettings::new(conventions));
    let mut metadata = Vec::new();
    for chapter in chapters {
        resolver.reset();
        let segments = chapter.text_segments();
        let matches = finder.find_all_potential_quotation_marks(&segments);
        metadata.extend(resolver.resolve_quotation_marks(&matches));
    }
    metadata
}

fn observed_marks(metadata: &[QuotationMarkMetadata], direction: QuotationMarkDirection) -> BTreeSet<String> {
    metadata
        .iter()
        .filter(|m| m.direction == direction)
        .map(|m| m.quotation_mark.clone())
        .collect()
}

/// Detects the quote convention of a USFM document against the built-in
/// registry.
///
/// # Example
///
/// ```
/// use scripture_quotes::detect_quote_convention;
///
/// let analysis = detect_quote_convention(
///     "\\id GEN\n\\c 1\n\\p\n\\v 1 Il dit\u{a0}: \u{ab}Va, \u{201c}vite\u{201d}.\u{bb}\n",
/// )
/// .unwrap();
/// assert_eq!(analysis.best_quote_convention.name(), "western_european");
/// ```
#[must_use]
pub fn detect_quote_convention(usfm: &str) -> Option<QuoteConventionAnalysis> {
    let mut detector = QuoteConventionDetector::new();
    parse_usfm(usfm, &mut detector, None, None);
    detector.detect_quote_convention(None)
}
