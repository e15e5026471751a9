//! The analysis pass: decides, chapter by chapter, how safely quotation
//! marks can be converted.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use scripture_usfm::{UsfmEvent, UsfmParserHandler, UsfmParserState};

use crate::convention::{QuotationMarkDirection, QuoteConvention};
use crate::extractor::UsfmStructureExtractor;
use crate::finder::QuotationMarkFinder;
use crate::metadata::QuotationMarkResolutionIssue;
use crate::registry::QuoteConventionSet;
use crate::resolver::DepthBasedQuotationMarkResolver;
use crate::settings::QuotationMarkUpdateResolutionSettings;

/// How the update pass treats a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuotationMarkUpdateStrategy {
    /// Re-resolve every mark and rewrite it for its depth and direction.
    #[default]
    ApplyFull,
    /// Substitute glyphs one for one.
    ApplyFallback,
    /// Leave the chapter alone.
    Skip,
}

impl fmt::Display for QuotationMarkUpdateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ApplyFull => "APPLY_FULL",
            Self::ApplyFallback => "APPLY_FALLBACK",
            Self::Skip => "SKIP",
        })
    }
}

/// What the analysis found in one chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterQuotationSummary {
    /// Chapter number.
    pub chapter_num: u32,
    /// Issues found while resolving the chapter's marks.
    pub issues: BTreeSet<QuotationMarkResolutionIssue>,
    /// The strategy chosen for the chapter.
    pub strategy: QuotationMarkUpdateStrategy,
}

/// Picks a strategy from the issues found in a chapter.
#[must_use]
pub fn choose_best_strategy(
    issues: &BTreeSet<QuotationMarkResolutionIssue>,
    fallback_feasible: bool,
) -> QuotationMarkUpdateStrategy {
    if issues.is_empty() {
        QuotationMarkUpdateStrategy::ApplyFull
    } else if issues.contains(&QuotationMarkResolutionIssue::AmbiguousQuotationMark)
        || !fallback_feasible
    {
        QuotationMarkUpdateStrategy::Skip
    } else {
        QuotationMarkUpdateStrategy::ApplyFallback
    }
}

/// True when every source mark maps to one target mark in each direction,
/// so glyph substitution cannot pick the wrong target.
#[must_use]
pub fn fallback_mode_feasible(source: &QuoteConvention, target: &QuoteConvention) -> bool {
    let mut targets: BTreeMap<(&str, QuotationMarkDirection), BTreeSet<&str>> = BTreeMap::new();
    let depths = source.num_levels().min(target.num_levels());
    for depth in 1..=depths {
        for direction in [QuotationMarkDirection::Opening, QuotationMarkDirection::Closing] {
            if let (Some(from), Some(to)) = (
                source.expected_mark(depth, direction),
                target.expected_mark(depth, direction),
            ) {
                targets.entry((from, direction)).or_default().insert(to);
            }
        }
    }
    targets.values().all(|marks| marks.len() <= 1)
}

/// Parser handler that collects verse text, then analyses each chapter
/// against a source convention.
///
/// # Example
///
/// ```
/// use scripture_quotes::{QuotationMarkUpdateFirstPass, QuotationMarkUpdateStrategy, QuoteConventionSet};
/// use scripture_usfm::parse_usfm;
///
/// let conventions = QuoteConventionSet::standard();
/// let source = conventions.get_by_name("typewriter_english").unwrap().clone();
/// let target = conventions.get_by_name("standard_english").unwrap().clone();
///
/// let mut first_pass = QuotationMarkUpdateFirstPass::new(source, target);
/// parse_usfm("\\c 1\n\\p\n\\v 1 He said, \"Go.\"\n", &mut first_pass, None, None);
/// let summaries = first_pass.find_best_chapter_strategies();
/// assert_eq!(summaries[0].strategy, QuotationMarkUpdateStrategy::ApplyFull);
/// ```
#[derive(Debug, Clone)]
pub struct QuotationMarkUpdateFirstPass {
    extractor: UsfmStructureExtractor,
    source: QuoteConvention,
    fallback_feasible: bool,
}

impl QuotationMarkUpdateFirstPass {
    /// Analysis for converting `source` text to `target`.
    #[must_use]
    pub fn new(source: QuoteConvention, target: QuoteConvention) -> Self {
        let fallback_feasible = fallback_mode_feasible(&source, &target);
        Self {
            extractor: UsfmStructureExtractor::new(),
            source,
            fallback_feasible,
        }
    }

    /// Analysis for restoring `target` marks to text whose marks were
    /// collapsed to ASCII.
    #[must_use]
    pub fn for_denormalization(target: QuoteConvention) -> Self {
        Self::new(target.normalize(), target)
    }

    /// Whether glyph substitution is safe for this pair of conventions.
    #[must_use]
    pub fn fallback_mode_feasible(&self) -> bool {
        self.fallback_feasible
    }

    /// Resolves each chapter and picks its strategy.
    #[must_use]
    pub fn find_best_chapter_strategies(&self) -> Vec<ChapterQuotationSummary> {
        let conventions = QuoteConventionSet::new(vec![self.source.clone()]);
        let finder = QuotationMarkFinder::new(&conventions);
        let mut resolver = DepthBasedQuotationMarkResolver::new(
            QuotationMarkUpdateResolutionSettings::new(self.source.clone()),
        );

        self.extractor
            .chapters()
            .iter()
            .map(|chapter| {
                resolver.reset();
                let segments = chapter.text_segments();
                let matches = finder.find_all_potential_quotation_marks(&segments);
                let _ = resolver.resolve_quotation_marks(&matches);
                let issues = resolver.issues();
                let strategy = choose_best_strategy(&issues, self.fallback_feasible);
                log::debug!(
                    "chapter {}: {} quotation marks, issues {:?}, strategy {strategy}",
                    chapter.number(),
                    matches.len(),
                    issues
                );
                ChapterQuotationSummary {
                    chapter_num: chapter.number(),
                    issues,
                    strategy,
                }
            })
            .collect()
    }

    /// Strategies keyed by chapter number.
    #[must_use]
    pub fn chapter_strategies(&self) -> BTreeMap<u32, QuotationMarkUpdateStrategy> {
        self.find_best_chapter_strategies()
            .into_iter()
            .map(|summary| (summary.chapter_num, summary.strategy))
            .collect()
    }
}

impl UsfmParserHandler for QuotationMarkUpdateFirstPass {
    fn handle_event(&mut self, state: &UsfmParserState, event: &UsfmEvent<'_>) {
        self.extractor.handle_event(state, event);
    }
}
