//! The update pass: rewrites quotation marks inside update blocks.

use std::collections::BTreeMap;

use scripture_usfm::{
    UpdateUsfmConfig, UpdateUsfmParserHandler, UsfmTokenType, UsfmUpdateBlock,
    UsfmUpdateBlockElement, UsfmUpdateBlockElementType, UsfmUpdateBlockHandler, parse_usfm,
};
use scripture_versification::ScriptureRef;

use crate::convention::QuoteConvention;
use crate::fallback::FallbackQuotationMarkResolver;
use crate::finder::QuotationMarkFinder;
use crate::first_pass::{ChapterQuotationSummary, QuotationMarkUpdateFirstPass, QuotationMarkUpdateStrategy};
use crate::metadata::{QuotationMarkMetadata, apply_quotation_mark_updates};
use crate::registry::QuoteConventionSet;
use crate::resolver::DepthBasedQuotationMarkResolver;
use crate::settings::QuotationMarkUpdateResolutionSettings;
use crate::text_segment::{TextSegment, UsfmMarkerType};

/// Which conventions to convert between and how to treat each chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotationDenormalizationSettings {
    source_convention: QuoteConvention,
    target_convention: QuoteConvention,
    default_strategy: QuotationMarkUpdateStrategy,
    chapter_strategies: BTreeMap<u32, QuotationMarkUpdateStrategy>,
}

impl QuotationDenormalizationSettings {
    /// Converts text written in `source` to `target`.
    #[must_use]
    pub fn new(source: QuoteConvention, target: QuoteConvention) -> Self {
        Self {
            source_convention: source,
            target_convention: target,
            default_strategy: QuotationMarkUpdateStrategy::default(),
            chapter_strategies: BTreeMap::new(),
        }
    }

    /// Restores `target` marks to text whose marks were collapsed to ASCII.
    #[must_use]
    pub fn for_target(target: QuoteConvention) -> Self {
        Self::new(target.normalize(), target)
    }

    /// Strategy for chapters without their own.
    #[must_use]
    pub fn with_default_strategy(mut self, strategy: QuotationMarkUpdateStrategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    /// Strategy for one chapter.
    #[must_use]
    pub fn with_chapter_strategy(mut self, chapter: u32, strategy: QuotationMarkUpdateStrategy) -> Self {
        self.chapter_strategies.insert(chapter, strategy);
        self
    }

    /// Strategies chosen by the analysis pass.
    #[must_use]
    pub fn with_chapter_summaries(mut self, summaries: &[ChapterQuotationSummary]) -> Self {
        self.chapter_strategies
            .extend(summaries.iter().map(|s| (s.chapter_num, s.strategy)));
        self
    }

    /// The convention the text is written in.
    #[must_use]
    pub fn source_convention(&self) -> &QuoteConvention {
        &self.source_convention
    }

    /// The convention to write.
    #[must_use]
    pub fn target_convention(&self) -> &QuoteConvention {
        &self.target_convention
    }

    /// Strategy for chapters without their own.
    #[must_use]
    pub fn default_strategy(&self) -> QuotationMarkUpdateStrategy {
        self.default_strategy
    }

    /// Strategy for a chapter.
    #[must_use]
    pub fn strategy_for_chapter(&self, chapter: u32) -> QuotationMarkUpdateStrategy {
        self.chapter_strategies
            .get(&chapter)
            .copied()
            .unwrap_or(self.default_strategy)
    }
}

/// Where a segment's text came from: element and token index in a block.
type TokenPosition = (usize, usize);

/// Update block handler that rewrites quotation marks from one convention
/// to another.
///
/// Resolution state carries from block to block and is reset when the
/// chapter changes. Notes are resolved on their own. Only the text of
/// text tokens changes.
#[derive(Debug, Clone)]
pub struct QuoteConventionChangingUsfmUpdateBlockHandler {
    settings: QuotationDenormalizationSettings,
    source_marks: QuoteConventionSet,
    resolver: DepthBasedQuotationMarkResolver<QuotationMarkUpdateResolutionSettings>,
    fallback: FallbackQuotationMarkResolver<QuotationMarkUpdateResolutionSettings>,
    current_chapter: Option<u32>,
    strategy: QuotationMarkUpdateStrategy,
    /// Markers after the last text of the previous block.
    carried_context: Vec<UsfmMarkerType>,
}

impl QuoteConventionChangingUsfmUpdateBlockHandler {
    /// Creates a handler.
    #[must_use]
    pub fn new(settings: QuotationDenormalizationSettings) -> Self {
        let resolution = QuotationMarkUpdateResolutionSettings::new(settings.source_convention.clone());
        Self {
            source_marks: QuoteConventionSet::new(vec![settings.source_convention.clone()]),
            resolver: DepthBasedQuotationMarkResolver::new(resolution.clone()),
            fallback: FallbackQuotationMarkResolver::new(resolution),
            current_chapter: None,
            strategy: settings.default_strategy,
            carried_context: Vec::new(),
            settings,
        }
    }

    /// The settings.
    #[must_use]
    pub fn settings(&self) -> &QuotationDenormalizationSettings {
        &self.settings
    }

    fn check_for_chapter_change(&mut self, block: &UsfmUpdateBlock) {
        let Some(chapter) = block.refs.first().map(ScriptureRef::chapter_num) else {
            return;
        };
        if self.current_chapter == Some(chapter) {
            return;
        }
        self.current_chapter = Some(chapter);
        self.strategy = self.settings.strategy_for_chapter(chapter);
        self.resolver.reset();
        self.fallback.reset();
        log::trace!("chapter {chapter}: quotation strategy {}", self.strategy);
    }

    fn resolve(&mut self, segments: &[TextSegment], fresh: bool) -> Vec<QuotationMarkMetadata> {
        let matches = QuotationMarkFinder::new(&self.source_marks).find_all_potential_quotation_marks(segments);
        let settings = self.resolver.settings().clone();
        match (self.strategy, fresh) {
            (QuotationMarkUpdateStrategy::ApplyFallback, false) => {
                self.fallback.resolve_quotation_marks(&matches)
            }
            (QuotationMarkUpdateStrategy::ApplyFallback, true) => {
                FallbackQuotationMarkResolver::new(settings).resolve_quotation_marks(&matches)
            }
            (_, false) => self.resolver.resolve_quotation_marks(&matches),
            (_, true) => {
                DepthBasedQuotationMarkResolver::new(settings).resolve_quotation_marks(&matches)
            }
        }
    }

    fn rewrite_block(&mut self, block: &mut UsfmUpdateBlock) {
        let carried = std::mem::take(&mut self.carried_context);
        let (mut segments, positions, trailing) = body_segments(block, carried);
        self.carried_context = trailing;
        let metadata = self.resolve(&segments, false);
        apply_quotation_mark_updates(&mut segments, &metadata, &self.settings.target_convention);
        write_back(&mut block.elements, &positions, segments);

        for element in &mut block.elements {
            if element.element_type != UsfmUpdateBlockElementType::Embed || element.marked_for_removal {
                continue;
            }
            let (mut segments, positions) = embed_segments(element);
            let metadata = self.resolve(&segments, true);
            apply_quotation_mark_updates(&mut segments, &metadata, &self.settings.target_convention);
            for (token_index, segment) in positions.into_iter().zip(segments) {
                if let Some(token) = element.tokens.get_mut(token_index) {
                    token.text = Some(segment.into_text());
                }
            }
        }
    }
}

impl UsfmUpdateBlockHandler for QuoteConventionChangingUsfmUpdateBlockHandler {
    fn process_block(&mut self, mut block: UsfmUpdateBlock) -> UsfmUpdateBlock {
        self.check_for_chapter_change(&block);
        if self.strategy != QuotationMarkUpdateStrategy::Skip {
            self.rewrite_block(&mut block);
        }
        block
    }
}

/// Segments for the text elements of a block, outside notes, and the
/// markers that follow its last text.
///
/// `carried` holds the markers that ended the previous block; a paragraph
/// marker there still starts a paragraph in this one.
fn body_segments(
    block: &UsfmUpdateBlock,
    mut carried: Vec<UsfmMarkerType>,
) -> (Vec<TextSegment>, Vec<TokenPosition>, Vec<UsfmMarkerType>) {
    let mut marker = if block.refs.first().is_some_and(ScriptureRef::is_verse) {
        UsfmMarkerType::Verse
    } else {
        UsfmMarkerType::Paragraph
    };
    carried.push(marker);
    let mut context = carried;
    let mut segments = Vec::new();
    let mut positions = Vec::new();

    for (element_index, element) in block.elements.iter().enumerate() {
        if element.marked_for_removal {
            continue;
        }
        let next = match element.element_type {
            UsfmUpdateBlockElementType::Text => {
                for (token_index, token) in element.tokens.iter().enumerate() {
                    let Some(text) = token.text.as_deref().filter(|_| token.token_type == UsfmTokenType::Text)
                    else {
                        continue;
                    };
                    segments.push(
                        TextSegment::new(text)
                            .with_preceding_marker(marker)
                            .with_preceding_context(context.drain(..)),
                    );
                    positions.push((element_index, token_index));
                    marker = UsfmMarkerType::NoMarker;
                }
                continue;
            }
            UsfmUpdateBlockElementType::Paragraph => UsfmMarkerType::Paragraph,
            UsfmUpdateBlockElementType::Style => UsfmMarkerType::Character,
            UsfmUpdateBlockElementType::Embed => UsfmMarkerType::Embed,
            UsfmUpdateBlockElementType::Other => match element.tokens.first().map(|t| t.token_type) {
                Some(UsfmTokenType::Verse) => UsfmMarkerType::Verse,
                Some(UsfmTokenType::Chapter) => UsfmMarkerType::Chapter,
                _ => UsfmMarkerType::Other,
            },
        };
        marker = next;
        context.push(next);
    }
    (segments, positions, context)
}

/// Segments for the text tokens inside a note or figure.
fn embed_segments(element: &UsfmUpdateBlockElement) -> (Vec<TextSegment>, Vec<usize>) {
    let mut marker = UsfmMarkerType::Embed;
    let mut segments = Vec::new();
    let mut positions = Vec::new();
    for (token_index, token) in element.tokens.iter().enumerate() {
        match (token.token_type, token.text.as_deref()) {
            (UsfmTokenType::Text, Some(text)) => {
                segments.push(TextSegment::new(text).with_preceding_marker(marker));
                positions.push(token_index);
                marker = UsfmMarkerType::NoMarker;
            }
            (UsfmTokenType::Note, _) => marker = UsfmMarkerType::Embed,
            _ => marker = UsfmMarkerType::Character,
        }
    }
    (segments, positions)
}

fn write_back(
    elements: &mut [UsfmUpdateBlockElement],
    positions: &[TokenPosition],
    segments: Vec<TextSegment>,
) {
    for (&(element_index, token_index), segment) in positions.iter().zip(segments) {
        if let Some(token) = elements
            .get_mut(element_index)
            .and_then(|e| e.tokens.get_mut(token_index))
        {
            token.text = Some(segment.into_text());
        }
    }
}

/// Rewrites the quotation marks of `usfm` with the given settings.
#[must_use]
pub fn change_quotation_marks(usfm: &str, settings: QuotationDenormalizationSettings) -> String {
    let mut handler = QuoteConventionChangingUsfmUpdateBlockHandler::new(settings);
    let mut updater = UpdateUsfmParserHandler::new(Vec::new(), UpdateUsfmConfig::default())
        .with_block_handler(&mut handler);
    parse_usfm(usfm, &mut updater, None, None);
    updater.get_usfm()
}

/// Analyses `usfm`, then converts its marks from `source` to `target`
/// chapter by chapter.
///
/// # Example
///
/// ```
/// use scripture_quotes::{QuoteConventionSet, convert_quotation_marks};
///
/// let conventions = QuoteConventionSet::standard();
/// let usfm = convert_quotation_marks(
///     "\\id GEN\n\\c 1\n\\p\n\\v 1 He said, \"Go.\"\n",
///     conventions.get_by_name("typewriter_english").unwrap(),
///     conventions.get_by_name("standard_english").unwrap(),
/// );
/// assert!(usfm.contains("He said, \u{201C}Go.\u{201D}"));
/// ```
#[must_use]
pub fn convert_quotation_marks(usfm: &str, source: &QuoteConvention, target: &QuoteConvention) -> String {
    let mut first_pass = QuotationMarkUpdateFirstPass::new(source.clone(), target.clone());
    parse_usfm(usfm, &mut first_pass, None, None);
    let settings = QuotationDenormalizationSettings::new(source.clone(), target.clone())
        .with_chapter_summaries(&first_pass.find_best_chapter_strategies());
    change_quotation_marks(usfm, settings)
}

/// Restores `target` marks to text whose marks were collapsed to ASCII.
#[must_use]
pub fn denormalize_quotation_marks(usfm: &str, target: &QuoteConvention) -> String {
    convert_quotation_marks(usfm, &target.normalize(), target)
}
