//! Quotation-mark conventions, resolution and conversion for USFM scripture.
//!
//! This crate provides:
//! - [`QuoteConvention`] and the built-in [`QuoteConventionSet::standard`] registry
//! - [`QuotationMarkFinder`] - Locates candidate marks in [`TextSegment`]s
//! - [`DepthBasedQuotationMarkResolver`] - Pairs marks into nested quotations
//! - [`FallbackQuotationMarkResolver`] - Direction from local context only
//! - [`QuotationMarkUpdateFirstPass`] - Chooses a [`QuotationMarkUpdateStrategy`] per chapter
//! - [`QuoteConventionChangingUsfmUpdateBlockHandler`] - Rewrites marks during a USFM update
//! - [`QuoteConventionDetector`] - Finds the convention a document uses
//!
//! # Example
//!
//! ```
//! use scripture_quotes::{QuotationDenormalizationSettings, QuoteConventionSet, change_quotation_marks};
//!
//! let conventions = QuoteConventionSet::standard();
//! let settings = QuotationDenormalizationSettings::new(
//!     conventions.get_by_name("typewriter_english").unwrap().clone(),
//!     conventions.get_by_name("standard_english").unwrap().clone(),
//! );
//! let usfm = change_quotation_marks("\\c 1\n\\v 1 He said, \"Go.\"\n", settings);
//! assert!(usfm.contains("\u{201C}Go.\u{201D}"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod convention;
pub mod denormalization;
pub mod detector;
pub mod extractor;
pub mod fallback;
pub mod finder;
pub mod first_pass;
pub mod metadata;
pub mod registry;
pub mod resolver;
pub mod settings;
pub mod string_match;
pub mod text_segment;


pub use convention::{
    QuotationMarkDirection, QuoteConvention, SingleLevelQuoteConvention, normalize_quotation_mark,
};
pub use denormalization::{
    QuotationDenormalizationSettings, QuoteConventionChangingUsfmUpdateBlockHandler,
    change_quotation_marks, convert_quotation_marks, denormalize_quotation_marks,
};
pub use detector::{
    QuotationMarkTabulator, QuoteConventionAnalysis, QuoteConventionDetector,
    detect_quote_convention,
};
pub use extractor::{Chapter, UsfmStructureExtractor, Verse};
pub use fallback::FallbackQuotationMarkResolver;
pub use finder::QuotationMarkFinder;
pub use first_pass::{
    ChapterQuotationSummary, QuotationMarkUpdateFirstPass, QuotationMarkUpdateStrategy,
    choose_best_strategy, fallback_mode_feasible,
};
pub use metadata::{QuotationMarkMetadata, QuotationMarkResolutionIssue, apply_quotation_mark_updates};
pub use registry::{QuoteConventionSet, STANDARD_QUOTE_CONVENTIONS};
pub use resolver::DepthBasedQuotationMarkResolver;
pub use settings::{
    QuotationMarkResolutionSettings, QuotationMarkUpdateResolutionSettings,
    QuoteConventionDetectionResolutionSettings,
};
pub use string_match::QuotationMarkStringMatch;
pub use text_segment::{TextSegment, UsfmMarkerType};
