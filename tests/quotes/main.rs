//! Integration tests for Layer 3: Quotes
//!
//! Tests for quote conventions, whole-document conversion and convention
//! detection.

mod conventions;
mod conversion;
mod detection;

use scripture_quotes::{QuoteConvention, QuoteConventionSet};

/// Looks up a built-in convention.
pub fn convention(name: &str) -> QuoteConvention {
    QuoteConventionSet::standard()
        .get_by_name(name)
        .cloned()
        .unwrap_or_else(|| panic!("missing built-in convention {name}"))
}
