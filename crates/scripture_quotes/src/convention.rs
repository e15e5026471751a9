//! Quote conventions: the opening and closing marks used at each nesting
//! depth.

use std::collections::BTreeSet;
use std::fmt;

/// Whether a quotation mark opens or closes a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuotationMarkDirection {
    /// Starts a quotation.
    Opening,
    /// Ends a quotation.
    Closing,
}

impl QuotationMarkDirection {
    /// The other direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Opening => Self::Closing,
            Self::Closing => Self::Opening,
        }
    }
}

/// Collapses a mark to the ASCII form upstream tooling writes.
///
/// Double-style marks (curly doubles, guillemets, CJK corner brackets)
/// become `"`; single-style marks become `'`. Marks with no known ASCII
/// form are returned unchanged.
#[must_use]
pub fn normalize_quotation_mark(mark: &str) -> &str {
    match mark {
        "\u{201C}" | "\u{201D}" | "\u{201E}" | "\u{201F}" | "\u{00AB}" | "\u{00BB}" | "<<"
        | ">>" | "\u{300C}" | "\u{300D}" | "\"" => "\"",
        "\u{2018}" | "\u{2019}" | "\u{201A}" | "\u{201B}" | "\u{2039}" | "\u{203A}" | "<"
        | ">" | "\u{300E}" | "\u{300F}" | "'" => "'",
        other => other,
    }
}

/// The opening and closing marks for one nesting depth.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SingleLevelQuoteConvention {
    opening: String,
    closing: String,
}

impl SingleLevelQuoteConvention {
    /// Creates a level.
    #[must_use]
    pub fn new(opening: impl Into<String>, closing: impl Into<String>) -> Self {
        Self {
            opening: opening.into(),
            closing: closing.into(),
        }
    }

    /// Opening mark.
    #[must_use]
    pub fn opening(&self) -> &str {
        &self.opening
    }

    /// Closing mark.
    #[must_use]
    pub fn closing(&self) -> &str {
        &self.closing
    }

    /// Mark for a direction.
    #[must_use]
    pub fn mark(&self, direction: QuotationMarkDirection) -> &str {
        match direction {
            QuotationMarkDirection::Opening => &self.opening,
            QuotationMarkDirection::Closing => &self.closing,
        }
    }

    /// This level with both marks collapsed to ASCII.
    #[must_use]
    pub fn normalize(&self) -> Self {
        Self::new(
            normalize_quotation_mark(&self.opening),
            normalize_quotation_mark(&self.closing),
        )
    }
}

/// A named list of quotation mark pairs, outermost level first.
///
/// # Example
///
/// ```
/// use scripture_quotes::{QuotationMarkDirection, QuoteConvention, SingleLevelQuoteConvention};
///
/// let convention = QuoteConvention::new(
///     "standard_english",
///     vec![
///         SingleLevelQuoteConvention::new("\u{201C}", "\u{201D}"),
///         SingleLevelQuoteConvention::new("\u{2018}", "\u{2019}"),
///     ],
/// );
/// assert_eq!(convention.expected_mark(2, QuotationMarkDirection::Closing), Some("\u{2019}"));
/// assert_eq!(convention.normalize().opening_mark_at_depth(1), Some("\""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuoteConvention {
    name: String,
    levels: Vec<SingleLevelQuoteConvention>,
}

impl QuoteConvention {
    /// Creates a convention.
    #[must_use]
    pub fn new(name: impl Into<String>, levels: Vec<SingleLevelQuoteConvention>) -> Self {
        Self {
            name: name.into(),
            levels,
        }
    }

    /// Builds a convention from `(opening, closing)` pairs.
    #[must_use]
    pub fn from_pairs(name: impl Into<String>, pairs: &[(&str, &str)]) -> Self {
        Self::new(
            name,
            pairs
                .iter()
                .map(|(open, close)| SingleLevelQuoteConvention::new(*open, *close))
                .collect(),
        )
    }

    /// Name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Levels, outermost first.
    #[must_use]
    pub fn levels(&self) -> &[SingleLevelQuoteConvention] {
        &self.levels
    }

    /// Number of declared nesting levels.
    #[must_use]
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    fn level(&self, depth: usize) -> Option<&SingleLevelQuoteConvention> {
        depth.checked_sub(1).and_then(|i| self.levels.get(i))
    }

    /// Opening mark at a 1-based depth.
    #[must_use]
    pub fn opening_mark_at_depth(&self, depth: usize) -> Option<&str> {
        self.level(depth).map(SingleLevelQuoteConvention::opening)
    }

    /// Closing mark at a 1-based depth.
    #[must_use]
    pub fn closing_mark_at_depth(&self, depth: usize) -> Option<&str> {
        self.level(depth).map(SingleLevelQuoteConvention::closing)
    }

    /// Mark expected at a depth in a direction.
    #[must_use]
    pub fn expected_mark(&self, depth: usize, direction: QuotationMarkDirection) -> Option<&str> {
        self.level(depth).map(|level| level.mark(direction))
    }

    /// Every mark used in a direction.
    #[must_use]
    pub fn marks(&self, direction: QuotationMarkDirection) -> BTreeSet<&str> {
        self.levels.iter().map(|level| level.mark(direction)).collect()
    }

    /// Depths at which `mark` is used in `direction`.
    #[must_use]
    pub fn depths_of(&self, mark: &str, direction: QuotationMarkDirection) -> Vec<usize> {
        self.levels
            .iter()
            .enumerate()
            .filter(|(_, level)| level.mark(direction) == mark)
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// True when `mark` appears in both directions.
    #[must_use]
    pub fn is_ambiguous(&self, mark: &str) -> bool {
        self.marks(QuotationMarkDirection::Opening).contains(mark)
            && self.marks(QuotationMarkDirection::Closing).contains(mark)
    }

    /// This convention with every mark collapsed to ASCII.
    #[must_use]
    pub fn normalize(&self) -> Self {
        Self {
            name: format!("{}_normalized", self.name),
            levels: self
                .levels
                .iter()
                .map(SingleLevelQuoteConvention::normalize)
                .collect(),
        }
    }

    /// True when every observed mark belongs to this convention and the
    /// outermost opening mark was seen.
    #[must_use]
    pub fn is_compatible_with_observed_quotation_marks(
        &self,
        opening: &BTreeSet<String>,
        closing: &BTreeSet<String>,
    ) -> bool {
        let own_opening = self.marks(QuotationMarkDirection::Opening);
        let own_closing = self.marks(QuotationMarkDirection::Closing);
        if !opening.iter().all(|m| own_opening.contains(m.as_str()))
            || !closing.iter().all(|m| own_closing.contains(m.as_str()))
        {
            return false;
        }
        match self.opening_mark_at_depth(1) {
            Some(first) if !opening.is_empty() => opening.contains(first),
            _ => true,
        }
    }
}

impl fmt::Display for QuoteConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> QuoteConvention {
        QuoteConvention::from_pairs(
            "standard_english",
            &[("\u{201C}", "\u{201D}"), ("\u{2018}", "\u{2019}"), ("\u{201C}", "\u{201D}")],
        )
    }

    #[test]
    fn marks_by_depth() {
        let convention = english();
        assert_eq!(convention.num_levels(), 3);
        assert_eq!(convention.opening_mark_at_depth(1), Some("\u{201C}"));
        assert_eq!(convention.closing_mark_at_depth(2), Some("\u{2019}"));
        assert_eq!(convention.opening_mark_at_depth(0), None);
        assert_eq!(convention.opening_mark_at_depth(4), None);
        assert_eq!(
            convention.depths_of("\u{201C}", QuotationMarkDirection::Opening),
            vec![1, 3]
        );
    }

    #[test]
    fn normalization_collapses_to_ascii() {
        let normalized = english().normalize();
        assert_eq!(normalized.name(), "standard_english_normalized");
        assert_eq!(normalized.opening_mark_at_depth(1), Some("\""));
        assert_eq!(normalized.closing_mark_at_depth(2), Some("'"));
        assert!(normalized.is_ambiguous("\""));
        assert!(!english().is_ambiguous("\u{201C}"));
        assert_eq!(normalize_quotation_mark("\u{00AB}"), "\"");
        assert_eq!(normalize_quotation_mark("\u{2039}"), "'");
        assert_eq!(normalize_quotation_mark("x"), "x");
    }

    #[test]
    fn compatibility_with_observed_marks() {
        let convention = english();
        let opening: BTreeSet<String> = ["\u{201C}".to_string()].into();
        let closing: BTreeSet<String> = ["\u{201D}".to_string(), "\u{2019}".to_string()].into();
        assert!(convention.is_compatible_with_observed_quotation_marks(&opening, &closing));

        let only_inner: BTreeSet<String> = ["\u{2018}".to_string()].into();
        assert!(!convention.is_compatible_with_observed_quotation_marks(&only_inner, &closing));

        let foreign: BTreeSet<String> = ["\u{00AB}".to_string()].into();
        assert!(!convention.is_compatible_with_observed_quotation_marks(&foreign, &closing));
    }

    #[test]
    fn direction_opposite() {
        assert_eq!(
            QuotationMarkDirection::Opening.opposite(),
            QuotationMarkDirection::Closing
        );
    }
}
