//! Elements on the parser stack.

use crate::token::UsfmAttribute;

/// Kind of an open element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsfmParserElementType {
    /// `\id` and its text.
    Book,
    /// Paragraph-level marker.
    Para,
    /// Character style.
    Char,
    /// A run of `\tr` rows.
    Table,
    /// `\tr`.
    Row,
    /// Table cell.
    Cell,
    /// Footnote or cross-reference.
    Note,
    /// `\esb` sidebar.
    Sidebar,
}

/// An open element on the parser stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsfmParserElement {
    /// The kind of element.
    pub element_type: UsfmParserElementType,
    /// Marker that opened it. Tables have none.
    pub marker: Option<String>,
    /// Attributes of the opening token.
    pub attributes: Vec<UsfmAttribute>,
}

impl UsfmParserElement {
    /// Creates an element without attributes.
    #[must_use]
    pub fn new(element_type: UsfmParserElementType, marker: Option<String>) -> Self {
        Self {
            element_type,
            marker,
            attributes: Vec::new(),
        }
    }

    /// Sets the attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Vec<UsfmAttribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// The marker, or an empty string.
    #[must_use]
    pub fn marker(&self) -> &str {
        self.marker.as_deref().unwrap_or_default()
    }
}
