//! Token types for USFM.
//!
//! Tokens are the output of the tokenizer and the input to the parser.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([-\w]+)\s*=\s*"([^"]*)""#).expect("valid attribute regex"));

/// Token types for USFM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UsfmTokenType {
    /// `\id` and other markers with the book property.
    Book,
    /// `\c`.
    Chapter,
    /// `\v`.
    Verse,
    /// Text between markers.
    Text,
    /// Paragraph-level marker.
    Paragraph,
    /// Character style marker.
    Character,
    /// Footnote or cross-reference marker.
    Note,
    /// Closing marker such as `\nd*`.
    End,
    /// Milestone start, closed by `\*`.
    Milestone,
    /// Milestone end, closed by `\*`.
    MilestoneEnd,
    /// The `|name="value"` part of a character style.
    Attribute,
    /// Marker not in the stylesheet.
    Unknown,
}

/// A `name="value"` pair attached to a character style or milestone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UsfmAttribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
    /// Byte offset of the attribute within the attribute text.
    pub offset: usize,
}

impl UsfmAttribute {
    /// Creates an attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, offset: usize) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            offset,
        }
    }
}

impl fmt::Display for UsfmAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}

/// Parses attribute text such as `lemma="grace" strong="G5485"`.
///
/// A bare value without `=` is assigned to `default_name`. Returns `None`
/// when the text is not a well-formed attribute list.
#[must_use]
pub fn parse_attributes(text: &str, default_name: Option<&str>) -> Option<Vec<UsfmAttribute>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed.contains('=') {
        let offset = text.len() - text.trim_start().len();
        return default_name.map(|name| vec![UsfmAttribute::new(name, trimmed, offset)]);
    }

    let mut attributes = Vec::new();
    let mut last = 0;
    for caps in ATTRIBUTE.captures_iter(text) {
        let whole = caps.get(0)?;
        if !text[last..whole.start()].trim().is_empty() {
            return None;
        }
        attributes.push(UsfmAttribute::new(
            caps.get(1)?.as_str(),
            caps.get(2)?.as_str(),
            whole.start(),
        ));
        last = whole.end();
    }
    if attributes.is_empty() || !text[last..].trim().is_empty() {
        return None;
    }
    Some(attributes)
}

/// A token from USFM source.
///
/// For milestones, `text` holds the raw attribute text so that the token
/// can be written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UsfmToken {
    /// The kind of token.
    pub token_type: UsfmTokenType,
    /// Marker without the backslash, `+` prefix kept.
    pub marker: Option<String>,
    /// Text content.
    pub text: Option<String>,
    /// Expected closing marker.
    pub end_marker: Option<String>,
    /// Book code, chapter number, verse selector or note caller.
    pub data: Option<String>,
    /// Attributes parsed from a following `|` section.
    pub attributes: Vec<UsfmAttribute>,
    /// Source line (1-based).
    pub line: u32,
    /// Source column (1-based).
    pub column: u32,
}

impl UsfmToken {
    /// Creates a token with no source position.
    #[must_use]
    pub fn new(
        token_type: UsfmTokenType,
        marker: Option<String>,
        text: Option<String>,
        end_marker: Option<String>,
    ) -> Self {
        Self {
            token_type,
            marker,
            text,
            end_marker,
            data: None,
            attributes: Vec::new(),
            line: 0,
            column: 0,
        }
    }

    /// Creates a text token.
    #[must_use]
    pub fn new_text(text: impl Into<String>) -> Self {
        Self::new(UsfmTokenType::Text, None, Some(text.into()), None)
    }

    /// Creates a marker token.
    #[must_use]
    pub fn new_marker(token_type: UsfmTokenType, marker: impl Into<String>) -> Self {
        Self::new(token_type, Some(marker.into()), None, None)
    }

    /// Sets the data field.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Sets the source position.
    #[must_use]
    pub const fn at(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Marker with any `+` nesting prefix removed.
    #[must_use]
    pub fn nestless_marker(&self) -> Option<&str> {
        self.marker.as_deref().map(|m| m.trim_start_matches('+'))
    }

    /// True for `+`-prefixed character markers.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.marker.as_deref().is_some_and(|m| m.starts_with('+'))
    }

    /// Value of the named attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Parses attribute text and stores the result.
    ///
    /// Returns false, leaving the token unchanged, when the text is not an
    /// attribute list.
    pub fn set_attributes(&mut self, text: &str, default_name: Option<&str>) -> bool {
        match parse_attributes(text, default_name) {
            Some(attributes) => {
                self.attributes = attributes;
                true
            }
            None => false,
        }
    }

    /// The USFM text for this token, with the canonical separator space
    /// after opening markers.
    #[must_use]
    pub fn to_usfm(&self) -> String {
        let marker = self.marker.as_deref().unwrap_or_default();
        match self.token_type {
            UsfmTokenType::Text => self.text.clone().unwrap_or_default(),
            UsfmTokenType::Attribute => format!("|{}", self.text.as_deref().unwrap_or_default()),
            UsfmTokenType::End => format!("\\{marker}"),
            UsfmTokenType::Milestone | UsfmTokenType::MilestoneEnd => {
                match self.text.as_deref().filter(|t| !t.is_empty()) {
                    Some(attributes) => format!("\\{marker} |{attributes}\\*"),
                    None => format!("\\{marker}\\*"),
                }
            }
            UsfmTokenType::Book
            | UsfmTokenType::Chapter
            | UsfmTokenType::Verse
            | UsfmTokenType::Note => match self.data.as_deref().filter(|d| !d.is_empty()) {
                Some(data) => format!("\\{marker} {data} "),
                None => format!("\\{marker} "),
            },
            UsfmTokenType::Paragraph | UsfmTokenType::Character | UsfmTokenType::Unknown => {
                format!("\\{marker} ")
            }
        }
    }

    /// Length of [`to_usfm`](Self::to_usfm) in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_usfm().chars().count()
    }

    /// True for a token that writes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for UsfmToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_usfm())
    }
}
