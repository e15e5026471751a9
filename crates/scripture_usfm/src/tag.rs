//! Stylesheet entries.
//!
//! A [`UsfmTag`] describes one marker: how it nests, what kind of text it
//! holds and which attributes it accepts. The typographic fields are carried
//! through unchanged; nothing in the parser reads them.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a marker participates in the document structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UsfmStyleType {
    /// Not in the stylesheet.
    #[default]
    Unknown,
    /// Inline style closed by an end marker.
    Character,
    /// Block-level marker.
    Paragraph,
    /// Footnote or cross reference.
    Note,
    /// Closing form of a character or note marker.
    End,
    /// Start of a milestone pair (`\qt-s`).
    Milestone,
    /// End of a milestone pair (`\qt-e`).
    MilestoneEnd,
}

/// The kind of text a marker holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UsfmTextType {
    /// No text type given; treated as verse text.
    #[default]
    NotSpecified,
    /// Book and section titles.
    Title,
    /// Section headings.
    Section,
    /// Scripture text.
    VerseText,
    /// Footnote and cross-reference text.
    NoteText,
    /// Anything else (introductions, labels, numbers).
    Other,
    /// Back translation.
    BackTranslation,
    /// Translator's notes.
    TranslationNote,
}

impl UsfmTextType {
    fn parse(value: &str) -> Option<Self> {
        Some(match value.to_ascii_lowercase().as_str() {
            "title" => Self::Title,
            "section" => Self::Section,
            "versetext" => Self::VerseText,
            "notetext" => Self::NoteText,
            "other" | "chapternumber" | "versenumber" => Self::Other,
            "backtranslation" => Self::BackTranslation,
            "translationnote" => Self::TranslationNote,
            "" | "notspecified" => Self::NotSpecified,
            _ => return None,
        })
    }

    /// Parses a `\TextType` value.
    pub(crate) fn from_field(value: &str) -> Option<Self> {
        Self::parse(value)
    }
}

/// Paragraph justification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UsfmJustification {
    /// Left aligned.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
    /// Justified.
    Both,
}

impl UsfmJustification {
    pub(crate) fn from_field(value: &str) -> Option<Self> {
        Some(match value.to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            "both" => Self::Both,
            _ => return None,
        })
    }
}

/// Set of `\TextProperties` flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UsfmTextProperties(u32);

impl UsfmTextProperties {
    /// No properties.
    pub const NONE: Self = Self(0);
    /// Verse number.
    pub const VERSE: Self = Self(1);
    /// Chapter number.
    pub const CHAPTER: Self = Self(1 << 1);
    /// Paragraph.
    pub const PARAGRAPH: Self = Self(1 << 2);
    /// Appears in published output.
    pub const PUBLISHABLE: Self = Self(1 << 3);
    /// In the vernacular language.
    pub const VERNACULAR: Self = Self(1 << 4);
    /// Poetry.
    pub const POETIC: Self = Self(1 << 5);
    /// Starts other text.
    pub const OTHER_TEXT_BEGIN: Self = Self(1 << 6);
    /// Ends other text.
    pub const OTHER_TEXT_END: Self = Self(1 << 7);
    /// Level 1.
    pub const LEVEL_1: Self = Self(1 << 8);
    /// Level 2.
    pub const LEVEL_2: Self = Self(1 << 9);
    /// Level 3.
    pub const LEVEL_3: Self = Self(1 << 10);
    /// Level 4.
    pub const LEVEL_4: Self = Self(1 << 11);
    /// Level 5.
    pub const LEVEL_5: Self = Self(1 << 12);
    /// Cross reference.
    pub const CROSS_REFERENCE: Self = Self(1 << 13);
    /// Never published.
    pub const NONPUBLISHABLE: Self = Self(1 << 14);
    /// Not in the vernacular language.
    pub const NONVERNACULAR: Self = Self(1 << 15);
    /// Book identification.
    pub const BOOK: Self = Self(1 << 16);
    /// Note.
    pub const NOTE: Self = Self(1 << 17);

    const NAMES: [(&'static str, Self); 18] = [
        ("verse", Self::VERSE),
        ("chapter", Self::CHAPTER),
        ("paragraph", Self::PARAGRAPH),
        ("publishable", Self::PUBLISHABLE),
        ("vernacular", Self::VERNACULAR),
        ("poetic", Self::POETIC),
        ("othertextbegin", Self::OTHER_TEXT_BEGIN),
        ("othertextend", Self::OTHER_TEXT_END),
        ("level_1", Self::LEVEL_1),
        ("level_2", Self::LEVEL_2),
        ("level_3", Self::LEVEL_3),
        ("level_4", Self::LEVEL_4),
        ("level_5", Self::LEVEL_5),
        ("crossreference", Self::CROSS_REFERENCE),
        ("nonpublishable", Self::NONPUBLISHABLE),
        ("nonvernacular", Self::NONVERNACULAR),
        ("book", Self::BOOK),
        ("note", Self::NOTE),
    ];

    /// Looks up a property by its stylesheet name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.to_ascii_lowercase();
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == lowered)
            .map(|(_, p)| *p)
    }

    /// True if every flag in `other` is set.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Sets the flags in `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the flags in `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// True if no flag is set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for UsfmTextProperties {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for UsfmTextProperties {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for UsfmTextProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(_, p)| self.contains(*p))
            .map(|(n, _)| *n)
            .collect();
        write!(f, "UsfmTextProperties({})", names.join(" "))
    }
}

/// One entry of a tag's attribute schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UsfmStyleAttribute {
    /// Attribute name.
    pub name: String,
    /// Whether the attribute must be present.
    pub required: bool,
}

/// A stylesheet entry.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UsfmTag {
    /// Marker without the leading backslash.
    pub marker: String,
    /// Human-readable name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Structural role.
    pub style_type: UsfmStyleType,
    /// Kind of text held.
    pub text_type: UsfmTextType,
    /// Property flags.
    pub text_properties: UsfmTextProperties,
    /// Closing marker, if any.
    pub end_marker: Option<String>,
    /// Attribute schema in declaration order.
    pub attributes: Vec<UsfmStyleAttribute>,
    /// Attribute assumed when a value is given without a name.
    pub default_attribute_name: Option<String>,
    /// Markers this one may occur under.
    pub occurs_under: BTreeSet<String>,
    /// Rank among siblings.
    pub rank: i32,
    /// Font family.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: i32,
    /// Bold.
    pub bold: bool,
    /// Italic.
    pub italic: bool,
    /// Underline.
    pub underline: bool,
    /// Superscript.
    pub superscript: bool,
    /// Subscript.
    pub subscript: bool,
    /// Small caps.
    pub small_caps: bool,
    /// Regular weight.
    pub regular: bool,
    /// Color as a packed RGB integer.
    pub color: u32,
    /// Justification.
    pub justification: UsfmJustification,
    /// Space before, in points.
    pub space_before: i32,
    /// Space after, in points.
    pub space_after: i32,
    /// Left margin, in inches.
    pub left_margin: f64,
    /// Right margin, in inches.
    pub right_margin: f64,
    /// First line indent, in inches.
    pub first_line_indent: f64,
    /// Line spacing.
    pub line_spacing: i32,
    /// XML element name.
    pub xml_tag: Option<String>,
    /// Encoding name.
    pub encoding: Option<String>,
    /// May not repeat.
    pub not_repeatable: bool,
}

impl UsfmTag {
    /// Creates an empty tag of unknown style.
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            ..Self::default()
        }
    }

    /// True if the tag has the given property.
    #[must_use]
    pub fn has_property(&self, property: UsfmTextProperties) -> bool {
        self.text_properties.contains(property)
    }

    /// True for verse text and unspecified text.
    #[must_use]
    pub fn is_verse_text_type(&self) -> bool {
        matches!(
            self.text_type,
            UsfmTextType::VerseText | UsfmTextType::NotSpecified
        )
    }

    /// Replaces the attribute schema from a `\Attributes` value.
    ///
    /// A `?` prefix marks an attribute optional. With at most one required
    /// attribute, the first attribute becomes the default. Returns false
    /// when a required attribute follows an optional one.
    pub fn set_attribute_schema(&mut self, value: &str) -> bool {
        let mut ordered = true;
        let mut seen_optional = false;
        self.attributes = value
            .split_whitespace()
            .map(|entry| {
                let (name, required) = match entry.strip_prefix('?') {
                    Some(name) => (name, false),
                    None => (entry, true),
                };
                if required && seen_optional {
                    ordered = false;
                }
                seen_optional |= !required;
                UsfmStyleAttribute {
                    name: name.to_string(),
                    required,
                }
            })
            .collect();

        let required = self.attributes.iter().filter(|a| a.required).count();
        self.default_attribute_name = if required <= 1 {
            self.attributes.first().map(|a| a.name.clone())
        } else {
            None
        };
        ordered
    }
}
