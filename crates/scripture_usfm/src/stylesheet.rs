//! USFM stylesheets (`.sty`).
//!
//! A stylesheet is a list of entries, each introduced by `\Marker name` and
//! followed by `\Field value` lines. Lines starting with `#` are comments,
//! except `#!` lines which are read with the prefix removed.
//!
//! A second file can be layered on top with [`UsfmStylesheet::with_custom`]:
//! its entries modify existing tags or add new ones, and `\Marker name -`
//! deletes a tag.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use scripture_foundation::{Error, ErrorContext, ErrorKind, Result};

use crate::tag::{UsfmJustification, UsfmStyleType, UsfmTag, UsfmTextProperties, UsfmTextType};

const DEFAULT_STY: &str = include_str!("../assets/usfm.sty");

static CELL_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(t[ch][cr]?[1-5])-([2-5])$").expect("valid cell range regex"));

static DEFAULT_STYLESHEET: LazyLock<Arc<UsfmStylesheet>> = LazyLock::new(|| {
    let stylesheet = UsfmStylesheet::parse(DEFAULT_STY, "usfm.sty")
        .unwrap_or_else(|e| panic!("embedded usfm.sty failed to parse: {e}"));
    Arc::new(stylesheet)
});

/// Splits a cell-range marker such as `tc1-3` into its base marker and
/// column span.
///
/// Returns `None` for anything that is not a range spanning at least two
/// columns.
#[must_use]
pub fn is_cell_range(marker: &str) -> Option<(String, u32)> {
    let caps = CELL_RANGE.captures(marker)?;
    let base = caps.get(1)?.as_str();
    let start = base.chars().last()?.to_digit(10)?;
    let end: u32 = caps.get(2)?.as_str().parse().ok()?;
    (end > start).then(|| (base.to_string(), end - start + 1))
}

/// A set of tags keyed by marker.
#[derive(Debug, Clone)]
pub struct UsfmStylesheet {
    name: String,
    tags: HashMap<String, Arc<UsfmTag>>,
}

impl UsfmStylesheet {
    /// The embedded standard USFM 3 stylesheet.
    #[must_use]
    pub fn default_stylesheet() -> Arc<Self> {
        Arc::clone(&DEFAULT_STYLESHEET)
    }

    /// Parses stylesheet text.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidStylesheet`] with the line number when a
    /// field value cannot be understood.
    pub fn parse(text: &str, name: impl Into<String>) -> Result<Self> {
        let mut stylesheet = Self {
            name: name.into(),
            tags: HashMap::new(),
        };
        stylesheet.apply(text)?;
        log::debug!(
            "loaded stylesheet {} ({} tags)",
            stylesheet.name,
            stylesheet.tags.len()
        );
        Ok(stylesheet)
    }

    /// Reads and parses a stylesheet file.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StylesheetMissing`] if the file cannot be read,
    /// or a parse error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_stylesheet(path)?;
        Self::parse(&text, path.display().to_string()).map_err(|e| with_source(e, path))
    }

    /// Layers custom stylesheet text on top of this one.
    ///
    /// # Errors
    ///
    /// Returns an error when a custom line cannot be understood.
    pub fn with_custom(&self, text: &str) -> Result<Self> {
        let mut custom = self.clone();
        custom.apply(text)?;
        log::debug!(
            "layered custom entries on {} ({} tags)",
            custom.name,
            custom.tags.len()
        );
        Ok(custom)
    }

    /// Layers a custom stylesheet file on top of this one.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::StylesheetMissing`] if the file cannot be read,
    /// or a parse error.
    pub fn with_custom_file(&self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_stylesheet(path)?;
        self.with_custom(&text).map_err(|e| with_source(e, path))
    }

    /// Name the stylesheet was loaded under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// True if no tags are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// True if the marker has an entry.
    #[must_use]
    pub fn contains(&self, marker: &str) -> bool {
        self.tags.contains_key(marker)
    }

    /// All tags, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &UsfmTag> {
        self.tags.values().map(AsRef::as_ref)
    }

    /// Looks up a marker.
    ///
    /// Cell-range markers resolve to their base cell marker. Markers with
    /// no entry get a fresh tag of [`UsfmStyleType::Unknown`].
    #[must_use]
    pub fn get_tag(&self, marker: &str) -> Arc<UsfmTag> {
        if let Some(tag) = self.tags.get(marker) {
            return Arc::clone(tag);
        }
        if let Some(tag) = is_cell_range(marker).and_then(|(base, _)| self.tags.get(&base)) {
            return Arc::clone(tag);
        }
        Arc::new(UsfmTag::new(marker))
    }

    fn apply(&mut self, text: &str) -> Result<()> {
        let mut current: Option<String> = None;
        let mut touched: Vec<String> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let mut line = raw.trim().trim_start_matches('\u{feff}');
            if let Some(directive) = line.strip_prefix("#!") {
                line = directive.trim();
            } else if line.starts_with('#') {
                continue;
            }
            if line.is_empty() {
                continue;
            }
            let Some(rest) = line.strip_prefix('\\') else {
                log::warn!("stylesheet line {line_no} is not a field: {line}");
                continue;
            };
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            let field = field.to_ascii_lowercase();

            if field == "marker" {
                let mut parts = value.split_whitespace();
                let marker = parts
                    .next()
                    .ok_or_else(|| Error::invalid_stylesheet(line_no, "missing marker name"))?;
                if parts.next() == Some("-") {
                    self.remove(marker);
                    current = None;
                    continue;
                }
                self.tags
                    .entry(marker.to_string())
                    .or_insert_with(|| Arc::new(UsfmTag::new(marker)));
                touched.push(marker.to_string());
                current = Some(marker.to_string());
                continue;
            }

            let Some(tag) = current.as_ref().and_then(|m| self.tags.get_mut(m)) else {
                log::warn!("stylesheet line {line_no}: \\{field} outside a marker entry");
                continue;
            };
            apply_field(Arc::make_mut(tag), &field, value)
                .map_err(|message| Error::invalid_stylesheet(line_no, message))?;
        }

        for marker in touched {
            self.finish_tag(&marker);
        }
        Ok(())
    }

    fn remove(&mut self, marker: &str) {
        if let Some(tag) = self.tags.remove(marker) {
            if let Some(end) = &tag.end_marker {
                let is_end = self
                    .tags
                    .get(end)
                    .is_some_and(|t| t.style_type == UsfmStyleType::End);
                if is_end {
                    self.tags.remove(end);
                }
            }
        }
    }

    fn finish_tag(&mut self, marker: &str) {
        let Some(tag) = self.tags.get_mut(marker) else {
            return;
        };
        let tag = Arc::make_mut(tag);

        if tag.marker == "id" {
            tag.text_properties.insert(UsfmTextProperties::BOOK);
        }
        if tag.has_property(UsfmTextProperties::NONPUBLISHABLE) {
            tag.text_properties.remove(UsfmTextProperties::PUBLISHABLE);
        }
        if tag.style_type == UsfmStyleType::Character && tag.end_marker.is_none() {
            tag.end_marker = Some(format!("{}*", tag.marker));
        }
        let publishable_by_default = matches!(
            tag.style_type,
            UsfmStyleType::Character | UsfmStyleType::Paragraph
        ) && matches!(
            tag.text_type,
            UsfmTextType::Other | UsfmTextType::NotSpecified
        ) && !tag.has_property(UsfmTextProperties::CHAPTER)
            && !tag.has_property(UsfmTextProperties::VERSE)
            && !tag.has_property(UsfmTextProperties::NONPUBLISHABLE);
        if publishable_by_default {
            tag.text_properties.insert(UsfmTextProperties::PUBLISHABLE);
        }

        let end_style = match tag.style_type {
            UsfmStyleType::Milestone => UsfmStyleType::MilestoneEnd,
            UsfmStyleType::Character | UsfmStyleType::Note | UsfmStyleType::Paragraph => {
                UsfmStyleType::End
            }
            _ => return,
        };
        let Some(end_marker) = tag.end_marker.clone() else {
            return;
        };
        let end_tag = self
            .tags
            .entry(end_marker.clone())
            .or_insert_with(|| Arc::new(UsfmTag::new(end_marker)));
        if end_tag.style_type == UsfmStyleType::Unknown {
            Arc::make_mut(end_tag).style_type = end_style;
        }
    }
}

impl FromStr for UsfmStylesheet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, "custom")
    }
}

fn read_stylesheet(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        log::debug!("cannot read stylesheet {}: {e}", path.display());
        Error::stylesheet_missing(path.display().to_string())
    })
}

fn with_source(error: Error, path: &Path) -> Error {
    let line = match &error.kind {
        ErrorKind::InvalidStylesheet { line, .. } => *line,
        _ => 0,
    };
    error.with_context(
        ErrorContext::new()
            .with_source(path.display().to_string())
            .with_position(line, 1),
    )
}

fn apply_field(tag: &mut UsfmTag, field: &str, value: &str) -> std::result::Result<(), String> {
    let flag = value != "-";
    match field {
        "name" => tag.name = Some(value.to_string()),
        "description" => tag.description = Some(value.to_string()),
        "fontname" => tag.font_name = Some(value.to_string()),
        "xmltag" => tag.xml_tag = Some(value.to_string()),
        "encoding" => tag.encoding = Some(value.to_string()),
        "fontsize" => tag.font_size = parse_number(field, value)?,
        "linespacing" => tag.line_spacing = parse_number(field, value)?,
        "spacebefore" => tag.space_before = parse_number(field, value)?,
        "spaceafter" => tag.space_after = parse_number(field, value)?,
        "rank" => tag.rank = parse_number(field, value)?,
        "color" => tag.color = parse_number(field, value)?,
        "leftmargin" => tag.left_margin = parse_number(field, value)?,
        "rightmargin" => tag.right_margin = parse_number(field, value)?,
        "firstlineindent" => tag.first_line_indent = parse_number(field, value)?,
        "bold" => tag.bold = flag,
        "italic" => tag.italic = flag,
        "underline" => tag.underline = flag,
        "superscript" => tag.superscript = flag,
        "subscript" => tag.subscript = flag,
        "smallcaps" => tag.small_caps = flag,
        "regular" => tag.regular = flag,
        "notrepeatable" => tag.not_repeatable = flag,
        "textproperties" => {
            for name in value.split_whitespace() {
                match UsfmTextProperties::from_name(name) {
                    Some(property) => tag.text_properties.insert(property),
                    None => log::debug!("\\{}: ignoring text property {name}", tag.marker),
                }
            }
        }
        "texttype" => {
            match value.to_ascii_lowercase().as_str() {
                "chapternumber" => tag.text_properties.insert(UsfmTextProperties::CHAPTER),
                "versenumber" => tag.text_properties.insert(UsfmTextProperties::VERSE),
                _ => {}
            }
            tag.text_type = UsfmTextType::from_field(value)
                .ok_or_else(|| format!("unknown text type '{value}'"))?;
        }
        "justification" => {
            tag.justification = UsfmJustification::from_field(value)
                .ok_or_else(|| format!("unknown justification '{value}'"))?;
        }
        "styletype" => {
            tag.style_type = match value.to_ascii_lowercase().as_str() {
                "character" => UsfmStyleType::Character,
                "paragraph" => UsfmStyleType::Paragraph,
                "note" => UsfmStyleType::Note,
                "milestone" => UsfmStyleType::Milestone,
                "milestoneend" => UsfmStyleType::MilestoneEnd,
                _ => return Err(format!("unknown style type '{value}'")),
            };
        }
        "occursunder" => {
            tag.occurs_under = value.split_whitespace().map(str::to_string).collect();
        }
        "endmarker" => tag.end_marker = Some(value.to_string()),
        "attributes" => {
            if !tag.set_attribute_schema(value) {
                log::warn!(
                    "\\{}: required attribute listed after an optional one",
                    tag.marker
                );
            }
        }
        _ => log::debug!("\\{}: ignoring stylesheet field \\{field}", tag.marker),
    }
    Ok(())
}

fn parse_number<T: FromStr>(field: &str, value: &str) -> std::result::Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("\\{field} expects a number, found '{value}'"))
}
