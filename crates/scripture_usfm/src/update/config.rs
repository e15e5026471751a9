//! Updater settings and input rows.

use scripture_versification::ScriptureRef;

/// Settings for [`UpdateUsfmParserHandler`](super::UpdateUsfmParserHandler).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUsfmConfig {
    /// Replaces the text after the book code on the `\id` line.
    pub id_text: Option<String>,
    /// Removes all existing text, whether or not a row replaces it.
    pub strip_all_text: bool,
    /// Keeps existing text where a row also supplies text.
    pub prefer_existing_text: bool,
    /// Lines added as `\rem` paragraphs after the `\id` line.
    pub remarks: Vec<String>,
}

impl UpdateUsfmConfig {
    /// Sets the `\id` text.
    #[must_use]
    pub fn with_id_text(mut self, id_text: impl Into<String>) -> Self {
        self.id_text = Some(id_text.into());
        self
    }

    /// Sets whether all existing text is removed.
    #[must_use]
    pub fn with_strip_all_text(mut self, strip_all_text: bool) -> Self {
        self.strip_all_text = strip_all_text;
        self
    }

    /// Sets whether existing text wins over row text.
    #[must_use]
    pub fn with_prefer_existing_text(mut self, prefer_existing_text: bool) -> Self {
        self.prefer_existing_text = prefer_existing_text;
        self
    }

    /// Adds a `\rem` line.
    #[must_use]
    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remarks.push(remark.into());
        self
    }
}

/// Replacement text for one or more locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUsfmRow {
    /// Locations the text belongs to, in order.
    pub refs: Vec<ScriptureRef>,
    /// The new text.
    pub text: String,
}

impl UpdateUsfmRow {
    /// Creates a row.
    #[must_use]
    pub fn new(refs: Vec<ScriptureRef>, text: impl Into<String>) -> Self {
        Self {
            refs,
            text: text.into(),
        }
    }
}
