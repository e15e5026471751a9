//! Scripture references: a verse reference plus a path into non-verse text.
//!
//! `MAT 1:0/3:ip` is the third introduction paragraph of Matthew 1;
//! `MAT 2:3/1:esb/1:ms` is the first section heading inside the first
//! sidebar after verse 3.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use scripture_foundation::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::verse_ref::VerseRef;
use crate::versification::{Versification, VersificationType};

/// One step of a scripture reference path.
///
/// `position` is the 1-based index among siblings with the same marker;
/// 0 means any position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScriptureElement {
    position: u32,
    name: String,
}

impl ScriptureElement {
    /// Creates an element.
    #[must_use]
    pub fn new(position: u32, name: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
        }
    }

    /// Sibling position, 0 for any.
    #[must_use]
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Marker name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The same element at any position.
    #[must_use]
    pub fn to_relaxed(&self) -> Self {
        Self::new(0, self.name.clone())
    }

    /// Orders by position (when `strict`) and then by name.
    #[must_use]
    pub fn compare_to(&self, other: &Self, strict: bool) -> Ordering {
        let by_position = if strict {
            self.position.cmp(&other.position)
        } else {
            Ordering::Equal
        };
        by_position.then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Display for ScriptureElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.position == 0 {
            f.write_str(&self.name)
        } else {
            write!(f, "{}:{}", self.position, self.name)
        }
    }
}

impl FromStr for ScriptureElement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (position, name) = match s.split_once(':') {
            Some((position, name)) => (
                position
                    .parse()
                    .map_err(|_| Error::invalid_reference(s))?,
                name,
            ),
            None => (0, s),
        };
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(Error::invalid_reference(s));
        }
        Ok(Self::new(position, name))
    }
}

/// A verse reference plus an optional path of non-verse elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScriptureRef {
    verse_ref: VerseRef,
    path: Vec<ScriptureElement>,
}

impl ScriptureRef {
    /// Creates a reference.
    #[must_use]
    pub fn new(verse_ref: VerseRef, path: Vec<ScriptureElement>) -> Self {
        Self { verse_ref, path }
    }

    /// Parses `BOOK C:V[/n][/pos:marker]*`.
    ///
    /// A purely numeric first path part selects a built-in versification.
    ///
    /// # Errors
    ///
    /// Returns an error if the verse part or a path element is malformed.
    pub fn parse(text: &str, versification: Arc<Versification>) -> Result<Self> {
        let mut parts = text.trim().split('/');
        let verse_part = parts.next().unwrap_or_default();
        let mut parts = parts.peekable();

        let mut versification = versification;
        if let Some(number) = parts.peek().filter(|p| is_versification_number(p)) {
            let ty = number
                .parse()
                .ok()
                .and_then(VersificationType::from_number)
                .ok_or_else(|| Error::invalid_reference(text))?;
            versification = Versification::get_builtin(ty)?;
            parts.next();
        }

        let verse_ref = VerseRef::from_string(verse_part, versification)?;
        let path = parts
            .map(str::parse)
            .collect::<Result<Vec<ScriptureElement>>>()
            .map_err(|_| Error::invalid_reference(text))?;
        Ok(Self { verse_ref, path })
    }

    /// The verse part.
    #[must_use]
    pub fn verse_ref(&self) -> &VerseRef {
        &self.verse_ref
    }

    /// The non-verse path, outermost first.
    #[must_use]
    pub fn path(&self) -> &[ScriptureElement] {
        &self.path
    }

    /// Book code.
    #[must_use]
    pub fn book(&self) -> &'static str {
        self.verse_ref.book()
    }

    /// Book number.
    #[must_use]
    pub fn book_num(&self) -> u32 {
        self.verse_ref.book_num()
    }

    /// Chapter number.
    #[must_use]
    pub fn chapter_num(&self) -> u32 {
        self.verse_ref.chapter_num()
    }

    /// First verse number.
    #[must_use]
    pub fn verse_num(&self) -> u32 {
        self.verse_ref.verse_num()
    }

    /// Verse selector text.
    #[must_use]
    pub fn verse(&self) -> String {
        self.verse_ref.verse()
    }

    /// True for the empty reference.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verse_ref.is_default()
    }

    /// True when this addresses verse text: a non-zero verse and no path.
    #[must_use]
    pub fn is_verse(&self) -> bool {
        self.verse_ref.is_verse() && self.path.is_empty()
    }

    /// Same reference with every path position relaxed to 0.
    #[must_use]
    pub fn to_relaxed(&self) -> Self {
        Self {
            verse_ref: self.verse_ref.clone(),
            path: self.path.iter().map(ScriptureElement::to_relaxed).collect(),
        }
    }

    /// Same path with the verse part converted to another versification.
    #[must_use]
    pub fn change_versification(&self, target: &Arc<Versification>) -> Self {
        Self {
            verse_ref: self.verse_ref.change_versification(target),
            path: self.path.clone(),
        }
    }

    /// Orders by verse reference, then element by element, then path length.
    ///
    /// `strict` compares element positions; relaxed comparison ignores them.
    #[must_use]
    pub fn compare_to(&self, other: &Self, compare_segments: bool, strict: bool) -> Ordering {
        self.verse_ref
            .compare_to(&other.verse_ref, true, compare_segments)
            .then_with(|| {
                self.path
                    .iter()
                    .zip(&other.path)
                    .map(|(a, b)| a.compare_to(b, strict))
                    .find(|o| o.is_ne())
                    .unwrap_or_else(|| self.path.len().cmp(&other.path.len()))
            })
    }
}

fn is_versification_number(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}

impl From<VerseRef> for ScriptureRef {
    fn from(verse_ref: VerseRef) -> Self {
        Self::new(verse_ref, Vec::new())
    }
}

impl PartialOrd for ScriptureRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare_to(other, true, true))
    }
}

impl fmt::Display for ScriptureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.verse_ref)?;
        for element in &self.path {
            write!(f, "/{element}")?;
        }
        Ok(())
    }
}

impl FromStr for ScriptureRef {
    type Err = Error;

    /// Parses with the English versification unless a `/n` part is given.
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, Versification::english())
    }
}
