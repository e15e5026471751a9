//! Verse references.
//!
//! A [`VerseRef`] addresses a verse, a verse segment (`4b`), a range
//! (`4-6`) or a list (`1,3`) within one chapter of one book, under a
//! specific versification.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use scripture_foundation::{Error, LAST_BOOK, Result, book_id_to_number, book_number_to_id};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::versification::{Versification, VersificationType};

const BOOK_SHIFT: u32 = 1_000_000;
const CHAPTER_SHIFT: u32 = 1_000;
const PART_MAX: u32 = 1_000;

static VERSE_SELECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\p{L}*(?:[,\-]\d+\p{L}*)*$").expect("valid verse selector regex")
});

/// Packs a book, chapter and verse into `bbbcccvvv` form.
#[must_use]
pub fn bbbcccvvv(book: u32, chapter: u32, verse: u32) -> u32 {
    (book % PART_MAX) * BOOK_SHIFT + (chapter % PART_MAX) * CHAPTER_SHIFT + verse % PART_MAX
}

/// Unpacks `bbbcccvvv` into `(book, chapter, verse)`.
#[must_use]
pub fn split_bbbcccvvv(value: u32) -> (u32, u32, u32) {
    (
        value / BOOK_SHIFT,
        value / CHAPTER_SHIFT % PART_MAX,
        value % PART_MAX,
    )
}

/// Result of validating a reference against its versification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValidStatus {
    /// Every verse exists.
    Valid,
    /// The book, chapter or a verse lies outside the versification.
    OutOfRange,
    /// A list or range goes backwards.
    VerseOutOfOrder,
    /// A list or range names the same verse twice.
    VerseRepeated,
}

/// A verse number with its optional segment letters.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VersePiece {
    number: u32,
    segment: String,
}

impl VersePiece {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let digits = text.len() - text.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let number = text.get(..digits)?.parse().ok()?;
        let segment: String = text[digits..]
            .chars()
            .take_while(|c| c.is_alphabetic())
            .collect();
        Some(Self { number, segment })
    }

    /// Segments only break ties when both sides carry one.
    fn overlap_cmp(&self, other: &Self) -> Ordering {
        self.number.cmp(&other.number).then_with(|| {
            if self.segment.is_empty() || other.segment.is_empty() {
                Ordering::Equal
            } else {
                self.segment.cmp(&other.segment)
            }
        })
    }

    fn full_cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.segment.cmp(&other.segment))
    }
}

impl fmt::Display for VersePiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.segment)
    }
}

/// Splits a selector into `(start, end)` pieces, one per comma part.
fn selector_ranges(selector: &str) -> Vec<(VersePiece, VersePiece)> {
    selector
        .split(',')
        .filter_map(|part| match part.split_once('-') {
            Some((a, b)) => Some((VersePiece::parse(a)?, VersePiece::parse(b)?)),
            None => {
                let piece = VersePiece::parse(part)?;
                Some((piece.clone(), piece))
            }
        })
        .collect()
}

/// Returns true if two verse selectors (`"1-3"`, `"2b"`, `"1,4"`) share a verse.
///
/// A whole verse overlaps every segment of itself.
#[must_use]
pub fn are_overlapping_verse_ranges(first: &str, second: &str) -> bool {
    let a = selector_ranges(first);
    let b = selector_ranges(second);
    a.iter().any(|(s1, e1)| {
        b.iter().any(|(s2, e2)| {
            s1.overlap_cmp(e2) != Ordering::Greater && s2.overlap_cmp(e1) != Ordering::Greater
        })
    })
}

/// Merges two verse selectors into the smallest range covering both.
///
/// `merge_verse_ranges("1-3", "2-4") == "1-4"`.
#[must_use]
pub fn merge_verse_ranges(first: &str, second: &str) -> String {
    let mut pieces = selector_ranges(first);
    pieces.extend(selector_ranges(second));
    let start = pieces.iter().map(|(s, _)| s).min_by(|a, b| a.full_cmp(b));
    let end = pieces.iter().map(|(_, e)| e).max_by(|a, b| a.full_cmp(b));
    match (start, end) {
        (Some(start), Some(end)) if start == end => start.to_string(),
        (Some(start), Some(end)) => format!("{start}-{end}"),
        _ => first.to_string(),
    }
}

/// A reference to one or more verses in a chapter.
#[derive(Clone)]
pub struct VerseRef {
    book_num: u32,
    chapter_num: u32,
    verse_num: u32,
    /// Literal selector when it is more than a plain number.
    verse: Option<String>,
    versification: Arc<Versification>,
}

impl Default for VerseRef {
    fn default() -> Self {
        Self::from_numbers(0, 0, 0, Versification::english())
    }
}

impl VerseRef {
    /// Creates a reference from textual parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the book is unknown or the chapter or verse is
    /// not a valid selector.
    pub fn new(
        book: &str,
        chapter: &str,
        verse: &str,
        versification: Arc<Versification>,
    ) -> Result<Self> {
        let book_num = book_id_to_number(book);
        if book_num == 0 {
            return Err(Error::unknown_book(book));
        }
        let chapter_num = chapter
            .trim()
            .parse()
            .map_err(|_| Error::invalid_reference(format!("{book} {chapter}:{verse}")))?;
        let mut verse_ref = Self::from_numbers(book_num, chapter_num, 0, versification);
        verse_ref.set_verse(verse)?;
        Ok(verse_ref)
    }

    /// Creates a single-verse reference from numbers.
    #[must_use]
    pub fn from_numbers(
        book_num: u32,
        chapter_num: u32,
        verse_num: u32,
        versification: Arc<Versification>,
    ) -> Self {
        Self {
            book_num,
            chapter_num,
            verse_num,
            verse: None,
            versification,
        }
    }

    /// Creates a single-verse reference from `bbbcccvvv` form.
    #[must_use]
    pub fn from_bbbcccvvv(value: u32, versification: Arc<Versification>) -> Self {
        let (book, chapter, verse) = split_bbbcccvvv(value);
        Self::from_numbers(book, chapter, verse, versification)
    }

    /// Parses `"MAT 1:1"`, `"MAT 1:4b-5a"` or `"MAT 1:1/4"`.
    ///
    /// A `/n` suffix selects the built-in versification numbered `n` and
    /// overrides `versification`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a verse reference.
    pub fn from_string(text: &str, versification: Arc<Versification>) -> Result<Self> {
        let text = text.trim();
        let (reference, versification) = match text.split_once('/') {
            Some((reference, number)) => {
                let ty = number
                    .trim()
                    .parse()
                    .ok()
                    .and_then(VersificationType::from_number)
                    .ok_or_else(|| Error::invalid_reference(text))?;
                (reference, Versification::get_builtin(ty)?)
            }
            None => (text, versification),
        };

        let (book, chapter_verse) = reference
            .split_once(' ')
            .ok_or_else(|| Error::invalid_reference(text))?;
        let (chapter, verse) = chapter_verse
            .trim()
            .split_once(':')
            .ok_or_else(|| Error::invalid_reference(text))?;
        Self::new(book, chapter, verse, versification)
    }

    /// Book number.
    #[must_use]
    pub fn book_num(&self) -> u32 {
        self.book_num
    }

    /// Chapter number.
    #[must_use]
    pub fn chapter_num(&self) -> u32 {
        self.chapter_num
    }

    /// First verse number of the selector.
    #[must_use]
    pub fn verse_num(&self) -> u32 {
        self.verse_num
    }

    /// Three-letter book code, or an empty string for book 0.
    #[must_use]
    pub fn book(&self) -> &'static str {
        book_number_to_id(self.book_num).unwrap_or("")
    }

    /// Chapter as text.
    #[must_use]
    pub fn chapter(&self) -> String {
        self.chapter_num.to_string()
    }

    /// Verse selector as text.
    #[must_use]
    pub fn verse(&self) -> String {
        self.verse
            .clone()
            .unwrap_or_else(|| self.verse_num.to_string())
    }

    /// The versification this reference is expressed in.
    #[must_use]
    pub fn versification(&self) -> &Arc<Versification> {
        &self.versification
    }

    /// The first verse in `bbbcccvvv` form.
    #[must_use]
    pub fn bbbcccvvv(&self) -> u32 {
        bbbcccvvv(self.book_num, self.chapter_num, self.verse_num)
    }

    /// True for the empty reference (no book).
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.book_num == 0
    }

    /// True when the reference addresses a verse rather than a chapter
    /// introduction (verse 0).
    #[must_use]
    pub fn is_verse(&self) -> bool {
        self.verse_num != 0
    }

    /// True for ranges and lists.
    #[must_use]
    pub fn has_multiple(&self) -> bool {
        self.verse
            .as_deref()
            .is_some_and(|v| v.contains(',') || v.contains('-'))
    }

    /// Segment letters after the first verse number (`"b"` for `4b-5a`).
    #[must_use]
    pub fn segment(&self) -> String {
        self.verse
            .as_deref()
            .and_then(VersePiece::parse)
            .map(|piece| piece.segment)
            .unwrap_or_default()
    }

    /// Sets the book number.
    pub fn set_book_num(&mut self, book_num: u32) {
        self.book_num = book_num;
    }

    /// Sets the chapter number.
    pub fn set_chapter_num(&mut self, chapter_num: u32) {
        self.chapter_num = chapter_num;
    }

    /// Sets a plain verse number, dropping any selector.
    pub fn set_verse_num(&mut self, verse_num: u32) {
        self.verse_num = verse_num;
        self.verse = None;
    }

    /// Sets the verse from a selector such as `"4"`, `"4b"`, `"1-3"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is malformed; the reference is left
    /// unchanged.
    pub fn set_verse(&mut self, verse: &str) -> Result<()> {
        let verse = verse.trim();
        if let Ok(number) = verse.parse() {
            self.set_verse_num(number);
            return Ok(());
        }
        if !VERSE_SELECTOR.is_match(verse) {
            return Err(Error::invalid_reference(format!(
                "{} {}:{verse}",
                self.book(),
                self.chapter_num
            )));
        }
        let first = VersePiece::parse(verse)
            .ok_or_else(|| Error::invalid_reference(verse.to_string()))?;
        self.verse_num = first.number;
        self.verse = Some(verse.to_string());
        Ok(())
    }

    /// Returns a copy addressing a different verse selector.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is malformed.
    pub fn with_verse(&self, verse: &str) -> Result<Self> {
        let mut copy = self.clone();
        copy.set_verse(verse)?;
        Ok(copy)
    }

    fn with_piece(&self, piece: &VersePiece) -> Self {
        let mut copy = self.clone();
        copy.verse_num = piece.number;
        copy.verse = (!piece.segment.is_empty()).then(|| piece.to_string());
        copy
    }

    /// Returns the reference with segments, ranges and lists removed.
    #[must_use]
    pub fn simplify(&self) -> Self {
        Self::from_numbers(
            self.book_num,
            self.chapter_num,
            self.verse_num,
            Arc::clone(&self.versification),
        )
    }

    /// Expands ranges and lists into single verses, sorted.
    #[must_use]
    pub fn all_verses(&self) -> Vec<Self> {
        let mut verses = self.all_verses_in_order();
        verses.sort_by(|a, b| a.compare_single(b, true));
        verses
    }

    /// Expands ranges and lists into single verses, in the order written.
    #[must_use]
    pub fn all_verses_in_order(&self) -> Vec<Self> {
        let Some(selector) = self.verse.as_deref().filter(|_| self.has_multiple()) else {
            return vec![self.clone()];
        };
        let mut verses = Vec::new();
        for (start, end) in selector_ranges(selector) {
            verses.push(self.with_piece(&start));
            if start == end {
                continue;
            }
            for number in start.number + 1..end.number {
                verses.push(self.with_piece(&VersePiece {
                    number,
                    segment: String::new(),
                }));
            }
            verses.push(self.with_piece(&end));
        }
        verses
    }

    /// Last chapter of this book in this versification.
    #[must_use]
    pub fn last_chapter(&self) -> u32 {
        self.versification.last_chapter(self.book_num)
    }

    /// Last verse of this chapter in this versification.
    #[must_use]
    pub fn last_verse(&self) -> u32 {
        self.versification
            .last_verse(self.book_num, self.chapter_num)
    }

    /// Validates every verse against the versification.
    #[must_use]
    pub fn valid_status(&self) -> ValidStatus {
        if !self.has_multiple() {
            return self.valid_status_single();
        }
        let mut previous: Option<(u32, String)> = None;
        for verse in self.all_verses_in_order() {
            let status = verse.valid_status_single();
            if status != ValidStatus::Valid {
                return status;
            }
            let key = (verse.bbbcccvvv(), verse.segment());
            if let Some(prev) = &previous {
                match prev.cmp(&key) {
                    Ordering::Greater => return ValidStatus::VerseOutOfOrder,
                    Ordering::Equal => return ValidStatus::VerseRepeated,
                    Ordering::Less => {}
                }
            }
            previous = Some(key);
        }
        ValidStatus::Valid
    }

    fn valid_status_single(&self) -> ValidStatus {
        if self.book_num == 0 || self.book_num > LAST_BOOK {
            return ValidStatus::OutOfRange;
        }
        if self.chapter_num > self.last_chapter() || self.verse_num > self.last_verse() {
            return ValidStatus::OutOfRange;
        }
        ValidStatus::Valid
    }

    /// Shorthand for `valid_status() == ValidStatus::Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid_status() == ValidStatus::Valid
    }

    /// True if the versification excludes the first verse.
    #[must_use]
    pub fn is_excluded_in_versification(&self) -> bool {
        self.versification.is_excluded(self.bbbcccvvv())
    }

    /// Converts into another versification through the original one.
    ///
    /// Segments survive the conversion. A range or list keeps its shape when
    /// every verse lands in the same chapter; otherwise only its first verse
    /// is converted.
    #[must_use]
    pub fn change_versification(&self, target: &Arc<Versification>) -> Self {
        if *self.versification == **target {
            return self.clone();
        }
        if !self.has_multiple() {
            return self.change_single(target);
        }

        let Some(selector) = self.verse.as_deref() else {
            return self.change_single(target);
        };
        let ranges = selector_ranges(selector);
        let mut mapped_parts = Vec::with_capacity(ranges.len());
        let mut first: Option<Self> = None;
        for (start, end) in &ranges {
            let s = self.with_piece(start).change_single(target);
            let e = self.with_piece(end).change_single(target);
            let anchor = first.get_or_insert_with(|| s.clone());
            let same_chapter = |r: &Self| {
                r.book_num == anchor.book_num && r.chapter_num == anchor.chapter_num
            };
            if !same_chapter(&s) || !same_chapter(&e) {
                return self.with_piece(&ranges[0].0).change_single(target);
            }
            if start == end {
                mapped_parts.push(s.verse());
            } else {
                mapped_parts.push(format!("{}-{}", s.verse(), e.verse()));
            }
        }
        match first {
            Some(mut anchor) => {
                let selector = mapped_parts.join(",");
                if anchor.set_verse(&selector).is_err() {
                    log::debug!("mapped selector {selector} is not valid; keeping {anchor}");
                }
                anchor
            }
            None => self.change_single(target),
        }
    }

    fn change_single(&self, target: &Arc<Versification>) -> Self {
        let original = self.versification.to_original(self.bbbcccvvv());
        let mapped = target.from_original(original);
        let mut result = Self::from_bbbcccvvv(mapped, Arc::clone(target));
        let segment = self.segment();
        if !segment.is_empty() {
            result.verse = Some(format!("{}{segment}", result.verse_num));
        }
        result
    }

    fn compare_single(&self, other: &Self, compare_segments: bool) -> Ordering {
        self.book_num
            .cmp(&other.book_num)
            .then(self.chapter_num.cmp(&other.chapter_num))
            .then(self.verse_num.cmp(&other.verse_num))
            .then_with(|| {
                if compare_segments {
                    self.segment().cmp(&other.segment())
                } else {
                    Ordering::Equal
                }
            })
    }

    /// Orders two references.
    ///
    /// `other` is first converted into this reference's versification. With
    /// `compare_all_verses`, ranges and lists compare verse by verse and a
    /// shorter expansion sorts first; otherwise only the first verse counts.
    /// `compare_segments` decides whether `1:1a` and `1:1b` differ.
    #[must_use]
    pub fn compare_to(
        &self,
        other: &Self,
        compare_all_verses: bool,
        compare_segments: bool,
    ) -> Ordering {
        let converted;
        let other = if *self.versification == *other.versification {
            other
        } else {
            converted = other.change_versification(&self.versification);
            &converted
        };

        if !compare_all_verses {
            return self.compare_single(other, compare_segments);
        }
        let mine = self.all_verses();
        let theirs = other.all_verses();
        mine.iter()
            .zip(&theirs)
            .map(|(a, b)| a.compare_single(b, compare_segments))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| mine.len().cmp(&theirs.len()))
    }

    /// True if both references are in the same chapter and share a verse.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.book_num == other.book_num
            && self.chapter_num == other.chapter_num
            && are_overlapping_verse_ranges(&self.verse(), &other.verse())
    }

    /// Textual form with the `/n` versification suffix.
    #[must_use]
    pub fn to_string_with_versification(&self) -> String {
        format!(
            "{self}/{}",
            self.versification.versification_type().number()
        )
    }
}

impl PartialEq for VerseRef {
    fn eq(&self, other: &Self) -> bool {
        self.book_num == other.book_num
            && self.chapter_num == other.chapter_num
            && self.verse_num == other.verse_num
            && self.verse == other.verse
            && self.versification == other.versification
    }
}

impl Eq for VerseRef {}

impl Hash for VerseRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.book_num.hash(state);
        self.chapter_num.hash(state);
        self.verse_num.hash(state);
        self.verse.hash(state);
        self.versification.name().hash(state);
    }
}

impl PartialOrd for VerseRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare_to(other, true, true))
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book(), self.chapter_num, self.verse())
    }
}

impl fmt::Debug for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerseRef({self} {})", self.versification.name())
    }
}

impl FromStr for VerseRef {
    type Err = Error;

    /// Parses with the English versification unless a `/n` suffix is given.
    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s, Versification::english())
    }
}

#[cfg(feature = "serde")]
impl Serialize for VerseRef {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.to_string_with_versification())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for VerseRef {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
