//! Checking a document's chapters and verses against a versification.
//!
//! [`UsfmVersificationChecker`] listens to chapter and verse events and
//! reports every place where the document and the versification disagree:
//! chapters or verses that are missing, verses that should not exist,
//! malformed ranges and lettered segments.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use scripture_foundation::{book_number_to_id, is_canonical};
use scripture_versification::{ValidStatus, VerseRef, Versification, bbbcccvvv};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::handler::UsfmParserHandler;
use crate::parser::parse_usfm;
use crate::state::UsfmParserState;

/// Kind of disagreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UsfmVersificationErrorType {
    /// A chapter of the book never appears.
    MissingChapter,
    /// A verse of a chapter never appears.
    MissingVerse,
    /// A verse lies outside the versification or is excluded by it.
    ExtraVerse,
    /// A verse range goes backwards or repeats a verse.
    InvalidVerseRange,
    /// A verse appears without a segment letter the versification requires.
    MissingVerseSegment,
    /// A verse carries a segment letter the versification does not declare.
    ExtraVerseSegment,
}

impl UsfmVersificationErrorType {
    /// Upper-case name, such as `MISSING_VERSE`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingChapter => "MISSING_CHAPTER",
            Self::MissingVerse => "MISSING_VERSE",
            Self::ExtraVerse => "EXTRA_VERSE",
            Self::InvalidVerseRange => "INVALID_VERSE_RANGE",
            Self::MissingVerseSegment => "MISSING_VERSE_SEGMENT",
            Self::ExtraVerseSegment => "EXTRA_VERSE_SEGMENT",
        }
    }
}

impl fmt::Display for UsfmVersificationErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One disagreement between a document and its versification.
///
/// `expected` is what the versification calls for and `actual` what the
/// document has, both as `chapter:verse` text. Either is absent when the
/// error has nothing to show on that side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UsfmVersificationError {
    /// The kind of error.
    pub error_type: UsfmVersificationErrorType,
    /// Book number.
    pub book_num: u32,
    /// What the versification expects.
    pub expected: Option<String>,
    /// What the document contains.
    pub actual: Option<String>,
}

impl UsfmVersificationError {
    fn new(
        error_type: UsfmVersificationErrorType,
        book_num: u32,
        expected: Option<String>,
        actual: Option<String>,
    ) -> Self {
        Self {
            error_type,
            book_num,
            expected,
            actual,
        }
    }

    /// Book code.
    #[must_use]
    pub fn book(&self) -> &'static str {
        book_number_to_id(self.book_num).unwrap_or_default()
    }
}

impl fmt::Display for UsfmVersificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.error_type, self.book())?;
        if let Some(expected) = &self.expected {
            write!(f, " expected {expected}")?;
        }
        if let Some(actual) = &self.actual {
            write!(f, " found {actual}")?;
        }
        Ok(())
    }
}

/// Handler that compares chapters and verses with a versification.
#[derive(Debug)]
pub struct UsfmVersificationChecker {
    versification: Arc<Versification>,
    errors: Vec<UsfmVersificationError>,
    book_num: u32,
    chapter_num: u32,
    chapters: BTreeSet<u32>,
    verses: BTreeSet<u32>,
}

impl UsfmVersificationChecker {
    /// Creates a checker. The versification should be the one the parser
    /// uses.
    #[must_use]
    pub fn new(versification: Arc<Versification>) -> Self {
        Self {
            versification,
            errors: Vec::new(),
            book_num: 0,
            chapter_num: 0,
            chapters: BTreeSet::new(),
            verses: BTreeSet::new(),
        }
    }

    /// Errors found so far, in document order within each book.
    #[must_use]
    pub fn errors(&self) -> &[UsfmVersificationError] {
        &self.errors
    }

    /// Unwraps the errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<UsfmVersificationError> {
        self.errors
    }

    fn checking(&self) -> bool {
        is_canonical(self.book_num)
    }

    fn push(
        &mut self,
        error_type: UsfmVersificationErrorType,
        expected: Option<String>,
        actual: Option<String>,
    ) {
        let error = UsfmVersificationError::new(error_type, self.book_num, expected, actual);
        log::debug!("versification check: {error}");
        self.errors.push(error);
    }

    fn begin_book(&mut self, book_num: u32) {
        self.finish_book();
        self.book_num = book_num;
        self.chapter_num = 0;
        self.chapters.clear();
        self.verses.clear();
    }

    fn finish_book(&mut self) {
        self.finish_chapter();
        if !self.checking() {
            return;
        }
        for chapter in 1..=self.versification.last_chapter(self.book_num) {
            if !self.chapters.contains(&chapter) {
                self.push(
                    UsfmVersificationErrorType::MissingChapter,
                    Some(chapter.to_string()),
                    None,
                );
            }
        }
        self.book_num = 0;
    }

    fn begin_chapter(&mut self, chapter_num: u32) {
        self.finish_chapter();
        self.chapter_num = chapter_num;
        self.chapters.insert(chapter_num);
        self.verses.clear();
    }

    fn finish_chapter(&mut self) {
        let (book, chapter) = (self.book_num, self.chapter_num);
        if !self.checking() || chapter == 0 || chapter > self.versification.last_chapter(book) {
            return;
        }
        for verse in 1..=self.versification.last_verse(book, chapter) {
            let excluded = self.versification.is_excluded(bbbcccvvv(book, chapter, verse));
            if !excluded && !self.verses.contains(&verse) {
                self.push(
                    UsfmVersificationErrorType::MissingVerse,
                    Some(format!("{chapter}:{verse}")),
                    None,
                );
            }
        }
        self.chapter_num = 0;
    }

    fn check_verse(&mut self, verse_ref: &VerseRef) {
        if !self.checking() || self.chapter_num == 0 {
            return;
        }
        let actual = format!("{}:{}", verse_ref.chapter_num(), verse_ref.verse());
        match verse_ref.valid_status() {
            ValidStatus::Valid => {}
            ValidStatus::OutOfRange => {
                self.push(UsfmVersificationErrorType::ExtraVerse, None, Some(actual));
                return;
            }
            ValidStatus::VerseOutOfOrder | ValidStatus::VerseRepeated => {
                self.push(UsfmVersificationErrorType::InvalidVerseRange, None, Some(actual));
                return;
            }
        }

        for verse in verse_ref.all_verses() {
            self.verses.insert(verse.verse_num());
            let key = verse.bbbcccvvv();
            let single = format!("{}:{}", verse.chapter_num(), verse.verse());
            if self.versification.is_excluded(key) {
                self.push(UsfmVersificationErrorType::ExtraVerse, None, Some(single));
                continue;
            }
            let segment = verse.segment();
            let declared = self.versification.verse_segments(key);
            let expected = format!("{}:{}", verse.chapter_num(), verse.verse_num());
            match declared {
                Some(segments) if segment.is_empty() && !segments.iter().any(String::is_empty) => {
                    let first = segments.first().cloned().unwrap_or_default();
                    self.push(
                        UsfmVersificationErrorType::MissingVerseSegment,
                        Some(format!("{expected}{first}")),
                        Some(single),
                    );
                }
                _ if !segment.is_empty()
                    && !declared.is_some_and(|s| s.contains(&segment)) =>
                {
                    self.push(
                        UsfmVersificationErrorType::ExtraVerseSegment,
                        Some(expected),
                        Some(single),
                    );
                }
                _ => {}
            }
        }
    }
}

impl UsfmParserHandler for UsfmVersificationChecker {
    fn start_book(&mut self, state: &UsfmParserState, _marker: &str, _code: &str) {
        self.begin_book(state.verse_ref().book_num());
    }

    fn chapter(
        &mut self,
        state: &UsfmParserState,
        _number: &str,
        _marker: &str,
        _alt_number: Option<&str>,
        _pub_number: Option<&str>,
    ) {
        self.begin_chapter(state.verse_ref().chapter_num());
    }

    fn verse(
        &mut self,
        state: &UsfmParserState,
        _number: &str,
        _marker: &str,
        _alt_number: Option<&str>,
        _pub_number: Option<&str>,
    ) {
        self.check_verse(state.verse_ref());
    }

    fn end_usfm(&mut self, _state: &UsfmParserState) {
        self.finish_book();
    }
}

/// Parses `usfm` and returns the versification errors it contains.
#[must_use]
pub fn check_usfm_versification(
    usfm: &str,
    versification: Arc<Versification>,
) -> Vec<UsfmVersificationError> {
    let mut checker = UsfmVersificationChecker::new(Arc::clone(&versification));
    parse_usfm(usfm, &mut checker, None, Some(versification));
    checker.into_errors()
}
