//! Versification systems.
//!
//! A [`Versification`] knows how many chapters each book has, how many verses
//! each chapter has, which verses are excluded, which verses are split into
//! lettered segments, and how its verses map onto the original (Hebrew and
//! Greek) numbering. Mappings always go through the original versification,
//! so converting between any two systems is two table lookups.
//!
//! Versifications are read from the line-oriented `.vrs` format:
//!
//! ```text
//! # Versification  "English"
//! GEN 1:31 2:25 3:24
//! MAL 4:1-6 = MAL 3:19-24
//! -ACT 8:37
//! *MAT 1:1,a,b
//! ```

// Book, chapter and verse numbers are bounded well below u32::MAX
#![allow(clippy::cast_possible_truncation)]

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use scripture_foundation::{
    Error, ErrorContext, LAST_BOOK, Result, book_id_to_number, book_number_to_id, is_canonical,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::verse_ref::{VerseRef, bbbcccvvv, split_bbbcccvvv};

/// Last chapter and last verse reported for books that are not scripture.
pub const NON_CANONICAL_LAST: u32 = 998;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^#\s*[Vv]ersification\s+"([^"]+)""#).expect("valid header regex")
});

static VERSE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9]{3})\s+(\d+):(\d+)[a-z]*(?:-(\d+)[a-z]*)?$")
        .expect("valid verse range regex")
});

/// The built-in versification systems.
///
/// The discriminants are the numbers used in the `/n` suffix of a textual
/// verse reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VersificationType {
    /// A versification loaded from a file that is not one of the built-ins.
    Unknown = 0,
    /// Hebrew and Greek numbering. Every mapping targets this system.
    Original = 1,
    /// Greek Septuagint.
    Septuagint = 2,
    /// Latin Vulgate.
    Vulgate = 3,
    /// Most English translations.
    English = 4,
    /// Russian Protestant editions.
    RussianProtestant = 5,
    /// Russian Orthodox editions.
    RussianOrthodox = 6,
}

impl VersificationType {
    /// Every built-in type, in numeric order.
    pub const BUILTIN: [Self; 6] = [
        Self::Original,
        Self::Septuagint,
        Self::Vulgate,
        Self::English,
        Self::RussianProtestant,
        Self::RussianOrthodox,
    ];

    /// Returns the type with the given number.
    #[must_use]
    pub fn from_number(number: u32) -> Option<Self> {
        match number {
            0 => Some(Self::Unknown),
            1 => Some(Self::Original),
            2 => Some(Self::Septuagint),
            3 => Some(Self::Vulgate),
            4 => Some(Self::English),
            5 => Some(Self::RussianProtestant),
            6 => Some(Self::RussianOrthodox),
            _ => None,
        }
    }

    /// Returns the number of this type.
    #[must_use]
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Returns the display name, matching the `.vrs` header of the built-in.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Original => "Original",
            Self::Septuagint => "Septuagint",
            Self::Vulgate => "Vulgate",
            Self::English => "English",
            Self::RussianProtestant => "Russian Protestant",
            Self::RussianOrthodox => "Russian Orthodox",
        }
    }

    /// Looks up a built-in type by display name or file stem
    /// (`"English"`, `"eng"`, `"russian orthodox"`, `"rso"` ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        Self::BUILTIN.into_iter().find(|t| {
            t.name().eq_ignore_ascii_case(&lowered) || t.file_stem() == Some(lowered.as_str())
        })
    }

    fn file_stem(self) -> Option<&'static str> {
        match self {
            Self::Unknown => None,
            Self::Original => Some("org"),
            Self::Septuagint => Some("lxx"),
            Self::Vulgate => Some("vul"),
            Self::English => Some("eng"),
            Self::RussianProtestant => Some("rsc"),
            Self::RussianOrthodox => Some("rso"),
        }
    }

    fn asset(self) -> Option<&'static str> {
        match self {
            Self::Unknown => None,
            Self::Original => Some(include_str!("../assets/org.vrs")),
            Self::Septuagint => Some(include_str!("../assets/lxx.vrs")),
            Self::Vulgate => Some(include_str!("../assets/vul.vrs")),
            Self::English => Some(include_str!("../assets/eng.vrs")),
            Self::RussianProtestant => Some(include_str!("../assets/rsc.vrs")),
            Self::RussianOrthodox => Some(include_str!("../assets/rso.vrs")),
        }
    }
}

impl fmt::Display for VersificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static BUILTINS: LazyLock<Vec<Arc<Versification>>> = LazyLock::new(|| {
    VersificationType::BUILTIN
        .into_iter()
        .map(|ty| {
            let text = ty.asset().unwrap_or_default();
            // The assets are compiled in; a parse failure is a packaging bug.
            let versification = Versification::parse(text, ty.name(), ty)
                .unwrap_or_else(|e| panic!("built-in versification {ty} is invalid: {e}"));
            Arc::new(versification)
        })
        .collect()
});

/// Bidirectional verse tables between a versification and the original.
#[derive(Debug, Clone, Default)]
struct VerseMappings {
    to_original: HashMap<u32, u32>,
    from_original: HashMap<u32, u32>,
}

impl VerseMappings {
    fn add(&mut self, local: u32, original: u32) {
        self.to_original.insert(local, original);
        self.from_original.entry(original).or_insert(local);
    }
}

/// A versification system.
///
/// Immutable once built; share it with `Arc`.
#[derive(Debug, Clone)]
pub struct Versification {
    name: String,
    versification_type: VersificationType,
    description: Option<String>,
    /// Last verse of each chapter, indexed by `book - 1` then `chapter - 1`.
    books: Vec<Vec<u32>>,
    excluded: HashSet<u32>,
    segments: HashMap<u32, Vec<String>>,
    mappings: VerseMappings,
}

impl PartialEq for Versification {
    fn eq(&self, other: &Self) -> bool {
        self.versification_type == other.versification_type && self.name == other.name
    }
}

impl Eq for Versification {}

impl fmt::Display for Versification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Versification {
    /// Returns a shared built-in versification.
    ///
    /// # Errors
    ///
    /// Returns an error for [`VersificationType::Unknown`], which has no
    /// built-in table.
    pub fn get_builtin(ty: VersificationType) -> Result<Arc<Self>> {
        Self::builtin_slot(ty)
            .cloned()
            .ok_or_else(|| Error::unknown_versification(ty.name()))
    }

    /// Returns a built-in versification by name or file stem.
    ///
    /// # Errors
    ///
    /// Returns an error if the name does not match a built-in.
    pub fn get_builtin_by_name(name: &str) -> Result<Arc<Self>> {
        VersificationType::from_name(name)
            .ok_or_else(|| Error::unknown_versification(name))
            .and_then(Self::get_builtin)
    }

    fn builtin_slot(ty: VersificationType) -> Option<&'static Arc<Self>> {
        let index = ty.number().checked_sub(1)? as usize;
        BUILTINS.get(index)
    }

    /// The original versification.
    #[must_use]
    pub fn original() -> Arc<Self> {
        Self::builtin_or_empty(VersificationType::Original)
    }

    /// The English versification, used when a reference names none.
    #[must_use]
    pub fn english() -> Arc<Self> {
        Self::builtin_or_empty(VersificationType::English)
    }

    fn builtin_or_empty(ty: VersificationType) -> Arc<Self> {
        Self::builtin_slot(ty)
            .cloned()
            .unwrap_or_else(|| Arc::new(Self::empty(ty.name(), ty)))
    }

    fn empty(name: impl Into<String>, versification_type: VersificationType) -> Self {
        Self {
            name: name.into(),
            versification_type,
            description: None,
            books: Vec::new(),
            excluded: HashSet::new(),
            segments: HashMap::new(),
            mappings: VerseMappings::default(),
        }
    }

    /// Parses `.vrs` text.
    ///
    /// A `# Versification "Name"` header overrides `fallback_name`. The type
    /// is taken from the header name when it names a built-in.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidVersification`](scripture_foundation::ErrorKind::InvalidVersification)
    /// with the offending line number when a line cannot be understood.
    pub fn load(text: &str, fallback_name: &str) -> Result<Self> {
        let name = header_name(text).unwrap_or_else(|| fallback_name.to_string());
        let ty = VersificationType::from_name(&name).unwrap_or(VersificationType::Unknown);
        Self::parse(text, name, ty)
    }

    /// Reads and parses a `.vrs` file. The file stem is the fallback name.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a parse error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| Error::io(path.display().to_string(), &e))?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::load(&text, &stem).map_err(|e| {
            let line = match &e.kind {
                scripture_foundation::ErrorKind::InvalidVersification { line, .. } => *line,
                _ => 0,
            };
            e.with_context(
                ErrorContext::new()
                    .with_source(path.display().to_string())
                    .with_position(line, 1),
            )
        })
    }

    /// Parses `.vrs` text with an explicit name and type.
    ///
    /// # Errors
    ///
    /// Returns an error when a line cannot be understood.
    pub fn parse(
        text: &str,
        name: impl Into<String>,
        versification_type: VersificationType,
    ) -> Result<Self> {
        let mut versification = Self::empty(name, versification_type);
        versification.apply(text)?;
        log::debug!(
            "loaded versification {} ({} books, {} mappings, {} excluded verses)",
            versification.name,
            versification.books.len(),
            versification.mappings.to_original.len(),
            versification.excluded.len()
        );
        Ok(versification)
    }

    /// Layers custom `.vrs` lines on top of this versification.
    ///
    /// Book lines replace that book's chapter table; mapping, excluded and
    /// segment lines are added. The result keeps this versification's type
    /// and takes `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when a custom line cannot be understood.
    pub fn with_custom(&self, text: &str, name: impl Into<String>) -> Result<Self> {
        let mut custom = self.clone();
        custom.name = name.into();
        custom.apply(text)?;
        Ok(custom)
    }

    fn apply(&mut self, text: &str) -> Result<()> {
        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let mut line = raw.trim().trim_start_matches('\u{feff}');
            if let Some(directive) = line.strip_prefix("#!") {
                line = directive.trim();
            } else if line.starts_with('#') {
                if self.description.is_none() && line_no == 2 {
                    let desc = line.trim_start_matches('#').trim();
                    if !desc.is_empty() {
                        self.description = Some(desc.to_string());
                    }
                }
                continue;
            }
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix('-') {
                self.parse_excluded(rest, line_no)?;
            } else if let Some(rest) = line.strip_prefix('*') {
                self.parse_segments(rest, line_no)?;
            } else if line.contains('=') {
                self.parse_mapping(line.trim_start_matches('&'), line_no)?;
            } else if line.contains(',') {
                self.parse_segments(line, line_no)?;
            } else {
                self.parse_book_line(line, line_no)?;
            }
        }
        Ok(())
    }

    fn parse_book_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        let mut parts = line.split_whitespace();
        let code = parts.next().unwrap_or_default();
        let book = book_id_to_number(code);
        if book == 0 {
            return Err(Error::invalid_versification(
                line_no,
                format!("unknown book {code}"),
            ));
        }

        let mut chapters = Vec::new();
        for entry in parts {
            let (chapter, verse) = entry
                .split_once(':')
                .and_then(|(c, v)| Some((c.parse::<u32>().ok()?, v.parse::<u32>().ok()?)))
                .ok_or_else(|| {
                    Error::invalid_versification(line_no, format!("bad chapter entry {entry}"))
                })?;
            if chapter as usize != chapters.len() + 1 {
                return Err(Error::invalid_versification(
                    line_no,
                    format!("chapter {chapter} of {code} is out of sequence"),
                ));
            }
            chapters.push(verse);
        }

        let index = (book - 1) as usize;
        if self.books.len() <= index {
            self.books.resize(index + 1, Vec::new());
        }
        self.books[index] = chapters;
        Ok(())
    }

    fn parse_mapping(&mut self, line: &str, line_no: usize) -> Result<()> {
        let (left, right) = line
            .split_once('=')
            .ok_or_else(|| Error::invalid_versification(line_no, "mapping without '='"))?;
        let local = parse_range(left, line_no)?;
        let original = parse_range(right, line_no)?;
        match (local.as_slice(), original.as_slice()) {
            (l, o) if l.len() == o.len() => {
                for (l, o) in l.iter().zip(o) {
                    self.mappings.add(*l, *o);
                }
            }
            // Many-to-one: one verse here covers several original verses,
            // or the reverse.
            ([l], o) => {
                self.mappings.to_original.insert(*l, o[0]);
                for o in o {
                    self.mappings.from_original.entry(*o).or_insert(*l);
                }
            }
            (l, [o]) => {
                for l in l {
                    self.mappings.to_original.insert(*l, *o);
                }
                self.mappings.from_original.entry(*o).or_insert(l[0]);
            }
            _ => log::warn!(
                "skipping versification mapping on line {line_no}: ranges differ in length ({line})"
            ),
        }
        Ok(())
    }

    fn parse_excluded(&mut self, text: &str, line_no: usize) -> Result<()> {
        self.excluded.extend(parse_range(text, line_no)?);
        Ok(())
    }

    fn parse_segments(&mut self, text: &str, line_no: usize) -> Result<()> {
        let mut parts = text.split(',').map(str::trim);
        let verse = parts.next().unwrap_or_default();
        let range = parse_range(verse, line_no)?;
        let [key] = range.as_slice() else {
            return Err(Error::invalid_versification(
                line_no,
                "segment line must name a single verse",
            ));
        };
        let segments: Vec<String> = parts
            .map(|s| if s == "-" { String::new() } else { s.to_string() })
            .collect();
        if segments.is_empty() {
            return Err(Error::invalid_versification(line_no, "segment line without segments"));
        }
        self.segments.insert(*key, segments);
        Ok(())
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The built-in type, or [`VersificationType::Unknown`] for custom files.
    #[must_use]
    pub fn versification_type(&self) -> VersificationType {
        self.versification_type
    }

    /// The description line from the file header, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Number of the last book with a chapter table.
    #[must_use]
    pub fn last_book(&self) -> u32 {
        self.books.len() as u32
    }

    /// Number of the last chapter of a book.
    ///
    /// Non-scripture books report [`NON_CANONICAL_LAST`]; canonical books
    /// missing from the tables report a single chapter.
    #[must_use]
    pub fn last_chapter(&self, book: u32) -> u32 {
        if book == 0 || book > LAST_BOOK {
            return 0;
        }
        if !is_canonical(book) {
            return NON_CANONICAL_LAST;
        }
        match self.books.get((book - 1) as usize) {
            Some(chapters) if !chapters.is_empty() => chapters.len() as u32,
            _ => 1,
        }
    }

    /// Number of the last verse of a chapter.
    ///
    /// Non-scripture books report [`NON_CANONICAL_LAST`]; chapters outside
    /// the tables report a single verse.
    #[must_use]
    pub fn last_verse(&self, book: u32, chapter: u32) -> u32 {
        if book == 0 || book > LAST_BOOK {
            return 0;
        }
        if !is_canonical(book) {
            return NON_CANONICAL_LAST;
        }
        self.books
            .get((book - 1) as usize)
            .and_then(|chapters| chapters.get(chapter.checked_sub(1)? as usize))
            .copied()
            .unwrap_or(1)
    }

    /// Returns true if the verse (`bbbcccvvv` form) is excluded.
    #[must_use]
    pub fn is_excluded(&self, bbbcccvvv: u32) -> bool {
        self.excluded.contains(&bbbcccvvv)
    }

    /// The segment letters declared for a verse (`bbbcccvvv` form).
    ///
    /// An empty string stands for the unlettered first part.
    #[must_use]
    pub fn verse_segments(&self, bbbcccvvv: u32) -> Option<&[String]> {
        self.segments.get(&bbbcccvvv).map(Vec::as_slice)
    }

    /// First verse of a chapter that is not excluded.
    #[must_use]
    pub fn first_included_verse(&self, book: u32, chapter: u32) -> Option<u32> {
        (1..=self.last_verse(book, chapter)).find(|v| !self.is_excluded(bbbcccvvv(book, chapter, *v)))
    }

    /// Maps a verse of this versification to the original versification.
    #[must_use]
    pub fn to_original(&self, verse: u32) -> u32 {
        self.mappings.to_original.get(&verse).copied().unwrap_or(verse)
    }

    /// Maps a verse of the original versification to this one.
    #[must_use]
    pub fn from_original(&self, verse: u32) -> u32 {
        self.mappings.from_original.get(&verse).copied().unwrap_or(verse)
    }

    /// Returns true if this versification maps the verse to a different
    /// original verse.
    #[must_use]
    pub fn has_mapping(&self, verse: u32) -> bool {
        self.mappings.to_original.contains_key(&verse)
    }

    /// Converts a reference into this versification.
    #[must_use]
    pub fn change_versification(self: &Arc<Self>, verse_ref: &VerseRef) -> VerseRef {
        verse_ref.change_versification(self)
    }

    /// Renders this versification back to `.vrs` text.
    #[must_use]
    pub fn to_vrs(&self) -> String {
        let mut out = format!("# Versification  \"{}\"\n", self.name);
        if let Some(desc) = &self.description {
            out.push_str(&format!("# {desc}\n"));
        }
        for (index, chapters) in self.books.iter().enumerate() {
            if chapters.is_empty() {
                continue;
            }
            let Some(code) = book_number_to_id(index as u32 + 1) else {
                continue;
            };
            out.push_str(code);
            for (c, v) in chapters.iter().enumerate() {
                out.push_str(&format!(" {}:{v}", c + 1));
            }
            out.push('\n');
        }

        let mut mappings: Vec<_> = self.mappings.to_original.iter().collect();
        mappings.sort();
        for (local, original) in mappings {
            out.push_str(&format!("{} = {}\n", format_key(*local), format_key(*original)));
        }
        let mut excluded: Vec<_> = self.excluded.iter().collect();
        excluded.sort();
        for verse in excluded {
            out.push_str(&format!("-{}\n", format_key(*verse)));
        }
        let mut segments: Vec<_> = self.segments.iter().collect();
        segments.sort();
        for (verse, segs) in segments {
            let segs: Vec<&str> = segs
                .iter()
                .map(|s| if s.is_empty() { "-" } else { s.as_str() })
                .collect();
            out.push_str(&format!("*{},{}\n", format_key(*verse), segs.join(",")));
        }
        out
    }
}

fn header_name(text: &str) -> Option<String> {
    text.lines()
        .take_while(|line| line.trim_start().starts_with('#') || line.trim().is_empty())
        .find_map(|line| HEADER.captures(line.trim()))
        .map(|caps| caps[1].trim().to_string())
}

/// Parses `BOOK C:V` or `BOOK C:V-W` into `bbbcccvvv` keys.
fn parse_range(text: &str, line_no: usize) -> Result<Vec<u32>> {
    let text = text.trim();
    let caps = VERSE_RANGE
        .captures(text)
        .ok_or_else(|| Error::invalid_versification(line_no, format!("bad verse {text}")))?;
    let book = book_id_to_number(&caps[1]);
    if book == 0 {
        return Err(Error::invalid_versification(
            line_no,
            format!("unknown book {}", &caps[1]),
        ));
    }
    let number = |s: &str| {
        s.parse::<u32>()
            .map_err(|_| Error::invalid_versification(line_no, format!("bad number {s}")))
    };
    let chapter = number(&caps[2])?;
    let first = number(&caps[3])?;
    let last = match caps.get(4) {
        Some(m) => number(m.as_str())?,
        None => first,
    };
    if last < first {
        return Err(Error::invalid_versification(
            line_no,
            format!("reversed range {text}"),
        ));
    }
    Ok((first..=last).map(|v| bbbcccvvv(book, chapter, v)).collect())
}

fn format_key(key: u32) -> String {
    let (book, chapter, verse) = split_bbbcccvvv(key);
    format!(
        "{} {chapter}:{verse}",
        book_number_to_id(book).unwrap_or("???")
    )
}
