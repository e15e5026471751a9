//! Tokenizer for USFM.
//!
//! The tokenizer converts USFM source text into a stream of tokens and
//! writes token streams back out with canonical whitespace.

use std::sync::Arc;

use crate::stylesheet::UsfmStylesheet;
use crate::tag::{UsfmStyleType, UsfmTextProperties};
use crate::token::{UsfmToken, UsfmTokenType};

const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// Tokenizer settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Keep text whitespace as written instead of collapsing runs to a
    /// single space. A single space after a marker is still consumed as
    /// its separator; line breaks stay in the text.
    pub preserve_whitespace: bool,
}

impl TokenizerOptions {
    /// Sets whether whitespace is preserved.
    #[must_use]
    pub fn with_preserve_whitespace(mut self, preserve_whitespace: bool) -> Self {
        self.preserve_whitespace = preserve_whitespace;
        self
    }
}

/// Converts between USFM text and tokens.
#[derive(Debug, Clone)]
pub struct UsfmTokenizer {
    stylesheet: Arc<UsfmStylesheet>,
    options: TokenizerOptions,
}

impl Default for UsfmTokenizer {
    fn default() -> Self {
        Self::new(UsfmStylesheet::default_stylesheet())
    }
}

impl UsfmTokenizer {
    /// Creates a tokenizer for the given stylesheet.
    #[must_use]
    pub fn new(stylesheet: Arc<UsfmStylesheet>) -> Self {
        Self {
            stylesheet,
            options: TokenizerOptions::default(),
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: TokenizerOptions) -> Self {
        self.options = options;
        self
    }

    /// The stylesheet used to classify markers.
    #[must_use]
    pub fn stylesheet(&self) -> &Arc<UsfmStylesheet> {
        &self.stylesheet
    }

    /// Tokenizes USFM source. Never fails: unknown markers become
    /// [`UsfmTokenType::Unknown`] tokens.
    #[must_use]
    pub fn tokenize(&self, usfm: &str) -> Vec<UsfmToken> {
        Scan::new(self, usfm).run()
    }

    /// Writes tokens back out as USFM.
    ///
    /// Unless whitespace is preserved, book, chapter and paragraph markers
    /// start a new line, as do verses not directly after `(` or `[`, and the
    /// result ends with a line break.
    #[must_use]
    pub fn detokenize(&self, tokens: &[UsfmToken]) -> String {
        write_tokens(tokens, self.options.preserve_whitespace)
    }
}

/// Writes tokens back out as USFM with canonical whitespace.
#[must_use]
pub fn detokenize(tokens: &[UsfmToken]) -> String {
    write_tokens(tokens, false)
}

fn write_tokens(tokens: &[UsfmToken], tokens_have_whitespace: bool) -> String {
    let mut usfm = String::new();
    for token in tokens {
        match token.token_type {
            UsfmTokenType::Book | UsfmTokenType::Chapter | UsfmTokenType::Paragraph => {
                if !tokens_have_whitespace {
                    trim_trailing_spaces(&mut usfm);
                    usfm.push_str("\r\n");
                }
            }
            UsfmTokenType::Verse => {
                if !tokens_have_whitespace && !usfm.is_empty() && !usfm.ends_with(['(', '[']) {
                    trim_trailing_spaces(&mut usfm);
                    usfm.push_str("\r\n");
                }
            }
            _ => {}
        }
        usfm.push_str(&token.to_usfm());
    }

    if tokens_have_whitespace {
        return usfm;
    }
    let mut usfm = usfm.trim_start_matches([' ', '\r', '\n']).to_string();
    trim_trailing_spaces(&mut usfm);
    if !usfm.ends_with("\r\n") {
        usfm.push_str("\r\n");
    }
    usfm
}

fn trim_trailing_spaces(usfm: &mut String) {
    let len = usfm.trim_end_matches(' ').len();
    usfm.truncate(len);
}

/// Whitespace that USFM treats as interchangeable. Non-breaking spaces are
/// content.
fn is_collapsible_space(ch: char) -> bool {
    (ch.is_whitespace() && !matches!(ch, '\u{00A0}' | '\u{2007}' | '\u{202F}'))
        || ch.is_control()
}

/// Collapses whitespace and control characters to single spaces and drops
/// a zero-width space that precedes whitespace.
fn regularize_spaces(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut was_space = false;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == ZERO_WIDTH_SPACE && chars.peek().copied().is_some_and(is_collapsible_space) {
            continue;
        }
        if is_collapsible_space(ch) {
            if !was_space {
                result.push(' ');
                was_space = true;
            }
        } else {
            result.push(ch);
            was_space = false;
        }
    }
    result
}

/// Byte offsets where each line starts, for line and column lookup.
struct LineIndex<'src> {
    source: &'src str,
    starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    fn new(source: &'src str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { source, starts }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn position(&self, offset: usize) -> (u32, u32) {
        let line = self.starts.partition_point(|&s| s <= offset).max(1);
        let start = self.starts[line - 1];
        let column = self.source[start..offset].chars().count() + 1;
        (line as u32, column as u32)
    }
}

/// One pass over a source string.
struct Scan<'t, 'src> {
    tokenizer: &'t UsfmTokenizer,
    source: &'src str,
    lines: LineIndex<'src>,
    position: usize,
    tokens: Vec<UsfmToken>,
}

impl<'t, 'src> Scan<'t, 'src> {
    fn new(tokenizer: &'t UsfmTokenizer, source: &'src str) -> Self {
        Self {
            tokenizer,
            source,
            lines: LineIndex::new(source),
            position: 0,
            tokens: Vec::new(),
        }
    }

    fn preserve(&self) -> bool {
        self.tokenizer.options.preserve_whitespace
    }

    fn run(mut self) -> Vec<UsfmToken> {
        while self.position < self.source.len() {
            let next_marker = self.find_backslash(self.position);
            if next_marker > self.position {
                self.scan_text(next_marker);
            } else {
                self.scan_marker();
            }
        }
        self.tokens
    }

    fn find_backslash(&self, from: usize) -> usize {
        self.source[from..]
            .find('\\')
            .map_or(self.source.len(), |i| from + i)
    }

    fn located(&self, token: UsfmToken, offset: usize) -> UsfmToken {
        let (line, column) = self.lines.position(offset);
        token.at(line, column)
    }

    fn normalize(&self, raw: &str) -> String {
        if self.preserve() {
            raw.to_string()
        } else {
            regularize_spaces(raw)
        }
    }

    fn scan_text(&mut self, end: usize) {
        let source = self.source;
        let start = self.position;
        let raw = &source[start..end];
        let mut text = self.normalize(raw);
        let attribute = raw
            .find('|')
            .and_then(|bar| self.split_attributes(end, &mut text, start + bar));

        if !text.is_empty() {
            let token = self.located(UsfmToken::new_text(text), start);
            self.tokens.push(token);
        }
        if let Some(attribute) = attribute {
            self.tokens.push(attribute);
        }
        self.position = end;
    }

    /// Reads the marker name starting just after a backslash.
    fn read_marker(&self, from: usize) -> usize {
        let mut end = from;
        for ch in self.source[from..].chars() {
            if ch.is_whitespace() || ch == '\\' || ch == '|' {
                break;
            }
            end += ch.len_utf8();
            if ch == '*' {
                break;
            }
        }
        end
    }

    /// Moves the attribute section of `text` onto the start token it
    /// belongs to.
    ///
    /// Returns the attribute token to emit for character styles. Milestones
    /// keep their attribute text on the milestone token itself.
    fn split_attributes(
        &mut self,
        next_marker: usize,
        text: &mut String,
        bar_offset: usize,
    ) -> Option<UsfmToken> {
        let bar = text.find('|')?;
        if next_marker >= self.source.len() {
            return None;
        }
        let closing_end = self.read_marker(next_marker + 1);
        let closing = &self.source[next_marker + 1..closing_end];
        let index = find_matching_start(&self.tokens, closing)?;

        let tag = self
            .tokenizer
            .stylesheet
            .get_tag(self.tokens[index].nestless_marker().unwrap_or_default());
        let is_milestone = match tag.style_type {
            UsfmStyleType::Character => false,
            UsfmStyleType::Milestone | UsfmStyleType::MilestoneEnd => true,
            _ => return None,
        };

        let raw = text[bar + 1..].trim().to_string();
        let start = &mut self.tokens[index];
        if !start.set_attributes(&raw, tag.default_attribute_name.as_deref()) {
            return None;
        }
        text.truncate(bar);
        if is_milestone {
            start.text = Some(raw);
            return None;
        }
        let marker = start.marker.clone();
        let token = UsfmToken::new(UsfmTokenType::Attribute, marker, Some(raw), None);
        Some(self.located(token, bar_offset))
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.source[self.position..];
        self.position += rest.len() - rest.trim_start_matches(is_collapsible_space).len();
    }

    /// Consumes the separator after a marker or its data.
    fn skip_separator(&mut self) {
        if self.preserve() {
            if self.source[self.position..].starts_with(' ') {
                self.position += 1;
            }
        } else {
            self.skip_whitespace();
        }
    }

    /// Reads the whitespace-delimited word after a marker.
    fn next_word(&mut self) -> String {
        self.skip_whitespace();
        let source = self.source;
        let rest = &source[self.position..];
        let len = rest
            .find(|c: char| c.is_whitespace() || c == '\\')
            .unwrap_or(rest.len());
        self.position += len;
        self.skip_separator();
        rest[..len].to_string()
    }

    fn is_at_milestone_end(&self) -> bool {
        let rest = &self.source[self.position..];
        rest.find('\\')
            .is_some_and(|i| rest[i + 1..].starts_with('*'))
    }

    fn scan_marker(&mut self) {
        let backslash = self.position;
        let marker_end = self.read_marker(backslash + 1);
        let marker = self.source[backslash + 1..marker_end].to_string();
        self.position = marker_end;

        if marker == "*" && self.close_milestone() {
            return;
        }
        if !marker.ends_with('*') {
            self.skip_separator();
        }

        let stylesheet = &self.tokenizer.stylesheet;
        let mut tag = stylesheet.get_tag(marker.trim_start_matches('+'));
        if marker.starts_with('+')
            && !matches!(tag.style_type, UsfmStyleType::Character | UsfmStyleType::End)
        {
            tag = stylesheet.get_tag(&marker);
        }
        let end_marker = tag.end_marker.clone();

        let token = match tag.style_type {
            UsfmStyleType::Character if tag.has_property(UsfmTextProperties::VERSE) => {
                let data = self.next_word();
                UsfmToken::new_marker(UsfmTokenType::Verse, marker).with_data(data)
            }
            UsfmStyleType::Character => {
                UsfmToken::new(UsfmTokenType::Character, Some(marker), None, end_marker)
            }
            UsfmStyleType::Paragraph if tag.has_property(UsfmTextProperties::CHAPTER) => {
                let data = self.next_word();
                UsfmToken::new_marker(UsfmTokenType::Chapter, marker).with_data(data)
            }
            UsfmStyleType::Paragraph if tag.has_property(UsfmTextProperties::BOOK) => {
                let data = self.next_word();
                UsfmToken::new_marker(UsfmTokenType::Book, marker).with_data(data)
            }
            UsfmStyleType::Paragraph => {
                UsfmToken::new(UsfmTokenType::Paragraph, Some(marker), None, end_marker)
            }
            UsfmStyleType::Note => {
                let data = self.next_word();
                UsfmToken::new(UsfmTokenType::Note, Some(marker), None, end_marker).with_data(data)
            }
            UsfmStyleType::End => UsfmToken::new_marker(UsfmTokenType::End, marker),
            UsfmStyleType::Unknown => {
                if marker.ends_with('*') {
                    UsfmToken::new_marker(UsfmTokenType::End, marker)
                } else if marker == "esb" || marker == "esbe" {
                    UsfmToken::new_marker(UsfmTokenType::Paragraph, marker)
                } else {
                    let end = format!("{marker}*");
                    log::debug!("unknown marker \\{marker}");
                    UsfmToken::new(UsfmTokenType::Unknown, Some(marker), None, Some(end))
                }
            }
            UsfmStyleType::Milestone | UsfmStyleType::MilestoneEnd => {
                if !self.is_at_milestone_end() {
                    // An unclosed milestone is kept as literal text.
                    let end = self.find_backslash(self.position);
                    let text = self.normalize(&self.source[backslash..end]);
                    self.position = end;
                    let token = self.located(UsfmToken::new_text(text), backslash);
                    self.tokens.push(token);
                    return;
                }
                let token_type = if tag.style_type == UsfmStyleType::Milestone {
                    UsfmTokenType::Milestone
                } else {
                    UsfmTokenType::MilestoneEnd
                };
                UsfmToken::new(token_type, Some(marker), None, end_marker)
            }
        };
        let token = self.located(token, backslash);
        self.tokens.push(token);
    }

    /// Handles `\*` after a milestone. Returns false when there is no
    /// milestone to close.
    fn close_milestone(&mut self) -> bool {
        let previous = self.tokens.iter().rev().find(|t| !is_blank_text(t));
        let closes = previous.is_some_and(|t| {
            matches!(
                t.token_type,
                UsfmTokenType::Milestone | UsfmTokenType::MilestoneEnd
            )
        });
        if closes && self.tokens.last().is_some_and(is_blank_text) {
            self.tokens.pop();
        }
        closes
    }
}

fn is_blank_text(token: &UsfmToken) -> bool {
    token.token_type == UsfmTokenType::Text
        && token.text.as_deref().is_none_or(|t| t.trim().is_empty())
}

/// Finds the start token whose closing marker is `closing`.
fn find_matching_start(tokens: &[UsfmToken], closing: &str) -> Option<usize> {
    let closing = closing.trim_start_matches('+');
    for (index, token) in tokens.iter().enumerate().rev() {
        match token.token_type {
            UsfmTokenType::Character => {
                let end = token.end_marker.as_deref().map(|e| e.trim_start_matches('+'));
                if end == Some(closing) {
                    return Some(index);
                }
            }
            UsfmTokenType::Milestone | UsfmTokenType::MilestoneEnd => {
                return (closing == "*").then_some(index);
            }
            UsfmTokenType::Text | UsfmTokenType::End | UsfmTokenType::Attribute => {}
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(usfm: &str) -> Vec<UsfmToken> {
        UsfmTokenizer::default().tokenize(usfm)
    }

    fn kinds(tokens: &[UsfmToken]) -> Vec<UsfmTokenType> {
        tokens.iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn tokenize_basic() {
        let tokens = tokenize("\\id MAT - Test\r\n\\c 1\r\n\\p\r\n\\v 1 In the beginning\r\n");
        use UsfmTokenType::*;
        assert_eq!(kinds(&tokens), vec![Book, Text, Chapter, Paragraph, Verse, Text]);
        assert_eq!(tokens[0].data.as_deref(), Some("MAT"));
        assert_eq!(tokens[1].text.as_deref(), Some("- Test "));
        assert_eq!(tokens[2].data.as_deref(), Some("1"));
        assert_eq!(tokens[4].data.as_deref(), Some("1"));
        assert_eq!(tokens[5].text.as_deref(), Some("In the beginning "));
    }

    #[test]
    fn positions() {
        let tokens = tokenize("\\id MAT\n\\c 1\n\\v 1 text");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 1));
        assert_eq!((tokens[2].line, tokens[2].column), (3, 1));
        assert_eq!((tokens[3].line, tokens[3].column), (3, 6));
    }

    #[test]
    fn whitespace_is_regularized() {
        let tokens = tokenize("\\p a  \t b\u{200B} c\u{00A0}d");
        assert_eq!(tokens[1].text.as_deref(), Some("a b c\u{00A0}d"));

        let preserving = UsfmTokenizer::default()
            .with_options(TokenizerOptions::default().with_preserve_whitespace(true));
        let tokens = preserving.tokenize("\\p a  \t b");
        assert_eq!(tokens[1].text.as_deref(), Some("a  \t b"));
    }

    #[test]
    fn character_styles_and_nesting() {
        let tokens = tokenize("\\v 1 the \\nd Lord \\+w God\\+w*\\nd* said");
        use UsfmTokenType::*;
        assert_eq!(
            kinds(&tokens),
            vec![Verse, Text, Character, Text, Character, Text, End, End, Text]
        );
        assert_eq!(tokens[2].end_marker.as_deref(), Some("nd*"));
        assert_eq!(tokens[4].marker.as_deref(), Some("+w"));
        assert_eq!(tokens[6].marker.as_deref(), Some("+w*"));
        assert_eq!(tokens[8].text.as_deref(), Some(" said"));
    }

    #[test]
    fn notes() {
        let tokens = tokenize("\\v 1 text\\f + \\fr 1:1 \\ft note\\f* more");
        use UsfmTokenType::*;
        assert_eq!(
            kinds(&tokens),
            vec![Verse, Text, Note, Character, Text, Character, Text, End, Text]
        );
        assert_eq!(tokens[2].data.as_deref(), Some("+"));
        assert_eq!(tokens[2].end_marker.as_deref(), Some("f*"));
    }

    #[test]
    fn attributes_on_character_style() {
        let tokens = tokenize("\\v 1 \\w gracious|lemma=\"grace\" strong=\"G5485\"\\w*");
        use UsfmTokenType::*;
        assert_eq!(kinds(&tokens), vec![Verse, Character, Text, Attribute, End]);
        assert_eq!(tokens[1].attribute("lemma"), Some("grace"));
        assert_eq!(tokens[1].attribute("strong"), Some("G5485"));
        assert_eq!(tokens[2].text.as_deref(), Some("gracious"));
        assert_eq!(tokens[3].text.as_deref(), Some("lemma=\"grace\" strong=\"G5485\""));
    }

    #[test]
    fn default_attribute() {
        let tokens = tokenize("\\v 1 \\w gracious|grace\\w*");
        assert_eq!(tokens[1].attribute("lemma"), Some("grace"));
        assert_eq!(tokens[3].to_usfm(), "|grace");
    }

    #[test]
    fn bar_without_matching_style_is_text() {
        let tokens = tokenize("\\v 1 either|or \\nd x\\nd*");
        assert_eq!(tokens[1].text.as_deref(), Some("either|or "));
        let tokens = tokenize("\\v 1 \\nd a|b\\nd*");
        assert_eq!(tokens[2].text.as_deref(), Some("a|b"));
    }

    #[test]
    fn milestones() {
        let tokens = tokenize("\\v 1 \\qt-s |sid=\"q1\" who=\"Pilate\"\\*Are you\\qt-e |eid=\"q1\"\\*");
        use UsfmTokenType::*;
        assert_eq!(kinds(&tokens), vec![Verse, Milestone, Text, MilestoneEnd]);
        assert_eq!(tokens[1].attribute("who"), Some("Pilate"));
        assert_eq!(tokens[1].to_usfm(), "\\qt-s |sid=\"q1\" who=\"Pilate\"\\*");
        assert_eq!(tokens[3].attribute("eid"), Some("q1"));

        let tokens = tokenize("\\ts-s \\*\\p");
        assert_eq!(kinds(&tokens), vec![Milestone, Paragraph]);
    }

    #[test]
    fn unclosed_milestone_is_text() {
        let tokens = tokenize("\\v 1 \\qt-s |who=\"A\" words\\p");
        use UsfmTokenType::*;
        assert_eq!(kinds(&tokens), vec![Verse, Text, Paragraph]);
        assert_eq!(tokens[1].text.as_deref(), Some("\\qt-s |who=\"A\" words"));
    }

    #[test]
    fn unknown_markers() {
        let tokens = tokenize("\\zz text\\zz* \\esb \\esbe");
        use UsfmTokenType::*;
        assert_eq!(kinds(&tokens), vec![Unknown, Text, End, Text, Paragraph, Paragraph]);
        assert_eq!(tokens[0].end_marker.as_deref(), Some("zz*"));
    }

    #[test]
    fn stray_star_is_end() {
        let tokens = tokenize("\\p text\\*");
        assert_eq!(tokens.last().unwrap().token_type, UsfmTokenType::End);
        assert_eq!(tokens.last().unwrap().marker.as_deref(), Some("*"));
    }

    #[test]
    fn detokenize_canonical_form() {
        let usfm = "\\id MAT - Test\n\\c 1\n\\p\n\\v 1 In the beginning\n\\v 2 (\\v 3 more)\n";
        let tokens = tokenize(usfm);
        assert_eq!(
            detokenize(&tokens),
            "\\id MAT - Test\r\n\\c 1\r\n\\p\r\n\\v 1 In the beginning\r\n\\v 2 (\\v 3 more)\r\n"
        );
    }

    #[test]
    fn detokenize_round_trip() {
        let usfm = "\\id MAT\r\n\\c 1\r\n\\p\r\n\\v 1 the \\nd Lord\\nd* said\\f + \\ft note\\f* \\w a|b\\w*\r\n\\q1 \\qt-s |who=\"A\"\\*x\\qt-e\\*\r\n";
        let tokens = tokenize(usfm);
        assert_eq!(detokenize(&tokens), usfm);
    }

    #[test]
    fn preserve_whitespace_round_trip() {
        let tokenizer = UsfmTokenizer::default()
            .with_options(TokenizerOptions::default().with_preserve_whitespace(true));
        let usfm = "\\id MAT\n\\c 1\n\\p\n\\v 1 two  spaces\n";
        let tokens = tokenizer.tokenize(usfm);
        assert_eq!(tokenizer.detokenize(&tokens), "\\id MAT \n\\c 1 \n\\p \n\\v 1 two  spaces\n");
    }
}
