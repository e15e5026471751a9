//! Events emitted by the parser.

use crate::token::UsfmAttribute;

/// Horizontal alignment of a table cell, from its marker suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellAlignment {
    /// `tc1`, `th1`.
    #[default]
    Start,
    /// `tcc1`, `thc1`.
    Center,
    /// `tcr1`, `thr1`.
    End,
}

impl CellAlignment {
    /// Alignment for a cell marker such as `tcr2`.
    #[must_use]
    pub fn from_marker(marker: &str) -> Self {
        match marker.as_bytes().get(2) {
            Some(b'c') => Self::Center,
            Some(b'r') => Self::End,
            _ => Self::Start,
        }
    }
}

/// One step of a parse, in document order.
///
/// Every `Start*` event is matched by exactly one `End*` event. `closed` on
/// an end event is false when the element was closed implicitly by a later
/// marker rather than by its own end marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsfmEvent<'a> {
    /// Before the first token.
    StartUsfm,
    /// After the last token, with every element closed.
    EndUsfm,
    /// Any token that carries a marker, before it is processed.
    GotMarker {
        /// The marker as written.
        marker: &'a str,
    },
    /// `\id` and other book markers.
    StartBook {
        /// The book marker.
        marker: &'a str,
        /// Book code such as `MAT`.
        code: &'a str,
    },
    /// End of the book's introduction paragraph.
    EndBook {
        /// The book marker.
        marker: &'a str,
    },
    /// `\c`.
    Chapter {
        /// Chapter number as written.
        number: &'a str,
        /// The chapter marker.
        marker: &'a str,
        /// From an adjacent `\ca n\ca*`.
        alt_number: Option<&'a str>,
        /// From a following `\cp n`.
        pub_number: Option<&'a str>,
    },
    /// `\v`.
    Verse {
        /// Verse selector as written.
        number: &'a str,
        /// The verse marker.
        marker: &'a str,
        /// From an adjacent `\va n\va*`.
        alt_number: Option<&'a str>,
        /// From an adjacent `\vp n\vp*`.
        pub_number: Option<&'a str>,
    },
    /// Paragraph start.
    StartPara {
        /// The paragraph marker.
        marker: &'a str,
        /// True when the marker is not in the stylesheet.
        unknown: bool,
        /// Paragraph attributes.
        attributes: &'a [UsfmAttribute],
    },
    /// Paragraph end.
    EndPara {
        /// The paragraph marker.
        marker: &'a str,
    },
    /// Character style start, `+` removed.
    StartChar {
        /// The character marker.
        marker: &'a str,
        /// True when the marker is unknown or nests with nothing open.
        unknown: bool,
        /// Attributes from the `|` section.
        attributes: &'a [UsfmAttribute],
    },
    /// Character style end.
    EndChar {
        /// The character marker.
        marker: &'a str,
        /// Attributes from the opening token.
        attributes: &'a [UsfmAttribute],
        /// True when closed by its own end marker.
        closed: bool,
    },
    /// Footnote or cross-reference start.
    StartNote {
        /// The note marker.
        marker: &'a str,
        /// The caller (`+`, `-` or a literal).
        caller: &'a str,
        /// From an adjacent `\cat c\cat*`.
        category: Option<&'a str>,
    },
    /// Footnote or cross-reference end.
    EndNote {
        /// The note marker.
        marker: &'a str,
        /// True when closed by its own end marker.
        closed: bool,
    },
    /// First row of a table.
    StartTable,
    /// After the last row of a table.
    EndTable,
    /// `\tr`.
    StartRow {
        /// The row marker.
        marker: &'a str,
    },
    /// Row end.
    EndRow {
        /// The row marker.
        marker: &'a str,
    },
    /// Table cell start.
    StartCell {
        /// Cell marker without any range suffix.
        marker: &'a str,
        /// Alignment from the marker.
        align: CellAlignment,
        /// Columns spanned by a range marker such as `tc1-3`, otherwise 0.
        col_span: u32,
    },
    /// Table cell end.
    EndCell {
        /// The cell marker.
        marker: &'a str,
    },
    /// `\esb`.
    StartSidebar {
        /// The sidebar marker.
        marker: &'a str,
        /// From an adjacent `\esbc c\esbc*`.
        category: Option<&'a str>,
    },
    /// `\esbe`, or an implicit close.
    EndSidebar {
        /// The sidebar marker.
        marker: &'a str,
        /// True when closed by `\esbe`.
        closed: bool,
    },
    /// A run of text.
    Text {
        /// The text, with `~` already converted to a no-break space.
        text: &'a str,
    },
    /// `//`.
    OptBreak,
    /// `\ref display|target\ref*`.
    Ref {
        /// The reference marker.
        marker: &'a str,
        /// Text shown to the reader.
        display: &'a str,
        /// Link target.
        target: &'a str,
    },
    /// Milestone start or end.
    Milestone {
        /// The milestone marker.
        marker: &'a str,
        /// True for a start milestone.
        start: bool,
        /// Milestone attributes.
        attributes: &'a [UsfmAttribute],
    },
    /// An end marker with nothing to close.
    Unmatched {
        /// The end marker.
        marker: &'a str,
    },
}

impl UsfmEvent<'_> {
    /// Short name of the event kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartUsfm => "start_usfm",
            Self::EndUsfm => "end_usfm",
            Self::GotMarker { .. } => "got_marker",
            Self::StartBook { .. } => "start_book",
            Self::EndBook { .. } => "end_book",
            Self::Chapter { .. } => "chapter",
            Self::Verse { .. } => "verse",
            Self::StartPara { .. } => "start_para",
            Self::EndPara { .. } => "end_para",
            Self::StartChar { .. } => "start_char",
            Self::EndChar { .. } => "end_char",
            Self::StartNote { .. } => "start_note",
            Self::EndNote { .. } => "end_note",
            Self::StartTable => "start_table",
            Self::EndTable => "end_table",
            Self::StartRow { .. } => "start_row",
            Self::EndRow { .. } => "end_row",
            Self::StartCell { .. } => "start_cell",
            Self::EndCell { .. } => "end_cell",
            Self::StartSidebar { .. } => "start_sidebar",
            Self::EndSidebar { .. } => "end_sidebar",
            Self::Text { .. } => "text",
            Self::OptBreak => "opt_break",
            Self::Ref { .. } => "ref",
            Self::Milestone { .. } => "milestone",
            Self::Unmatched { .. } => "unmatched",
        }
    }
}
