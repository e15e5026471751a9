//! USFM stylesheets, tokenizing, event parsing and text updating.
//!
//! This crate provides:
//! - [`UsfmStylesheet`] and [`UsfmTag`] - Marker definitions read from `.sty` files
//! - [`UsfmTokenizer`] - Splits USFM into [`UsfmToken`]s and writes tokens back out
//! - [`UsfmParser`] - Walks tokens, tracks [`UsfmParserState`] and emits [`UsfmEvent`]s
//! - [`UsfmParserHandler`] - The callback surface for parser events
//! - [`ScriptureRefUsfmParserHandler`] - Groups events into segments addressed by
//!   [`ScriptureRef`](scripture_versification::ScriptureRef)
//! - [`UpdateUsfmParserHandler`] - Replaces text by reference while keeping markup
//! - [`UsfmVersificationChecker`] - Compares chapters and verses with a versification
//!
//! # Example
//!
//! ```
//! use scripture_usfm::{EventRecorder, parse_usfm};
//!
//! let mut recorder = EventRecorder::default();
//! parse_usfm("\\id MAT\n\\c 1\n\\p\n\\v 1 Text\n", &mut recorder, None, None);
//! assert!(recorder.events.contains(&"verse 1".to_string()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod element;
pub mod event;
pub mod handler;
pub mod parser;
pub mod scripture_ref_handler;
pub mod state;
pub mod stylesheet;
pub mod tag;
pub mod token;
pub mod tokenizer;
pub mod update;
pub mod versification_check;


pub use element::{UsfmParserElement, UsfmParserElementType};
pub use event::{CellAlignment, UsfmEvent};
pub use handler::{EventRecorder, UsfmParserHandler, dispatch};
pub use parser::{UsfmParser, parse_usfm};
pub use scripture_ref_handler::{
    ScriptureRefContext, ScriptureRefHooks, ScriptureRefUsfmParserHandler, ScriptureTextType,
    is_embed_part_style, is_embed_style,
};
pub use state::UsfmParserState;
pub use stylesheet::{UsfmStylesheet, is_cell_range};
pub use tag::{
    UsfmJustification, UsfmStyleAttribute, UsfmStyleType, UsfmTag, UsfmTextProperties,
    UsfmTextType,
};
pub use token::{UsfmAttribute, UsfmToken, UsfmTokenType, parse_attributes};
pub use tokenizer::{TokenizerOptions, UsfmTokenizer, detokenize};
pub use update::{
    UpdateUsfmConfig, UpdateUsfmParserHandler, UpdateUsfmRow, UsfmUpdateBlock,
    UsfmUpdateBlockElement, UsfmUpdateBlockElementType, UsfmUpdateBlockHandler, update_usfm,
};
pub use versification_check::{
    UsfmVersificationChecker, UsfmVersificationError, UsfmVersificationErrorType,
    check_usfm_versification,
};
