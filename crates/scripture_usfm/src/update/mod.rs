//! Rewriting USFM text by scripture reference.
//!
//! [`UpdateUsfmParserHandler`] takes rows of replacement text keyed by
//! [`ScriptureRef`](scripture_versification::ScriptureRef) and produces a
//! new document in which the matching verse, non-verse and note text is
//! replaced while markers, notes and structure are kept.

mod block;
mod config;
mod handler;
mod updater;

pub use block::{UsfmUpdateBlock, UsfmUpdateBlockElement, UsfmUpdateBlockElementType};
pub use config::{UpdateUsfmConfig, UpdateUsfmRow};
pub use handler::UsfmUpdateBlockHandler;
pub use updater::{UpdateUsfmParserHandler, update_usfm};
