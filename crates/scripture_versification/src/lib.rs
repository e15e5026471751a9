//! Verse references and versification systems.
//!
//! This crate provides:
//! - [`VerseRef`] - Book, chapter and verse selector under a versification
//! - [`ScriptureRef`] - A verse reference plus a path into non-verse text
//! - [`Versification`] - Chapter/verse tables, exclusions, segments and
//!   mappings to the original numbering, read from `.vrs` files
//!
//! The six built-in versifications are embedded and loaded on first use.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod scripture_ref;
pub mod verse_ref;
pub mod versification;


pub use scripture_ref::{ScriptureElement, ScriptureRef};
pub use verse_ref::{
    ValidStatus, VerseRef, are_overlapping_verse_ranges, bbbcccvvv, merge_verse_ranges,
    split_bbbcccvvv,
};
pub use versification::{NON_CANONICAL_LAST, Versification, VersificationType};
