//! Core types shared by every layer of the scripture workspace.
//!
//! This crate provides:
//! - [`Error`] - Rich error type with context
//! - [`canon`] - Book numbers, three-letter book codes and canon groupings

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod canon;
pub mod error;

pub use canon::{
    LAST_BOOK, all_book_ids, book_id_from_file_part, book_id_to_number, book_number_to_id,
    is_canonical, is_deuterocanonical, is_nt, is_ot,
};
pub use error::{Error, ErrorContext, ErrorKind, Result};
