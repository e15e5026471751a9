//! Integration tests for Layer 2: USFM
//!
//! Tests for tokenizing, parsing, updating and checking whole documents.

mod checker;
mod parser;
mod tokenizer;
mod updater;
