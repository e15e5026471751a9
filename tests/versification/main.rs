//! Integration tests for Layer 1: Versification
//!
//! Tests for verse references, scripture references and versification
//! tables.

mod references;
mod versifications;
