//! Integration tests for Layer 0: Foundation
//!
//! Tests for the canon tables and the error type.

mod canon;
mod errors;
