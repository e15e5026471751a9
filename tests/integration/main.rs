//! End-to-end integration tests
//!
//! Each test drives several layers together, from raw USFM text to the
//! final output.

mod scenarios;
mod pipeline;
