//! Scripture - USFM parsing, verse references, versification and
//! quotation-mark conversion
//!
//! This crate re-exports all layers of the workspace for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: scripture_quotes         - Quote conventions, resolution, conversion, detection
//! Layer 2: scripture_usfm           - Stylesheet, tokenizer, parser, updater, checker
//! Layer 1: scripture_versification  - Verse references, versification tables
//! Layer 0: scripture_foundation     - Error type, canon
//! ```

pub use scripture_foundation as foundation;
pub use scripture_quotes as quotes;
pub use scripture_usfm as usfm;
pub use scripture_versification as versification;
