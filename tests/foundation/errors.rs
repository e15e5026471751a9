//! Integration tests for Error types
//!
//! Tests error construction, display and context.

use scripture_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_stylesheet_missing() {
    let err = Error::stylesheet_missing("custom.sty");
    assert!(matches!(err.kind, ErrorKind::StylesheetMissing { .. }));
    assert!(err.to_string().contains("custom.sty"));
}

#[test]
fn error_invalid_stylesheet() {
    let err = Error::invalid_stylesheet(7, "bad \\TextType");
    assert_eq!(
        err.kind,
        ErrorKind::InvalidStylesheet {
            line: 7,
            message: "bad \\TextType".to_string()
        }
    );
    assert!(err.to_string().contains("line 7"));
}

#[test]
fn error_unknown_book() {
    let err = Error::unknown_book("XYZ");
    assert!(matches!(err.kind, ErrorKind::UnknownBook(_)));
    assert!(err.to_string().contains("XYZ"));
}

#[test]
fn error_unknown_versification() {
    let err = Error::unknown_versification("Klingon");
    assert!(matches!(err.kind, ErrorKind::UnknownVersification(_)));
    assert!(err.to_string().contains("Klingon"));
}

#[test]
fn error_io_keeps_the_os_message() {
    let source = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let err = Error::io("missing.vrs", &source);
    let msg = err.to_string();
    assert!(msg.contains("missing.vrs"));
    assert!(msg.contains("no such file"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_is_optional() {
    let err = Error::invalid_reference("MAT 1");
    assert!(err.context.is_none());
}

#[test]
fn context_display() {
    let context = ErrorContext::new().with_source("eng.vrs").with_position(3, 1);
    assert_eq!(context.to_string(), "in eng.vrs:3:1");
    assert_eq!(ErrorContext::new().with_source("eng.vrs").to_string(), "in eng.vrs");
    assert_eq!(ErrorContext::new().to_string(), "");
}
