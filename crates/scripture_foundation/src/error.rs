//! Error types for the scripture workspace.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Only construction of shared resources (stylesheets, versifications) and
//! reference parsing can fail; malformed USFM is reported through parser
//! events instead.

use std::fmt;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for scripture operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a missing stylesheet error.
    #[must_use]
    pub fn stylesheet_missing(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::StylesheetMissing { path: path.into() })
    }

    /// Creates an invalid stylesheet error.
    #[must_use]
    pub fn invalid_stylesheet(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidStylesheet {
            line,
            message: message.into(),
        })
    }

    /// Creates an invalid versification error.
    #[must_use]
    pub fn invalid_versification(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidVersification {
            line,
            message: message.into(),
        })
    }

    /// Creates an invalid reference error.
    #[must_use]
    pub fn invalid_reference(reference: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidReference(reference.into()))
    }

    /// Creates an unknown book error.
    #[must_use]
    pub fn unknown_book(book: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownBook(book.into()))
    }

    /// Creates an unknown versification error.
    #[must_use]
    pub fn unknown_versification(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownVersification(name.into()))
    }

    /// Creates an I/O error for the given path.
    #[must_use]
    pub fn io(path: impl Into<String>, source: &std::io::Error) -> Self {
        Self::new(ErrorKind::Io {
            path: path.into(),
            message: source.to_string(),
        })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ErrorKind {
    /// A referenced stylesheet could not be read.
    #[error("stylesheet not found: {path}")]
    StylesheetMissing {
        /// Path of the stylesheet.
        path: String,
    },

    /// A stylesheet file is malformed.
    #[error("invalid stylesheet at line {line}: {message}")]
    InvalidStylesheet {
        /// Line number (1-indexed).
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A versification file is malformed.
    #[error("invalid versification at line {line}: {message}")]
    InvalidVersification {
        /// Line number (1-indexed).
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A scripture reference literal could not be parsed.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// A book code or number is not part of the canon.
    #[error("unknown book: {0}")]
    UnknownBook(String),

    /// A versification name or type is not known.
    #[error("unknown versification: {0}")]
    UnknownVersification(String),

    /// A file could not be read.
    #[error("I/O error reading {path}: {message}")]
    Io {
        /// Path that failed.
        path: String,
        /// Message from the operating system.
        message: String,
    },

    /// Source text is not valid UTF-8.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ErrorContext {
    /// Source file or resource name.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        Ok(())
    }
}
