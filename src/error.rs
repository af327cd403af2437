//! Unified error types for chatpaste.
//!
//! This module provides a single [`ChatpasteError`] enum that covers every
//! fallible operation in the library.
//!
//! # Error Handling Philosophy
//!
//! - The core entry points ([`parse_messages`](crate::parse_messages) and
//!   [`deduplicate`](crate::deduplicate)) never fail: per-line faults are
//!   logged and parsing moves on to the next line.
//! - Step functions inside the parser return [`ChatpasteError::Line`] so the
//!   line loop has something concrete to log.
//! - File I/O, output writers and configuration validation return [`Result`].

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatpaste operations.
///
/// # Example
///
/// ```rust
/// use chatpaste::error::Result;
/// use chatpaste::MessageRecord;
///
/// fn load() -> Result<Vec<MessageRecord>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatpasteError>;

/// The error type for all chatpaste operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatpasteError {
    /// An I/O error occurred while reading input or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A single transcript line could not be processed.
    ///
    /// The parser logs these and keeps going; they never escape
    /// [`parse_messages`](crate::parse_messages).
    #[error("Failed to process line {line}: {kind}")]
    Line {
        /// Zero-based index of the offending line
        line: usize,
        /// What went wrong
        #[source]
        kind: LineErrorKind,
    },

    /// The requested output format is unknown.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A date argument could not be parsed.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration for `{field}`: {message}")]
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Kinds of per-line faults raised by the parser's step functions.
#[derive(Debug, Error)]
pub enum LineErrorKind {
    /// A classified line did not yield an expected regex capture.
    #[error("missing `{0}` capture")]
    MissingCapture(&'static str),
    /// A reaction count did not fit in an integer.
    #[error("invalid reaction count '{0}'")]
    ReactionCount(String),
    /// Anything else.
    #[error("{0}")]
    Other(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatpasteError {
    /// Creates a per-line error.
    pub fn line(line: usize, kind: LineErrorKind) -> Self {
        ChatpasteError::Line { line, kind }
    }

    /// Creates a per-line error for a missing regex capture.
    pub fn missing_capture(line: usize, name: &'static str) -> Self {
        ChatpasteError::line(line, LineErrorKind::MissingCapture(name))
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatpasteError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChatpasteError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        ChatpasteError::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatpasteError::Io(_))
    }

    /// Returns `true` if this is a per-line parse fault.
    pub fn is_line(&self) -> bool {
        matches!(self, ChatpasteError::Line { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatpasteError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, ChatpasteError::InvalidDate { .. })
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, ChatpasteError::InvalidConfig { .. })
    }
}
