//! Error types for the Ratiograph engine.
//!
//! This module provides a unified error type [`RatioGraphError`] that covers
//! all error conditions that can surface from chain parsing, session
//! operations, and config persistence.
//!
//! Cycle detection is deliberately not part of this enum: see
//! [`crate::graph::CycleError`], which is consumed inside the propagator.

use thiserror::Error;

/// Result type alias using [`RatioGraphError`].
pub type Result<T> = std::result::Result<T, RatioGraphError>;

/// Unified error type for all Ratiograph operations.
#[derive(Error, Debug)]
pub enum RatioGraphError {
    // ============ Chain Parsing Errors ============
    /// Malformed chain expression
    #[error("Parse error in chain '{input}': {message}")]
    ParseError { input: String, message: String },

    // ============ Session Errors ============
    /// Root quantity is zero, negative, or not a number
    #[error("Invalid root quantity '{value}': must be a positive number")]
    InvalidRootQuantity { value: String },

    // ============ Codec Errors ============
    /// Persisted config record is malformed
    #[error("Malformed config record: {message}")]
    CodecError { message: String },

    // ============ I/O Errors ============
    /// Error reading a config or import file
    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a config file
    #[error("Failed to write file '{path}': {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl RatioGraphError {
    /// Create a parse error
    pub fn parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create a codec error
    pub fn codec(message: impl Into<String>) -> Self {
        Self::CodecError {
            message: message.into(),
        }
    }

    /// Whether this error came from malformed chain text.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError { .. })
    }
}

impl From<serde_json::Error> for RatioGraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::codec(err.to_string())
    }
}
