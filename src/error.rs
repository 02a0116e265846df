//! # Error Types
//!
//! This module defines error types used throughout the labelsmith library.
//!
//! Editor geometry, document edits and code generation never fail: invalid
//! geometry is clamped and unknown ids are ignored. Errors only surface at the
//! edges: template import, persistence, transport and argument parsing.

use thiserror::Error;

/// Main error type for labelsmith operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// Transport-level errors (connection, I/O)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Template JSON is structurally malformed (missing `labelSize`/`elements`)
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Printer language outside TSPL, ZPL and ESC/POS
    #[error("Unsupported printer language '{0}'")]
    UnsupportedLanguage(String),

    /// Invalid command-line or request argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
