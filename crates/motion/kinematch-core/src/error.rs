//! Error types for the core.
//!
//! Parsing is fail-fast: any structural mismatch aborts with a `ParseError`
//! carrying the absolute byte offset and a bounded context window around the
//! failure point. Database loading shares the same policy (`Malformed` with a
//! 1-based line number) instead of substituting sentinel values per field.

use thiserror::Error;

/// Fatal structural error while parsing a recording.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("failed to parse recording at offset {offset}: expected {expected} around here: {context}")]
    Syntax {
        /// Absolute byte offset of the cursor at the failure point.
        offset: usize,
        /// Human description of what was expected.
        expected: String,
        /// ±15 bytes around the cursor with `>>> <<<` markers.
        context: String,
    },
}

/// Failure while deriving feature vectors from a parsed clip.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("skeleton has no joint named '{0}'")]
    MissingJoint(String),
}

/// Failure while loading or querying a feature database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("failed to read database: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed database record on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("feature database is empty")]
    Empty,
}
