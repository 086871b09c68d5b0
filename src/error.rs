//! Error types.
//!
//! Structural validation of collaborator payloads reports a
//! [`ValidationError`]; stats persistence reports a [`StoreError`].
//! Collaborator failures themselves stay opaque strings and never appear here.

use thiserror::Error;

/// Why a generated question or evaluation failed its structural check.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is blank after trimming.
    #[error("{0} is empty")]
    EmptyField(&'static str),

    /// A list has the wrong number of entries.
    #[error("{field} has {count} entries, expected {min}..={max}")]
    CountOutOfRange {
        field: &'static str,
        count: usize,
        min: usize,
        max: usize,
    },

    /// An index points outside the list it refers to.
    #[error("{field} index {index} is out of range for {len} entries")]
    IndexOutOfRange {
        field: &'static str,
        index: usize,
        len: usize,
    },

    /// Two indices that must differ are equal.
    #[error("{0} must not coincide")]
    Conflict(&'static str),

    /// A per-level example is absent or blank.
    #[error("missing example for level {0}")]
    MissingLevelExample(&'static str),

    /// Counts that must agree do not.
    #[error("{0}")]
    Inconsistent(&'static str),
}

/// Failure while reading or writing a stats file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("stats file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stats file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
