//! Core error types.
//!
//! These cover caller mistakes the type system cannot rule out: boundary
//! offsets outside the template and malformed task markers. Soft conditions
//! (image-count mismatches, validation findings) are warnings, not errors.

use thiserror::Error;

/// Errors produced by the alignment core and the template parser.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A boundary offset does not fall within `[0, template length]`.
    /// Offsets are never clamped; this is a bug in boundary construction.
    #[error("boundary offset {offset} outside template range 0..={len}")]
    BoundaryOutOfRange { offset: usize, len: usize },

    /// A task marker could not be parsed.
    #[error("malformed task marker '{body}': {reason}")]
    MalformedMarker { body: String, reason: String },

    /// A task marker's score field is not a number.
    #[error("task '{task}' has a non-numeric score '{value}'")]
    InvalidScore { task: String, value: String },
}

impl CoreError {
    pub(crate) fn malformed(body: &str, reason: impl Into<String>) -> Self {
        CoreError::MalformedMarker {
            body: body.to_string(),
            reason: reason.into(),
        }
    }
}
