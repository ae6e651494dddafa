//! Error types for Issue QL parsing and matching.

use thiserror::Error;

/// A syntax error in an Issue QL query.
///
/// This is the recoverable error class: callers that consume user-authored
/// queries (manual swimlanes, saved filters) catch it, drop the offending
/// query, and keep their sibling data intact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("issue QL syntax error at offset {offset}: {message}")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Byte offset into the query text where the error was detected.
    pub offset: usize,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// A matcher-side failure.
///
/// Unlike [`ParseError`] this indicates a query the grammar accepted but the
/// matcher cannot evaluate. Callers treat it as fatal rather than defaulting
/// the match result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Custom fields and parallel tasks parse but cannot be matched yet.
    #[error("field `{name}` cannot be matched")]
    UnsupportedField { name: String },
}
