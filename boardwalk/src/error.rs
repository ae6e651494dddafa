//! Error types for the board state engine.

use thiserror::Error;

/// Result type for board state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur while deserializing or updating board state.
#[derive(Debug, Error)]
pub enum StateError {
    /// An issue referenced an entity index the corresponding store does not
    /// have. The server contract guarantees this never happens; hitting it
    /// means the snapshot and the change stream have diverged.
    #[error("issue `{key}` references {entity} index {index}, which does not exist")]
    InvalidReference {
        key: String,
        entity: &'static str,
        index: usize,
    },

    /// Raw wire JSON failed to deserialize.
    #[error("malformed board JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl StateError {
    pub(crate) fn invalid_reference(key: &str, entity: &'static str, index: usize) -> Self {
        Self::InvalidReference {
            key: key.to_string(),
            entity,
            index,
        }
    }
}
