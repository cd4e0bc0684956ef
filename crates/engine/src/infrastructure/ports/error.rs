//! Error types for port operations.

use std::path::Path;

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Storage operation failed - includes operation name for tracing.
    #[error("Storage error in {operation}: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },

    /// A stored record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The record key cannot be used as a storage key.
    #[error("Invalid record key: {0:?}")]
    InvalidKey(String),
}

impl RepoError {
    /// Create a Storage error with operation context.
    pub fn storage(operation: &'static str, message: impl ToString) -> Self {
        Self::Storage {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error naming the offending file.
    pub fn serialization_at(path: &Path, message: impl ToString) -> Self {
        Self::Serialization(format!("{}: {}", path.display(), message.to_string()))
    }

    /// Create an InvalidKey error.
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey(key.into())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
