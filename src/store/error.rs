//! Storage Error Types

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read state file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("State file {} is not valid queue state: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize queue state: {source}")]
    Serialize { source: serde_json::Error },

    #[error("Failed to write state file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{message}")]
    Location { message: String },
}

impl crate::core::error_handling::ContextualError for StorageError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, StorageError::Location { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            StorageError::Location { message } => Some(message),
            _ => None,
        }
    }
}

/// Result type for state store operations
pub type StoreResult<T> = Result<T, StorageError>;
