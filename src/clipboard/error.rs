//! Clipboard Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {message}")]
    Unavailable { message: String },

    #[error("Failed to read clipboard: {message}")]
    Read { message: String },

    #[error("Failed to write clipboard: {message}")]
    Write { message: String },
}

impl crate::core::error_handling::ContextualError for ClipboardError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

/// Result type for clipboard operations
pub type ClipboardResult<T> = Result<T, ClipboardError>;
