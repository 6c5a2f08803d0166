//! Queue Error Types

use crate::clipboard::ClipboardError;
use crate::core::error_handling::ContextualError;
use crate::store::StorageError;

const EMPTY_QUEUE_MESSAGE: &str = "Queue is empty";

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Queue is empty")]
    EmptyQueue,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        match self {
            QueueError::EmptyQueue => true,
            QueueError::Storage(e) => e.is_user_actionable(),
            _ => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            QueueError::EmptyQueue => Some(EMPTY_QUEUE_MESSAGE),
            QueueError::Storage(e) => e.user_message(),
            _ => None,
        }
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_queue_is_user_facing() {
        let err = QueueError::EmptyQueue;
        assert!(err.is_user_actionable());
        assert_eq!(err.user_message(), Some("Queue is empty"));
        assert_eq!(err.to_string(), "Queue is empty");
    }

    #[test]
    fn test_wrapped_errors_display_transparently() {
        let err: QueueError = ClipboardError::Write {
            message: "denied".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Failed to write clipboard: denied");
        assert!(!err.is_user_actionable());

        let err: QueueError = StorageError::Location {
            message: "no home".to_string(),
        }
        .into();
        assert!(err.is_user_actionable());
        assert_eq!(err.user_message(), Some("no home"));
    }
}
