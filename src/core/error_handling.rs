//! Generic error handling utilities
//!
//! Provides unified error reporting that works across the different error
//! enums of the crate (storage, clipboard, queue, hotkey, configuration).

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)` with a helpful, actionable message. When it returns `false`,
/// `user_message()` should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message that should be shown to
    /// the user as-is (an empty queue, a bad config value)
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors show their own message; system errors show the
/// operation context, with the full error available at debug level.
///
/// # Examples
/// ```rust,no_run
/// # use cbq::core::error_handling::log_error_with_context;
/// # use cbq::queue::QueueError;
/// log_error_with_context(&QueueError::EmptyQueue, "Popping item");
/// // Logs: "FATAL: Queue is empty"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}: {}", operation_context, error),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
