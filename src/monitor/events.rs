//! Hotkey events and the sources that produce them

use strum_macros::Display;
use tokio::sync::mpsc;

/// A user action recognized by a hotkey source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum HotkeyEvent {
    /// Start capturing; clears the queue
    Activate,
    /// Stop capturing; clears the queue
    Deactivate,
    /// The user copied something (hotkey capture mode only)
    Copy,
    /// Paste the front item and advance
    Paste,
}

#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("Invalid {event} hotkey '{chord}': {message}")]
    InvalidChord {
        event: HotkeyEvent,
        chord: String,
        message: String,
    },

    #[error("Hotkeys unavailable: {message}")]
    Unavailable { message: String },

    #[error("Failed to register {event} hotkey '{chord}': {message}")]
    Register {
        event: HotkeyEvent,
        chord: String,
        message: String,
    },
}

impl crate::core::error_handling::ContextualError for HotkeyError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, HotkeyError::InvalidChord { .. })
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

/// Result type for hotkey operations
pub type HotkeyResult<T> = Result<T, HotkeyError>;

/// Producer of hotkey events
///
/// `listen` returns once the source is ready; events are then delivered on
/// `events` from whatever thread the source owns. `stop` releases every
/// registration and must be safe to call more than once.
pub trait HotkeySource: Send {
    fn listen(&mut self, events: mpsc::UnboundedSender<HotkeyEvent>) -> HotkeyResult<()>;

    fn stop(&mut self);
}
