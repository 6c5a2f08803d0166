//! Synthetic copy and paste keystrokes
//!
//! Global hotkeys are registered exclusively, so the focused application
//! never sees the chord the user pressed. The monitor sends the platform's
//! own copy or paste shortcut on their behalf.

use enigo::{
    Direction::{Click, Press, Release},
    Enigo, Key, Keyboard, Settings,
};

#[cfg(target_os = "macos")]
const COMMAND_KEY: Key = Key::Meta;
#[cfg(not(target_os = "macos"))]
const COMMAND_KEY: Key = Key::Control;

#[derive(Debug, thiserror::Error)]
pub enum KeystrokeError {
    #[error("Keyboard input unavailable: {message}")]
    Unavailable { message: String },

    #[error("Failed to send {shortcut} keystroke: {message}")]
    Send {
        shortcut: &'static str,
        message: String,
    },
}

impl crate::core::error_handling::ContextualError for KeystrokeError {
    fn is_user_actionable(&self) -> bool {
        // Usually a missing accessibility permission
        matches!(self, KeystrokeError::Unavailable { .. })
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

pub type KeystrokeResult<T> = Result<T, KeystrokeError>;

/// Sends copy and paste shortcuts to the focused application
///
/// Calls block until the keystrokes are delivered; async callers run them
/// on `spawn_blocking`.
pub trait Keystrokes: Send + Sync {
    fn copy(&self) -> KeystrokeResult<()>;

    fn paste(&self) -> KeystrokeResult<()>;
}

/// OS keyboard through enigo, opened per call
#[derive(Debug, Clone, Copy, Default)]
pub struct EnigoKeystrokes;

impl EnigoKeystrokes {
    fn shortcut(&self, shortcut: &'static str, letter: char) -> KeystrokeResult<()> {
        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| KeystrokeError::Unavailable {
                message: e.to_string(),
            })?;
        let send_error = |e: enigo::InputError| KeystrokeError::Send {
            shortcut,
            message: e.to_string(),
        };

        // The hotkey's extra modifiers may still be held
        enigo
            .key(Key::Shift, Release)
            .and_then(|_| enigo.key(Key::Alt, Release))
            .map_err(send_error)?;

        enigo
            .key(COMMAND_KEY, Press)
            .and_then(|_| enigo.key(Key::Unicode(letter), Click))
            .and_then(|_| enigo.key(COMMAND_KEY, Release))
            .map_err(send_error)?;

        log::trace!("Sent {} keystroke", shortcut);
        Ok(())
    }
}

impl Keystrokes for EnigoKeystrokes {
    fn copy(&self) -> KeystrokeResult<()> {
        self.shortcut("copy", 'c')
    }

    fn paste(&self) -> KeystrokeResult<()> {
        self.shortcut("paste", 'v')
    }
}
