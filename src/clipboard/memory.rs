//! In-process clipboard used by tests and headless runs

use crate::clipboard::error::{ClipboardError, ClipboardResult};
use crate::clipboard::Clipboard;
use crate::core::sync::handle_mutex_poison;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A text cell with the clipboard contract and switchable failures
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: Mutex<String>,
    failing: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(text: &str) -> Self {
        Self {
            content: Mutex::new(text.to_string()),
            ..Self::default()
        }
    }

    /// Make every subsequent read and write fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Current content, bypassing the failure switch
    pub fn content(&self) -> String {
        self.content
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> ClipboardResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClipboardError::Unavailable {
                message: "clipboard service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl Clipboard for MemoryClipboard {
    fn read(&self) -> ClipboardResult<String> {
        self.check_available()?;
        let content = handle_mutex_poison(self.content.lock(), |message| {
            ClipboardError::Read { message }
        })?;
        Ok(content.clone())
    }

    fn write(&self, text: &str) -> ClipboardResult<()> {
        self.check_available()?;
        let mut content = handle_mutex_poison(self.content.lock(), |message| {
            ClipboardError::Write { message }
        })?;
        *content = text.to_string();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
