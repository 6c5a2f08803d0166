//! Clipboard Port
//!
//! A minimal capability interface over the OS clipboard so the queue manager
//! and its tests never depend on real OS calls. Every call touches the live
//! clipboard; nothing is buffered. Failures are soft: callers log them and
//! carry on with the logical operation.

mod error;
mod memory;
mod system;

pub use error::{ClipboardError, ClipboardResult};
pub use memory::MemoryClipboard;
pub use system::SystemClipboard;

/// Text access to a clipboard
pub trait Clipboard: Send + Sync {
    fn read(&self) -> ClipboardResult<String>;

    fn write(&self, text: &str) -> ClipboardResult<()>;
}
