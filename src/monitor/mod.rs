//! Event Sources
//!
//! The background side of cbq: global hotkeys and a clipboard poller feed
//! user actions into the queue manager.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  HotkeyEvent   ┌───────────────┐
//! │ GlobalHotkeySrc  │───(mpsc)──────▶│    Monitor    │◀── shutdown (broadcast)
//! │ (own OS thread)  │                │  event loop   │
//! └──────────────────┘                └──┬─────────┬──┘
//!                                        │         │ start / stop
//!          paste: PopGuard, Ctrl/Cmd+V,  │         ▼
//!                   delayed pop task     │   ┌─────────────────┐
//!                                        │   │ ClipboardPoller │
//!                                        ▼   └────────┬────────┘
//!                                   ┌───────────────────────┐
//!                                   │     QueueManager      │
//!                                   └───────────────────────┘
//! ```
//!
//! All manager calls run on tokio's blocking pool; the manager's own lock
//! serializes them. Delays are fixed sleeps that let the OS finish its copy
//! or paste before cbq touches the clipboard. Copy and paste tasks are
//! tracked, and shutdown waits for them so a paste is never left without
//! its pop.

mod events;
mod guard;
mod hotkeys;
mod keys;
mod poller;
mod runner;

pub use events::{HotkeyError, HotkeyEvent, HotkeyResult, HotkeySource};
pub use guard::{PopGuard, PopPermit};
pub use hotkeys::{BoundHotkey, GlobalHotkeySource, HotkeyBindings};
pub use keys::{EnigoKeystrokes, KeystrokeError, KeystrokeResult, Keystrokes};
pub use poller::{ClipboardPoller, PollOutcome, PollTracker};
pub use runner::{CaptureMode, Monitor, MonitorSettings};

use crate::queue::{QueueError, QueueManager, QueueResult};
use std::sync::Arc;

/// Run a manager operation on the blocking pool
pub(crate) async fn run_blocking<T, F>(manager: &Arc<QueueManager>, op: F) -> QueueResult<T>
where
    F: FnOnce(&QueueManager) -> QueueResult<T> + Send + 'static,
    T: Send + 'static,
{
    let manager = Arc::clone(manager);
    tokio::task::spawn_blocking(move || op(&manager))
        .await
        .map_err(|e| QueueError::Internal {
            message: format!("blocking task failed: {}", e),
        })?
}
