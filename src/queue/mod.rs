//! Clipboard Queue Manager
//!
//! Keeps the persisted item collection, the mode flag, the active flag and
//! the OS clipboard consistent while hotkey handlers, the clipboard poller
//! and one-shot CLI invocations all act on them.
//!
//! # Architecture
//!
//! ```text
//!  hotkeys ──┐                        ┌──────────────┐
//!            │   ┌────────────────┐   │  StateStore  │  load / save
//!  poller ───┼──▶│  QueueManager  │──▶│ (state.json) │  (atomic rename)
//!            │   │  (one Mutex)   │   └──────────────┘
//!  CLI ──────┘   └───────┬────────┘
//!                        │ write front item
//!                        ▼
//!                 ┌──────────────┐
//!                 │  Clipboard   │
//!                 └──────────────┘
//! ```
//!
//! # Synchronization
//!
//! "Synchronized" means the clipboard holds the front item: the first item in
//! queue mode, the last in stack mode. After a pop the next item is written
//! straight away so the OS's own paste delivers it. An empty queue leaves the
//! clipboard alone.
//!
//! Clipboard writes that follow a persisted change never undo that change.
//! They are reported through [`SyncReport::sync_warning`] and the caller logs
//! them.

mod error;
mod manager;

pub use error::{QueueError, QueueResult};
pub use manager::{QueueManager, SyncReport};

#[cfg(test)]
mod tests;
