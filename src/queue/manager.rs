//! QueueManager - state transitions for the clipboard queue
//!
//! Every public operation runs entirely under one lock: load the state,
//! apply the transition, persist it and, for the `*_and_sync` variants,
//! write the new front item to the clipboard. Nothing is cached between
//! operations, so a `cbq pop` run from another process is observed by the
//! next operation of a running monitor.

use crate::clipboard::{Clipboard, ClipboardError};
use crate::core::sync::handle_mutex_poison;
use crate::queue::{QueueError, QueueResult};
use crate::store::{Mode, QueueState, StateStore};
use std::sync::{Arc, Mutex, MutexGuard};

/// Outcome of an operation that also synchronizes the clipboard
///
/// The logical operation has already been persisted when this is returned;
/// a failed clipboard write only shows up as `sync_warning`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport<T> {
    pub value: T,
    pub sync_warning: Option<ClipboardError>,
}

impl<T> SyncReport<T> {
    fn new(value: T, sync: Result<(), ClipboardError>) -> Self {
        Self {
            value,
            sync_warning: sync.err(),
        }
    }
}

/// Serialized access to the persisted queue and the clipboard
///
/// # Thread Safety
///
/// Share it as `Arc<QueueManager>`. Operations from different threads or
/// tasks never interleave; the lock is a `std::sync::Mutex`, so async
/// callers should run operations on `spawn_blocking`.
///
/// # Example
///
/// ```rust
/// use cbq::clipboard::MemoryClipboard;
/// use cbq::queue::QueueManager;
/// use cbq::store::JsonStateStore;
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let manager = QueueManager::new(
///     Arc::new(JsonStateStore::new(dir.path().join("state.json"))),
///     Arc::new(MemoryClipboard::new()),
/// );
///
/// manager.set_active(true)?;
/// manager.add("first")?;
/// manager.add("second")?;
/// assert_eq!(manager.pop(false)?, "first");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct QueueManager {
    store: Arc<dyn StateStore>,
    clipboard: Arc<dyn Clipboard>,
    lock: Mutex<()>,
}

impl QueueManager {
    pub fn new(store: Arc<dyn StateStore>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            store,
            clipboard,
            lock: Mutex::new(()),
        }
    }

    pub fn clipboard(&self) -> &Arc<dyn Clipboard> {
        &self.clipboard
    }

    /// Append `item` when capturing is active and it does not repeat the last item
    ///
    /// Returns whether the item was appended. Never touches the clipboard.
    pub fn add(&self, item: &str) -> QueueResult<bool> {
        let _guard = self.acquire()?;
        self.add_locked(item).map(|(added, _)| added)
    }

    /// `add`, then synchronize the clipboard to the front item
    ///
    /// In queue mode the OS clipboard now holds the item just copied, so the
    /// oldest item is written back; in stack mode the new item is the front.
    pub fn add_and_sync(&self, item: &str) -> QueueResult<SyncReport<bool>> {
        let _guard = self.acquire()?;
        let (added, state) = self.add_locked(item)?;
        Ok(SyncReport::new(added, self.write_front(&state)))
    }

    /// Remove the oldest item, or the newest when `use_stack` is set
    ///
    /// An empty queue yields [`QueueError::EmptyQueue`] and leaves the state untouched.
    pub fn pop(&self, use_stack: bool) -> QueueResult<String> {
        let _guard = self.acquire()?;
        let state = self.store.load()?;
        self.pop_locked(state, Mode::from_stack_flag(use_stack))
            .map(|(item, _)| item)
    }

    /// Pop in the persisted mode and pre-load the next item into the clipboard
    pub fn pop_and_sync(&self) -> QueueResult<SyncReport<String>> {
        let _guard = self.acquire()?;
        let state = self.store.load()?;
        let mode = state.mode;
        self.pop_and_sync_locked(state, mode)
    }

    /// `pop_and_sync` with an explicit pop order
    ///
    /// The persisted mode still decides which item becomes the clipboard
    /// front afterwards.
    pub fn pop_and_sync_as(&self, mode: Mode) -> QueueResult<SyncReport<String>> {
        let _guard = self.acquire()?;
        let state = self.store.load()?;
        self.pop_and_sync_locked(state, mode)
    }

    /// Start or stop capturing; both directions empty the queue
    pub fn set_active(&self, active: bool) -> QueueResult<()> {
        let _guard = self.acquire()?;
        let mut state = self.store.load()?;
        state.active = active;
        state.items.clear();
        self.store.save(&state)?;
        Ok(())
    }

    /// Switch between FIFO and LIFO without touching the items or the clipboard
    pub fn set_stack_mode(&self, mode: Mode) -> QueueResult<()> {
        let _guard = self.acquire()?;
        let mut state = self.store.load()?;
        state.mode = mode;
        self.store.save(&state)?;
        Ok(())
    }

    /// Write the current front item to the clipboard, if there is one
    pub fn sync_clipboard(&self) -> QueueResult<()> {
        let _guard = self.acquire()?;
        let state = self.store.load()?;
        self.write_front(&state)?;
        Ok(())
    }

    /// Fresh copy of the persisted state
    pub fn status(&self) -> QueueResult<QueueState> {
        let _guard = self.acquire()?;
        Ok(self.store.load()?)
    }

    /// Empty the queue, keeping the active flag and mode
    pub fn clear(&self) -> QueueResult<()> {
        let _guard = self.acquire()?;
        self.store.clear()?;
        Ok(())
    }

    fn acquire(&self) -> QueueResult<MutexGuard<'_, ()>> {
        handle_mutex_poison(self.lock.lock(), |message| QueueError::Internal { message })
    }

    fn add_locked(&self, item: &str) -> QueueResult<(bool, QueueState)> {
        let mut state = self.store.load()?;
        if !state.active || !state.push_unless_repeat(item) {
            return Ok((false, state));
        }
        self.store.save(&state)?;
        Ok((true, state))
    }

    fn pop_locked(&self, mut state: QueueState, mode: Mode) -> QueueResult<(String, QueueState)> {
        let item = state.take_front(mode).ok_or(QueueError::EmptyQueue)?;
        self.store.save(&state)?;
        Ok((item, state))
    }

    fn pop_and_sync_locked(&self, state: QueueState, mode: Mode) -> QueueResult<SyncReport<String>> {
        let (item, state) = self.pop_locked(state, mode)?;
        Ok(SyncReport::new(item, self.write_front(&state)))
    }

    fn write_front(&self, state: &QueueState) -> Result<(), ClipboardError> {
        match state.front() {
            Some(front) => self.clipboard.write(front),
            None => Ok(()),
        }
    }
}
