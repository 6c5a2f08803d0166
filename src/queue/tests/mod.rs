//! Test modules for the queue manager
//!
//! Tests are organized by functional area; shared fixtures live here.


use crate::clipboard::MemoryClipboard;
use crate::queue::QueueManager;
use crate::store::{JsonStateStore, Mode, QueueState, StateStore, StorageError, StoreResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// A manager over a real JSON store in a temp dir and an in-memory clipboard
pub(super) struct Fixture {
    _dir: TempDir,
    pub store: Arc<JsonStateStore>,
    pub clipboard: Arc<MemoryClipboard>,
    pub manager: QueueManager,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStateStore::new(dir.path().join("state.json")));
        let clipboard = Arc::new(MemoryClipboard::new());
        let manager = QueueManager::new(store.clone(), clipboard.clone());
        Self {
            _dir: dir,
            store,
            clipboard,
            manager,
        }
    }

    /// Fixture whose persisted state starts as given
    pub fn with_state(items: &[&str], active: bool, mode: Mode) -> Self {
        let fixture = Self::new();
        fixture
            .store
            .save(&QueueState {
                items: items.iter().map(|s| s.to_string()).collect(),
                active,
                mode,
            })
            .unwrap();
        fixture
    }

    pub fn items(&self) -> Vec<String> {
        self.store.load().unwrap().items
    }
}

/// In-memory store whose saves can be made to fail
#[derive(Default)]
pub(super) struct FlakyStore {
    state: Mutex<QueueState>,
    fail_saves: AtomicBool,
    loads: AtomicUsize,
}

impl FlakyStore {
    pub fn with_state(state: QueueState) -> Self {
        Self {
            state: Mutex::new(state),
            fail_saves: AtomicBool::new(false),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> QueueState {
        self.state.lock().unwrap().clone()
    }
}

impl StateStore for FlakyStore {
    fn load(&self) -> StoreResult<QueueState> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().unwrap().clone())
    }

    fn save(&self, state: &QueueState) -> StoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Write {
                path: "flaky.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        *self.state.lock().unwrap() = state.clone();
        Ok(())
    }
}
