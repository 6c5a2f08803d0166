//! Persistent State Store
//!
//! Durable storage of the single [`QueueState`] document shared by the
//! background monitor and one-shot CLI invocations.
//!
//! # Guarantees
//!
//! - `load` never fails because the file is missing; it returns the default
//!   state (empty, inactive, queue mode).
//! - `save` replaces the file atomically: the document is written to a
//!   temporary file in the same directory and renamed over the target. A
//!   failed save leaves the previous document untouched.
//! - There is no cross-process lock. Two processes that load and then save
//!   concurrently resolve as last-writer-wins.
//!
//! ```rust,no_run
//! use cbq::store::{JsonStateStore, StateStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JsonStateStore::at_default_location()?;
//! let mut state = store.load()?;
//! state.active = true;
//! store.save(&state)?;
//! # Ok(())
//! # }
//! ```

mod error;
mod json;
mod state;

pub use error::{StorageError, StoreResult};
pub use json::{default_state_path, JsonStateStore};
pub use state::{Mode, QueueState};

/// Load/save access to the persisted queue state
pub trait StateStore: Send + Sync {
    /// Read the current state, defaulting when nothing has been saved yet
    fn load(&self) -> StoreResult<QueueState>;

    /// Atomically replace the persisted state
    fn save(&self, state: &QueueState) -> StoreResult<()>;

    /// Empty the pending items, keeping the active flag and mode
    fn clear(&self) -> StoreResult<()> {
        let mut state = self.load()?;
        state.items.clear();
        self.save(&state)
    }
}
