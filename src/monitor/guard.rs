//! Pop re-entrancy guard
//!
//! A paste trigger arriving while the previous delayed pop is still pending
//! is dropped. The flag has its own mutex, separate from the queue manager
//! lock, so checking it never waits behind a slow state-file write.

use crate::core::sync::handle_mutex_poison;
use crate::queue::{QueueError, QueueResult};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct PopGuard {
    in_flight: Arc<Mutex<bool>>,
}

/// Proof that a pop is in flight; releases the guard on drop
#[derive(Debug)]
pub struct PopPermit {
    in_flight: Arc<Mutex<bool>>,
}

impl PopGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard, or `None` when a pop is already pending
    pub fn try_acquire(&self) -> QueueResult<Option<PopPermit>> {
        let mut in_flight =
            handle_mutex_poison(self.in_flight.lock(), |message| QueueError::Internal { message })?;
        if *in_flight {
            return Ok(None);
        }
        *in_flight = true;
        Ok(Some(PopPermit {
            in_flight: Arc::clone(&self.in_flight),
        }))
    }

    #[cfg(test)]
    fn is_busy(&self) -> bool {
        self.in_flight
            .lock()
            .map(|flag| *flag)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

impl Drop for PopPermit {
    fn drop(&mut self) {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *in_flight = false;
    }
}
