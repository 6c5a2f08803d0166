//! Clipboard poller
//!
//! Captures every clipboard change while the queue is active, whether it
//! came from a copy shortcut or an application's "copy" button. Values that
//! are already somewhere in the queue are skipped: they are cbq's own
//! synchronization writes, not new copies.

use crate::clipboard::ClipboardError;
use crate::monitor::run_blocking;
use crate::queue::{QueueManager, QueueResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// What one poll did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Unreadable, empty or the same value as last time
    Unchanged,
    /// New value that is already queued
    AlreadyQueued,
    /// New value the manager declined (inactive or a repeat)
    NotAdded,
    Captured {
        item: String,
        sync_warning: Option<ClipboardError>,
    },
}

/// Change detection state carried from one poll to the next
#[derive(Debug, Clone, Default)]
pub struct PollTracker {
    last_seen: String,
}

impl PollTracker {
    /// Start from the clipboard's current content so it is not captured
    pub fn seeded(manager: &QueueManager) -> Self {
        Self {
            last_seen: manager.clipboard().read().unwrap_or_default(),
        }
    }

    /// Read the clipboard once and capture it if it is a new value
    pub fn poll(&mut self, manager: &QueueManager) -> QueueResult<PollOutcome> {
        let text = match manager.clipboard().read() {
            Ok(text) => text,
            Err(e) => {
                log::trace!("Poller: clipboard read failed: {}", e);
                return Ok(PollOutcome::Unchanged);
            }
        };
        if text.is_empty() || text == self.last_seen {
            return Ok(PollOutcome::Unchanged);
        }
        self.last_seen.clone_from(&text);

        if manager.status()?.contains(&text) {
            return Ok(PollOutcome::AlreadyQueued);
        }

        let report = manager.add_and_sync(&text)?;
        if !report.value {
            return Ok(PollOutcome::NotAdded);
        }
        Ok(PollOutcome::Captured {
            item: text,
            sync_warning: report.sync_warning,
        })
    }
}

/// Handle to a running poller task
pub struct ClipboardPoller {
    stop_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ClipboardPoller {
    /// Spawn the poller on the current tokio runtime
    pub fn start(manager: Arc<QueueManager>, interval: Duration) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(poll_loop(manager, interval, stop_rx));
        Self {
            stop_tx: Some(stop_tx),
            task,
        }
    }

    /// Stop polling and wait for an in-flight poll to finish
    pub async fn stop(mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            log::warn!("Clipboard poller ended abnormally: {}", e);
        }
    }
}

impl Drop for ClipboardPoller {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}

async fn poll_loop(
    manager: Arc<QueueManager>,
    interval: Duration,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let seed = run_blocking(&manager, |m| Ok(PollTracker::seeded(m))).await;
    let mut tracker = seed.unwrap_or_default();

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;
    log::debug!("Clipboard poller started ({:?})", interval);

    loop {
        tokio::select! {
            _ = &mut stop_rx => break,
            _ = ticker.tick() => {}
        }

        let result = run_blocking(&manager, move |m| {
            let outcome = tracker.poll(m);
            Ok((tracker, outcome))
        })
        .await;
        let outcome = match result {
            Ok((returned, outcome)) => {
                tracker = returned;
                outcome
            }
            Err(e) => {
                log::error!("Poller: {}", e);
                break;
            }
        };

        match outcome {
            Ok(PollOutcome::Captured { item, sync_warning }) => {
                log::info!("Captured: {:?}", item);
                if let Some(warning) = sync_warning {
                    log::warn!("Clipboard sync after capture failed: {}", warning);
                }
            }
            Ok(PollOutcome::AlreadyQueued) => log::trace!("Poller: value already queued"),
            Ok(_) => {}
            Err(e) => log::error!("Poller: error adding to queue: {}", e),
        }
    }
    log::debug!("Clipboard poller stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{Clipboard, MemoryClipboard};
    use crate::store::{JsonStateStore, Mode, QueueState, StateStore};

    fn setup(items: &[&str], active: bool) -> (tempfile::TempDir, Arc<MemoryClipboard>, QueueManager) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStateStore::new(dir.path().join("state.json")));
        store
            .save(&QueueState {
                items: items.iter().map(|s| s.to_string()).collect(),
                active,
                mode: Mode::Queue,
            })
            .unwrap();
        let clipboard = Arc::new(MemoryClipboard::with_content("before"));
        let manager = QueueManager::new(store, clipboard.clone());
        (dir, clipboard, manager)
    }

    #[test]
    fn test_seed_is_not_captured() {
        let (_dir, _clipboard, manager) = setup(&[], true);
        let mut tracker = PollTracker::seeded(&manager);

        assert_eq!(tracker.poll(&manager).unwrap(), PollOutcome::Unchanged);
        assert!(manager.status().unwrap().is_empty());
    }

    #[test]
    fn test_new_value_is_captured_once() {
        let (_dir, clipboard, manager) = setup(&[], true);
        let mut tracker = PollTracker::seeded(&manager);

        clipboard.write("copied").unwrap();
        assert_eq!(
            tracker.poll(&manager).unwrap(),
            PollOutcome::Captured {
                item: "copied".to_string(),
                sync_warning: None
            }
        );
        assert_eq!(tracker.poll(&manager).unwrap(), PollOutcome::Unchanged);
        assert_eq!(manager.status().unwrap().items, vec!["copied"]);
    }

    #[test]
    fn test_values_anywhere_in_queue_are_skipped() {
        let (_dir, clipboard, manager) = setup(&["a", "b", "c"], true);
        let mut tracker = PollTracker::seeded(&manager);

        clipboard.write("b").unwrap();
        assert_eq!(tracker.poll(&manager).unwrap(), PollOutcome::AlreadyQueued);
        assert_eq!(manager.status().unwrap().items, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_and_unreadable_clipboard_ignored() {
        let (_dir, clipboard, manager) = setup(&[], true);
        let mut tracker = PollTracker::seeded(&manager);

        clipboard.write("").unwrap();
        assert_eq!(tracker.poll(&manager).unwrap(), PollOutcome::Unchanged);

        clipboard.set_failing(true);
        assert_eq!(tracker.poll(&manager).unwrap(), PollOutcome::Unchanged);
    }

    #[test]
    fn test_inactive_queue_declines() {
        let (_dir, clipboard, manager) = setup(&[], false);
        let mut tracker = PollTracker::seeded(&manager);

        clipboard.write("copied").unwrap();
        assert_eq!(tracker.poll(&manager).unwrap(), PollOutcome::NotAdded);
    }

    #[tokio::test]
    async fn test_poller_task_captures_and_stops() {
        let (_dir, clipboard, manager) = setup(&[], true);
        let manager = Arc::new(manager);

        let poller = ClipboardPoller::start(Arc::clone(&manager), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        clipboard.write("first").unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        poller.stop().await;

        assert_eq!(manager.status().unwrap().items, vec!["first"]);

        clipboard.write("after stop").unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(manager.status().unwrap().items, vec!["first"]);
    }
}
