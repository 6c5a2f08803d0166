//! Monitor event loop
//!
//! Reacts to hotkey events and owns the clipboard poller. Handlers never
//! block the loop: manager calls run on `spawn_blocking` and the delayed
//! copy and paste work runs in tasks kept in a `JoinSet`. The loop waits
//! for those tasks before it returns.

use crate::monitor::events::{HotkeyEvent, HotkeySource};
use crate::monitor::guard::PopGuard;
use crate::monitor::keys::{KeystrokeError, KeystrokeResult, Keystrokes};
use crate::monitor::poller::ClipboardPoller;
use crate::monitor::run_blocking;
use crate::queue::{QueueError, QueueManager};
use std::sync::Arc;
use std::time::Duration;
use strum_macros::{Display, EnumString};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;

/// How copies are detected while the queue is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CaptureMode {
    /// Watch the clipboard for changes
    #[default]
    Poll,
    /// Send a copy keystroke when the copy hotkey fires, then read the clipboard
    Hotkey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    /// Wait after the copy keystroke before reading the clipboard
    pub copy_delay: Duration,
    /// Wait after the paste keystroke before advancing the queue
    pub paste_delay: Duration,
    pub capture: CaptureMode,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            copy_delay: Duration::from_millis(100),
            paste_delay: Duration::from_millis(50),
            capture: CaptureMode::Poll,
        }
    }
}

/// The long-running background process behind `cbq start`
pub struct Monitor {
    manager: Arc<QueueManager>,
    keys: Arc<dyn Keystrokes>,
    settings: MonitorSettings,
    guard: PopGuard,
    poller: Option<ClipboardPoller>,
    pending: JoinSet<()>,
}

impl Monitor {
    pub fn new(
        manager: Arc<QueueManager>,
        keys: Arc<dyn Keystrokes>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            manager,
            keys,
            settings,
            guard: PopGuard::new(),
            poller: None,
            pending: JoinSet::new(),
        }
    }

    /// Run with events from `source` until `shutdown` fires
    ///
    /// A source that cannot start is logged and the monitor carries on with
    /// whatever the persisted state and the poller provide.
    pub async fn run_with_source(
        self,
        mut source: Box<dyn HotkeySource>,
        shutdown: broadcast::Receiver<()>,
    ) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let listening = match source.listen(events_tx) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}; continuing without hotkeys", e);
                false
            }
        };

        self.run(events_rx, shutdown).await;

        if listening {
            source.stop();
        }
    }

    /// Process `events` until `shutdown` fires
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<HotkeyEvent>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        self.resume().await;
        log::info!("cbq monitor started (capture: {})", self.settings.capture);

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    log::info!("Shutdown requested");
                    break;
                }
                Some(event) = events.recv() => self.handle(event).await,
            }
        }

        if !self.pending.is_empty() {
            log::debug!("Waiting for {} pending copy/paste task(s)", self.pending.len());
        }
        while let Some(result) = self.pending.join_next().await {
            log_task_result(result);
        }

        self.stop_poller().await;
        log::info!("cbq monitor stopped");
    }

    /// Restore the clipboard and, when the last session left the queue
    /// active, the poller
    async fn resume(&mut self) {
        if let Err(e) = run_blocking(&self.manager, |m| m.sync_clipboard()).await {
            log::warn!("Initial clipboard sync failed: {}", e);
        }
        match run_blocking(&self.manager, |m| m.status()).await {
            Ok(state) if state.active => {
                log::info!(
                    "Resuming active queue from previous session ({} pending)",
                    state.len()
                );
                self.start_poller().await;
            }
            Ok(_) => {}
            Err(e) => log::error!("Failed to read queue state: {}", e),
        }
    }

    async fn handle(&mut self, event: HotkeyEvent) {
        log::debug!("Hotkey event: {}", event);
        while let Some(result) = self.pending.try_join_next() {
            log_task_result(result);
        }
        match event {
            HotkeyEvent::Activate => self.activate().await,
            HotkeyEvent::Deactivate => self.deactivate().await,
            HotkeyEvent::Copy => self.copy(),
            HotkeyEvent::Paste => self.paste().await,
        }
    }

    async fn activate(&mut self) {
        if let Err(e) = run_blocking(&self.manager, |m| m.set_active(true)).await {
            log::error!("Error activating: {}", e);
            return;
        }
        self.start_poller().await;
        log::info!("Queue STARTED");
    }

    async fn deactivate(&mut self) {
        if let Err(e) = run_blocking(&self.manager, |m| m.set_active(false)).await {
            log::error!("Error deactivating: {}", e);
            return;
        }
        self.stop_poller().await;
        log::info!("Queue STOPPED");
    }

    fn copy(&mut self) {
        if self.settings.capture != CaptureMode::Hotkey {
            log::debug!("Copy hotkey ignored with {} capture", self.settings.capture);
            return;
        }
        let manager = Arc::clone(&self.manager);
        let keys = Arc::clone(&self.keys);
        let delay = self.settings.copy_delay;
        self.pending.spawn(async move {
            if let Err(e) = send_keystroke(keys, |k| k.copy()).await {
                log::warn!("Copy not captured: {}", e);
                return;
            }
            // Let the focused application finish writing the clipboard
            tokio::time::sleep(delay).await;
            let result = run_blocking(&manager, |m| {
                let text = m.clipboard().read()?;
                if text.is_empty() {
                    return Ok(None);
                }
                let report = m.add_and_sync(&text)?;
                Ok(Some((text, report)))
            })
            .await;
            match result {
                Ok(Some((text, report))) if report.value => {
                    log::info!("Captured: {:?}", text);
                    if let Some(warning) = report.sync_warning {
                        log::warn!("Clipboard sync after capture failed: {}", warning);
                    }
                }
                Ok(_) => {}
                Err(QueueError::Clipboard(e)) => log::warn!("Copy: {}", e),
                Err(e) => log::error!("Error adding to queue: {}", e),
            }
        });
    }

    async fn paste(&mut self) {
        let state = match run_blocking(&self.manager, |m| m.status()).await {
            Ok(state) => state,
            Err(e) => {
                log::error!("Error reading state: {}", e);
                return;
            }
        };
        if !state.active || state.is_empty() {
            return;
        }

        // Make sure the OS pastes the front item
        if let Err(e) = run_blocking(&self.manager, |m| m.sync_clipboard()).await {
            log::warn!("Clipboard sync before paste failed: {}", e);
        }

        let permit = match self.guard.try_acquire() {
            Ok(Some(permit)) => permit,
            Ok(None) => {
                log::debug!("Pop already pending; paste trigger dropped");
                return;
            }
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };

        let manager = Arc::clone(&self.manager);
        let keys = Arc::clone(&self.keys);
        let delay = self.settings.paste_delay;
        self.pending.spawn(async move {
            let _permit = permit;
            // Nothing was pasted, so the front item stays queued
            if let Err(e) = send_keystroke(keys, |k| k.paste()).await {
                log::warn!("Paste not sent: {}", e);
                return;
            }
            // Let the application read the clipboard before the next item replaces it
            tokio::time::sleep(delay).await;
            match run_blocking(&manager, |m| m.pop_and_sync()).await {
                Ok(report) => {
                    log::info!("Popped: {:?}", report.value);
                    if let Some(warning) = report.sync_warning {
                        log::warn!("Failed to prepare next item: {}", warning);
                    }
                }
                Err(QueueError::EmptyQueue) => log::debug!("Nothing left to pop"),
                Err(e) => log::error!("Error popping: {}", e),
            }
        });
    }

    async fn start_poller(&mut self) {
        if self.settings.capture != CaptureMode::Poll {
            return;
        }
        self.stop_poller().await;
        self.poller = Some(ClipboardPoller::start(
            Arc::clone(&self.manager),
            self.settings.poll_interval,
        ));
    }

    async fn stop_poller(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
    }
}

/// Run a keystroke call on the blocking pool
async fn send_keystroke<F>(keys: Arc<dyn Keystrokes>, send: F) -> KeystrokeResult<()>
where
    F: FnOnce(&dyn Keystrokes) -> KeystrokeResult<()> + Send + 'static,
{
    tokio::task::spawn_blocking(move || send(keys.as_ref()))
        .await
        .map_err(|e| KeystrokeError::Unavailable {
            message: format!("keystroke task failed: {}", e),
        })?
}

fn log_task_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        log::error!("Monitor task failed: {}", e);
    }
}
