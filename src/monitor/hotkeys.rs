//! System-wide hotkeys via the global-hotkey crate
//!
//! Registration is exclusive: a registered chord is swallowed and never
//! reaches the focused application. The paste chord is therefore a dedicated
//! combination rather than the platform's own paste shortcut.
//!
//! On macOS events are only delivered while the process runs a Cocoa event
//! loop on its main thread; without one registration succeeds but no presses
//! arrive and capture falls back to the clipboard poller.

use crate::monitor::events::{HotkeyError, HotkeyEvent, HotkeyResult, HotkeySource};
use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc;

/// How often the listener thread checks for a stop request
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[cfg(target_os = "macos")]
const PRIMARY_MODIFIERS: &str = "super+shift";
#[cfg(not(target_os = "macos"))]
const PRIMARY_MODIFIERS: &str = "control+shift";

/// Chord strings for each event, in global-hotkey syntax (`control+shift+KeyV`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HotkeyBindings {
    pub activate: String,
    pub deactivate: String,
    pub paste: String,
    /// Only used with hotkey capture; unbound by default
    pub copy: Option<String>,
}

impl Default for HotkeyBindings {
    fn default() -> Self {
        Self {
            activate: format!("{}+KeyI", PRIMARY_MODIFIERS),
            deactivate: format!("{}+KeyR", PRIMARY_MODIFIERS),
            paste: format!("{}+KeyV", PRIMARY_MODIFIERS),
            copy: None,
        }
    }
}

impl HotkeyBindings {
    /// Parse every bound chord
    pub fn parse(&self) -> HotkeyResult<Vec<BoundHotkey>> {
        let mut chords = vec![
            (HotkeyEvent::Activate, self.activate.as_str()),
            (HotkeyEvent::Deactivate, self.deactivate.as_str()),
            (HotkeyEvent::Paste, self.paste.as_str()),
        ];
        if let Some(copy) = &self.copy {
            chords.push((HotkeyEvent::Copy, copy.as_str()));
        }

        let mut bound: Vec<BoundHotkey> = Vec::with_capacity(chords.len());
        for (event, chord) in chords {
            let invalid = |message: String| HotkeyError::InvalidChord {
                event,
                chord: chord.to_string(),
                message,
            };
            let hotkey = chord
                .parse::<HotKey>()
                .map_err(|e| invalid(e.to_string()))?;
            if let Some(other) = bound.iter().find(|b| b.hotkey.id() == hotkey.id()) {
                return Err(invalid(format!("already bound to {}", other.event)));
            }
            bound.push(BoundHotkey {
                event,
                chord: chord.to_string(),
                hotkey,
            });
        }
        Ok(bound)
    }
}

/// A parsed chord and the event it triggers
#[derive(Debug, Clone)]
pub struct BoundHotkey {
    pub event: HotkeyEvent,
    pub chord: String,
    pub hotkey: HotKey,
}

/// Hotkey source backed by OS-level global hotkey registration
///
/// The `GlobalHotKeyManager` lives on its own thread for the whole listening
/// period and unregisters everything before the thread exits.
pub struct GlobalHotkeySource {
    bindings: HotkeyBindings,
    stop_requested: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl GlobalHotkeySource {
    pub fn new(bindings: HotkeyBindings) -> Self {
        Self {
            bindings,
            stop_requested: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

impl HotkeySource for GlobalHotkeySource {
    fn listen(&mut self, events: mpsc::UnboundedSender<HotkeyEvent>) -> HotkeyResult<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        let bound = self.bindings.parse()?;
        self.stop_requested.store(false, Ordering::SeqCst);

        let (ready_tx, ready_rx) = std_mpsc::channel();
        let stop_requested = Arc::clone(&self.stop_requested);
        let worker = thread::Builder::new()
            .name("cbq-hotkeys".to_string())
            .spawn(move || listen_on_thread(bound, events, stop_requested, ready_tx))
            .map_err(|e| HotkeyError::Unavailable {
                message: format!("cannot start hotkey thread: {}", e),
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                self.worker = Some(worker);
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = worker.join();
                Err(e)
            }
            Err(_) => Err(HotkeyError::Unavailable {
                message: "hotkey thread exited during registration".to_string(),
            }),
        }
    }

    fn stop(&mut self) {
        self.stop_requested.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Hotkey thread panicked");
            }
        }
    }
}

impl Drop for GlobalHotkeySource {
    fn drop(&mut self) {
        self.stop();
    }
}

fn listen_on_thread(
    bound: Vec<BoundHotkey>,
    events: mpsc::UnboundedSender<HotkeyEvent>,
    stop_requested: Arc<AtomicBool>,
    ready: std_mpsc::Sender<HotkeyResult<()>>,
) {
    let manager = match GlobalHotKeyManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            let _ = ready.send(Err(HotkeyError::Unavailable {
                message: e.to_string(),
            }));
            return;
        }
    };

    let mut registered: Vec<&BoundHotkey> = Vec::with_capacity(bound.len());
    for binding in &bound {
        if let Err(e) = manager.register(binding.hotkey) {
            unregister_all(&manager, &registered);
            let _ = ready.send(Err(HotkeyError::Register {
                event: binding.event,
                chord: binding.chord.clone(),
                message: e.to_string(),
            }));
            return;
        }
        log::debug!("Registered {} hotkey {}", binding.event, binding.chord);
        registered.push(binding);
    }
    let by_id: HashMap<u32, HotkeyEvent> = registered
        .iter()
        .map(|binding| (binding.hotkey.id(), binding.event))
        .collect();
    let _ = ready.send(Ok(()));

    let receiver = GlobalHotKeyEvent::receiver();
    while !stop_requested.load(Ordering::SeqCst) {
        let Ok(pressed) = receiver.recv_timeout(STOP_POLL_INTERVAL) else {
            continue;
        };
        if !matches!(pressed.state, HotKeyState::Pressed) {
            continue;
        }
        if let Some(event) = by_id.get(&pressed.id) {
            log::trace!("Hotkey pressed: {}", event);
            if events.send(*event).is_err() {
                break;
            }
        }
    }

    unregister_all(&manager, &registered);
    log::trace!("Hotkey thread exiting");
}

fn unregister_all(manager: &GlobalHotKeyManager, registered: &[&BoundHotkey]) {
    for binding in registered {
        if let Err(e) = manager.unregister(binding.hotkey) {
            log::debug!("Failed to unregister hotkey {}: {}", binding.chord, e);
        }
    }
}
