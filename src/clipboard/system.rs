//! OS clipboard adapter backed by arboard
//!
//! The arboard handle lives on a dedicated worker thread for the lifetime of
//! the adapter. On X11 and Wayland the copied text is served by the process
//! that owns the selection, so the handle must outlive individual writes.

use crate::clipboard::error::{ClipboardError, ClipboardResult};
use crate::clipboard::Clipboard;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Upper bound on a single clipboard round trip
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

enum Request {
    Read(mpsc::Sender<ClipboardResult<String>>),
    Write(String, mpsc::Sender<ClipboardResult<()>>),
}

/// The live system clipboard
pub struct SystemClipboard {
    requests: mpsc::Sender<Request>,
}

impl SystemClipboard {
    /// Start the clipboard worker
    ///
    /// The OS clipboard itself is only opened on first use, so this succeeds
    /// on headless machines; the failure then surfaces on `read`/`write`.
    pub fn new() -> ClipboardResult<Self> {
        let (requests, incoming) = mpsc::channel();
        thread::Builder::new()
            .name("cbq-clipboard".to_string())
            .spawn(move || serve(incoming))
            .map_err(|e| ClipboardError::Unavailable {
                message: format!("cannot start clipboard worker: {}", e),
            })?;
        Ok(Self { requests })
    }

    fn round_trip<T>(
        &self,
        request: impl FnOnce(mpsc::Sender<ClipboardResult<T>>) -> Request,
    ) -> ClipboardResult<T> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.requests
            .send(request(reply_tx))
            .map_err(|_| worker_gone())?;
        match reply_rx.recv_timeout(REQUEST_TIMEOUT) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(ClipboardError::Unavailable {
                message: format!("no response within {:?}", REQUEST_TIMEOUT),
            }),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(worker_gone()),
        }
    }
}

impl Clipboard for SystemClipboard {
    fn read(&self) -> ClipboardResult<String> {
        self.round_trip(Request::Read)
    }

    fn write(&self, text: &str) -> ClipboardResult<()> {
        let text = text.to_string();
        self.round_trip(move |reply| Request::Write(text, reply))
    }
}

fn worker_gone() -> ClipboardError {
    ClipboardError::Unavailable {
        message: "clipboard worker stopped".to_string(),
    }
}

// Runs until the owning SystemClipboard is dropped
fn serve(incoming: mpsc::Receiver<Request>) {
    let mut handle: Option<arboard::Clipboard> = None;

    for request in incoming {
        match request {
            Request::Read(reply) => {
                let result = with_handle(&mut handle, |clipboard| {
                    clipboard.get_text().map_err(|e| ClipboardError::Read {
                        message: e.to_string(),
                    })
                });
                let _ = reply.send(result);
            }
            Request::Write(text, reply) => {
                let result = with_handle(&mut handle, |clipboard| {
                    clipboard.set_text(text).map_err(|e| ClipboardError::Write {
                        message: e.to_string(),
                    })
                });
                let _ = reply.send(result);
            }
        }
    }
    log::trace!("Clipboard worker exiting");
}

fn with_handle<T>(
    handle: &mut Option<arboard::Clipboard>,
    op: impl FnOnce(&mut arboard::Clipboard) -> ClipboardResult<T>,
) -> ClipboardResult<T> {
    if handle.is_none() {
        let opened = arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable {
            message: e.to_string(),
        })?;
        *handle = Some(opened);
    }
    match handle.as_mut() {
        Some(clipboard) => op(clipboard),
        None => Err(worker_gone()),
    }
}
