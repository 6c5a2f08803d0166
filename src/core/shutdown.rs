//! Shutdown Coordination
//!
//! Signal handling for the long-running monitor. A coordinator owns a
//! broadcast channel; every task that must stop on SIGINT/SIGTERM subscribes
//! to it. A second signal forces an immediate exit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Exit status used when a second signal forces termination
const FORCED_EXIT_CODE: i32 = 130;

/// Coordinates graceful shutdown across the monitor tasks
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
    fn new() -> (Self, broadcast::Receiver<()>) {
        // Room for a burst of signals without lagging receivers
        let (shutdown_tx, shutdown_rx) = broadcast::channel(8);
        (Self { shutdown_tx }, shutdown_rx)
    }

    /// Guard execution of a future with shutdown coordination
    ///
    /// Installs the signal handlers and hands the closure a receiver that
    /// fires once the process is asked to terminate.
    pub async fn guard<F, Fut, R, E>(future_fn: F) -> Result<R, E>
    where
        F: FnOnce(broadcast::Receiver<()>) -> Fut,
        Fut: std::future::Future<Output = Result<R, E>>,
    {
        let (coordinator, shutdown_rx) = Self::new();

        setup_signal_handlers(coordinator.shutdown_tx.clone());

        future_fn(shutdown_rx).await
    }
}

/// Set up signal handlers for graceful shutdown
fn setup_signal_handlers(shutdown_tx: broadcast::Sender<()>) {
    let signal_count = Arc::new(AtomicUsize::new(0));

    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        use tokio::signal::unix::{signal, SignalKind};
        let signals = [
            SignalKind::interrupt(),
            SignalKind::terminate(),
            SignalKind::hangup(),
            SignalKind::quit(),
        ];

        for kind in signals {
            let tx = shutdown_tx.clone();
            let sig_ctr = signal_count.clone();

            tokio::spawn(async move {
                if let Ok(mut sig) = signal(kind) {
                    while sig.recv().await.is_some() {
                        notify_signal(&tx, &sig_ctr);
                    }
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                notify_signal(&shutdown_tx, &signal_count);
            }
        });
    }
}

fn notify_signal(tx: &broadcast::Sender<()>, signal_count: &AtomicUsize) {
    let prev = signal_count.fetch_add(1, Ordering::AcqRel);
    let _ = tx.send(());
    if prev >= 1 {
        log::warn!("Second termination signal received; exiting");
        std::process::exit(FORCED_EXIT_CODE);
    }
    log::info!("Termination signal received, shutting down");
}
