//! Command implementations
//!
//! Each command builds its own manager over the JSON state file and the
//! system clipboard. Only `start` creates a tokio runtime.

use super::cli::args::{Args, Command};
use super::cli::display::render_status;
use crate::clipboard::{Clipboard, SystemClipboard};
use crate::core::error_handling::log_error_with_context;
use crate::core::shutdown::ShutdownCoordinator;
use crate::monitor::{EnigoKeystrokes, GlobalHotkeySource, HotkeySource, Monitor};
use crate::queue::{QueueError, QueueManager, QueueResult};
use crate::store::{JsonStateStore, Mode};
use std::sync::Arc;

/// Run the parsed command and return the process exit code
pub fn run(args: &Args, use_color: bool) -> i32 {
    let result = match &args.command {
        Command::Start => start(args),
        Command::Pop { stack } => pop(args, *stack),
        Command::Status => status(args, use_color),
        Command::Clear => clear(args),
        Command::Mode { mode } => set_mode(args, *mode),
    };

    match result {
        Ok(()) => 0,
        Err(QueueError::EmptyQueue) => {
            eprintln!("Queue is empty");
            1
        }
        Err(e) => {
            log_error_with_context(&e, &format!("Running '{}'", command_name(&args.command)));
            1
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Start => "start",
        Command::Pop { .. } => "pop",
        Command::Status => "status",
        Command::Clear => "clear",
        Command::Mode { .. } => "mode",
    }
}

/// Manager over the configured state file and the system clipboard
pub fn build_manager(args: &Args) -> QueueResult<QueueManager> {
    let state_path = args.state_path()?;
    log::debug!("State file: {}", state_path.display());
    let store = Arc::new(JsonStateStore::new(state_path));
    let clipboard = Arc::new(SystemClipboard::new()?);
    Ok(QueueManager::new(store, clipboard))
}

fn start(args: &Args) -> QueueResult<()> {
    let manager = Arc::new(build_manager(args)?);
    let settings = args.monitor_settings();
    let bindings = args.hotkey_bindings();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| QueueError::Internal {
            message: format!("failed to start async runtime: {}", e),
        })?;

    println!("Starting clipboard monitor...");
    log::info!("  {}  start (clears queue)", bindings.activate);
    log::info!("  {}  stop  (clears queue)", bindings.deactivate);
    log::info!("  {}  paste & advance", bindings.paste);
    if let Some(copy) = &bindings.copy {
        log::info!("  {}  capture clipboard", copy);
    }

    let source: Box<dyn HotkeySource> = Box::new(GlobalHotkeySource::new(bindings));
    runtime.block_on(ShutdownCoordinator::guard(|shutdown| async move {
        Monitor::new(manager, Arc::new(EnigoKeystrokes), settings)
            .run_with_source(source, shutdown)
            .await;
        Ok::<(), QueueError>(())
    }))
}

fn pop(args: &Args, stack: bool) -> QueueResult<()> {
    let manager = build_manager(args)?;
    let item = pop_item(&manager, stack)?;
    println!("Popped: {}", item);
    Ok(())
}

/// Pop one item for `cbq pop`
///
/// `stack` forces LIFO, otherwise the persisted mode decides. While capture
/// is active a running monitor would poll the popped item straight back in,
/// so the clipboard moves to the new front instead of the popped item.
pub fn pop_item(manager: &QueueManager, stack: bool) -> QueueResult<String> {
    let state = manager.status()?;
    let mode = if stack { Mode::Stack } else { state.mode };

    if state.active {
        let report = manager.pop_and_sync_as(mode)?;
        if let Some(warning) = report.sync_warning {
            log::warn!("Clipboard not moved to the next item: {}", warning);
        }
        return Ok(report.value);
    }

    let item = manager.pop(mode.is_stack())?;
    if let Err(e) = manager.clipboard().write(&item) {
        log::warn!("Popped item not copied to clipboard: {}", e);
    }
    Ok(item)
}

fn status(args: &Args, use_color: bool) -> QueueResult<()> {
    let manager = build_manager(args)?;
    let state = manager.status()?;
    print!("{}", render_status(&state, use_color));
    Ok(())
}

fn clear(args: &Args) -> QueueResult<()> {
    let manager = build_manager(args)?;
    manager.clear()?;
    println!("Queue cleared");
    Ok(())
}

fn set_mode(args: &Args, mode: Mode) -> QueueResult<()> {
    let manager = build_manager(args)?;
    manager.set_stack_mode(mode)?;
    if let Err(e) = manager.sync_clipboard() {
        log::warn!("Clipboard not updated for new mode: {}", e);
    }
    println!("Mode set to {}", mode);
    Ok(())
}
