//! Core CLI arguments structure and basic functionality
//!
//! Global flags live on [`Args`]; each action is a [`Command`]. Settings
//! that only come from the configuration file are carried as skipped fields
//! so the merged result can be resolved in one place.

use crate::monitor::{CaptureMode, HotkeyBindings, MonitorSettings};
use crate::store::{default_state_path, Mode, StoreResult};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "cbq")]
#[command(about = "Clipboard queue/stack manager")]
#[command(
    long_about = "Copy several things, then paste them back one by one in copy order (queue) or reversed (stack)."
)]
#[command(version = crate::core::version::long_version())]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// State file path (default: ~/.cbq/state.json)
    #[arg(long = "state-file", value_name = "FILE", global = true)]
    pub state_file: Option<PathBuf>,

    /// Force colored output
    #[arg(long = "color", conflicts_with = "no_color", global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"], global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"], global = true)]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// More log output (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Command,

    // Configuration file only
    #[arg(skip)]
    pub poll_interval_ms: Option<u64>,

    #[arg(skip)]
    pub copy_delay_ms: Option<u64>,

    #[arg(skip)]
    pub paste_delay_ms: Option<u64>,

    #[arg(skip)]
    pub capture: Option<CaptureMode>,

    #[arg(skip)]
    pub hotkeys: Option<HotkeyBindings>,

    // Set when the configuration file chose a color setting
    #[arg(skip)]
    pub config_color: Option<bool>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the background monitor until terminated
    Start,

    /// Pop the next item and copy it to the clipboard
    Pop {
        /// Take the newest item instead of the persisted mode's choice
        #[arg(short = 's', long = "stack")]
        stack: bool,
    },

    /// Show capture state, mode and pending items
    Status,

    /// Empty the queue
    Clear,

    /// Switch pop order between queue (FIFO) and stack (LIFO)
    Mode {
        #[arg(value_name = "MODE", value_parser = parse_mode)]
        mode: Mode,
    },
}

fn parse_mode(value: &str) -> Result<Mode, String> {
    Mode::from_str(value).map_err(|_| format!("expected 'queue' or 'stack', got '{}'", value))
}

impl Args {
    /// -v/-q balance applied on top of the log level
    pub fn verbosity(&self) -> i8 {
        let verbose = i8::try_from(self.verbose).unwrap_or(i8::MAX);
        let quiet = i8::try_from(self.quiet).unwrap_or(i8::MAX);
        verbose.saturating_sub(quiet)
    }

    /// Color decision: explicit flags win, then the config file, then the terminal check
    pub fn use_color(&self, stdout_is_terminal: bool) -> bool {
        if self.no_color {
            return false;
        }
        if self.color {
            return true;
        }
        self.config_color.unwrap_or(stdout_is_terminal)
    }

    /// Log file, with the magic values `none` and `-` meaning no file
    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file
            .as_deref()
            .filter(|path| !is_disabled_path(path))
    }

    pub fn state_path(&self) -> StoreResult<PathBuf> {
        match &self.state_file {
            Some(path) => Ok(path.clone()),
            None => default_state_path(),
        }
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        let defaults = MonitorSettings::default();
        MonitorSettings {
            poll_interval: self
                .poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
            copy_delay: self
                .copy_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.copy_delay),
            paste_delay: self
                .paste_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.paste_delay),
            capture: self.capture.unwrap_or(defaults.capture),
        }
    }

    pub fn hotkey_bindings(&self) -> HotkeyBindings {
        self.hotkeys.clone().unwrap_or_default()
    }
}

pub(crate) fn is_disabled_path(path: &Path) -> bool {
    let text = path.to_string_lossy();
    text.eq_ignore_ascii_case("none") || text == "-"
}
