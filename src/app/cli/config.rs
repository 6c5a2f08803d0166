//! TOML configuration file parsing and loading
//!
//! The file is optional. Without `--config-file` the default location
//! `<config_dir>/cbq/cbq.toml` is used when it exists; an explicitly named
//! file must exist. Values from the file only fill settings the command
//! line left unset.

use super::args::Args;
use crate::monitor::{CaptureMode, HotkeyBindings};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
const LOG_FORMATS: [&str; 3] = ["text", "ext", "json"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{message}")]
    Invalid { message: String },
}

impl crate::core::error_handling::ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, ConfigError::Invalid { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { message } => Some(message),
            _ => None,
        }
    }
}

fn invalid(key: &str, detail: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        message: format!("Invalid value for '{}' in configuration: {}", key, detail),
    }
}

/// Default configuration file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cbq").join("cbq.toml"))
}

/// Read the configuration file, if there is one to read
pub fn load_config_file(
    config_file: Option<&Path>,
) -> Result<Option<(PathBuf, toml::Table)>, ConfigError> {
    let path = match config_file {
        Some(path) if !path.exists() => {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            })
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let table = toml::from_str::<toml::Table>(&contents).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    Ok(Some((path, table)))
}

impl Args {
    /// Apply TOML configuration values to Args
    ///
    /// Only settings still unset after command-line parsing are taken from
    /// the table. Unknown keys are ignored.
    pub fn apply_toml_values(args: &mut Self, config: &toml::Table) -> Result<(), ConfigError> {
        if args.state_file.is_none() {
            if let Some(state_file) = get_str(config, "state-file")? {
                args.state_file = Some(PathBuf::from(state_file));
            }
        }

        if args.log_level.is_none() {
            if let Some(level) = get_str(config, "log-level")? {
                let level = level.to_ascii_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(invalid("log-level", format!("unknown level '{}'", level)));
                }
                args.log_level = Some(level);
            }
        }

        if args.log_format.is_none() {
            if let Some(format) = get_str(config, "log-format")? {
                if !LOG_FORMATS.contains(&format) {
                    return Err(invalid("log-format", format!("unknown format '{}'", format)));
                }
                args.log_format = Some(format.to_string());
            }
        }

        if args.log_file.is_none() {
            if let Some(log_file) = get_str(config, "log-file")? {
                // "none" and "-" are kept so they also disable file logging
                args.log_file = Some(PathBuf::from(log_file));
            }
        }

        if let Some(color) = get_bool(config, "color")? {
            args.config_color = Some(color);
        }
        if let Some(no_color) = get_bool(config, "no-color")? {
            args.config_color = Some(!no_color);
        }

        if let Some(ms) = get_millis(config, "poll-interval-ms")? {
            if ms == 0 {
                return Err(invalid("poll-interval-ms", "must be greater than zero"));
            }
            args.poll_interval_ms = Some(ms);
        }
        if let Some(ms) = get_millis(config, "copy-delay-ms")? {
            args.copy_delay_ms = Some(ms);
        }
        if let Some(ms) = get_millis(config, "paste-delay-ms")? {
            args.paste_delay_ms = Some(ms);
        }

        if let Some(capture) = get_str(config, "capture")? {
            let mode = CaptureMode::from_str(capture)
                .map_err(|_| invalid("capture", format!("expected 'poll' or 'hotkey', got '{}'", capture)))?;
            args.capture = Some(mode);
        }

        if let Some(hotkeys) = config.get("hotkeys") {
            let bindings: HotkeyBindings = hotkeys
                .clone()
                .try_into()
                .map_err(|e: toml::de::Error| invalid("hotkeys", e.message().to_string()))?;
            bindings.parse().map_err(|e| invalid("hotkeys", e))?;
            args.hotkeys = Some(bindings);
        }

        Ok(())
    }
}

fn get_str<'a>(config: &'a toml::Table, key: &str) -> Result<Option<&'a str>, ConfigError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| invalid(key, "expected a string")),
    }
}

fn get_bool(config: &toml::Table, key: &str) -> Result<Option<bool>, ConfigError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| invalid(key, "expected true or false")),
    }
}

fn get_millis(config: &toml::Table, key: &str) -> Result<Option<u64>, ConfigError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => {
            let ms = value
                .as_integer()
                .ok_or_else(|| invalid(key, "expected an integer number of milliseconds"))?;
            u64::try_from(ms)
                .map(Some)
                .map_err(|_| invalid(key, "must not be negative"))
        }
    }
}
