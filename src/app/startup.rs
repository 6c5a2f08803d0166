//! Application startup
//!
//! Parses the command line, merges the configuration file, starts logging
//! and hands over to the selected command. Returns the process exit code.

use super::cli::args::Args;
use super::cli::config::load_config_file;
use super::commands;
use crate::core::logging::{effective_level, init_logging};
use clap::Parser;
use std::io::IsTerminal;

pub fn startup() -> i32 {
    let mut args = Args::parse();

    // Configuration problems are reported before logging exists
    let config = match load_config_file(args.config_file.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if let Some((path, table)) = &config {
        if let Err(e) = Args::apply_toml_values(&mut args, table) {
            eprintln!(
                "Error in configuration file validation {}: {}",
                path.display(),
                e
            );
            return 1;
        }
    }

    let use_color = args.use_color(std::io::stdout().is_terminal());
    let level = effective_level(args.log_level.as_deref(), args.verbosity());
    if let Err(e) = init_logging(
        level,
        args.log_format.as_deref(),
        args.log_file_path(),
        use_color && std::io::stderr().is_terminal(),
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return 1;
    }

    match &config {
        Some((path, _)) => log::debug!("Loaded configuration from {}", path.display()),
        None => log::debug!("No configuration file"),
    }
    log::trace!("Final arguments: {:#?}", args);

    commands::run(&args, use_color)
}
