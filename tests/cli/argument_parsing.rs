//! CLI argument parsing tests against the public Args type

use clap::Parser;
use cbq::app::cli::args::{Args, Command};
use cbq::store::Mode;

#[test]
fn test_pop_defaults_to_persisted_mode() {
    let args = Args::try_parse_from(["cbq", "pop"]).unwrap();
    assert_eq!(args.command, Command::Pop { stack: false });
}

#[test]
fn test_mode_command_parses_both_orders() {
    for (value, mode) in [("queue", Mode::Queue), ("stack", Mode::Stack)] {
        let args = Args::try_parse_from(["cbq", "mode", value]).unwrap();
        assert_eq!(args.command, Command::Mode { mode });
    }
}

#[test]
fn test_mode_error_lists_choices() {
    let err = Args::try_parse_from(["cbq", "mode", "heap"]).unwrap_err();
    assert!(err.to_string().contains("expected 'queue' or 'stack'"));
}

#[test]
fn test_help_mentions_every_command() {
    let err = Args::try_parse_from(["cbq", "--help"]).unwrap_err();
    let help = err.to_string();
    for command in ["start", "pop", "status", "clear", "mode"] {
        assert!(help.contains(command), "help is missing '{}'", command);
    }
}

#[test]
fn test_config_file_flag() {
    let args = Args::try_parse_from(["cbq", "-c", "/etc/cbq.toml", "status"]).unwrap();
    assert_eq!(
        args.config_file.as_deref(),
        Some(std::path::Path::new("/etc/cbq.toml"))
    );
}
