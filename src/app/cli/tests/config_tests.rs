//! Tests for configuration file loading and merging

use crate::app::cli::args::Args;
use crate::app::cli::config::{load_config_file, ConfigError};
use crate::monitor::CaptureMode;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

fn cli(argv: &[&str]) -> Args {
    Args::try_parse_from(argv).unwrap()
}

fn table(text: &str) -> toml::Table {
    toml::from_str(text).unwrap()
}

#[test]
fn test_config_fills_unset_values() {
    let mut args = cli(&["cbq", "start"]);
    let config = table(
        r#"
        state-file = "/var/tmp/cbq.json"
        log-level = "DEBUG"
        log-format = "ext"
        poll-interval-ms = 100
        copy-delay-ms = 20
        paste-delay-ms = 75
        capture = "hotkey"
        "#,
    );

    Args::apply_toml_values(&mut args, &config).unwrap();

    assert_eq!(args.state_file, Some(PathBuf::from("/var/tmp/cbq.json")));
    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format.as_deref(), Some("ext"));
    let settings = args.monitor_settings();
    assert_eq!(settings.poll_interval, Duration::from_millis(100));
    assert_eq!(settings.copy_delay, Duration::from_millis(20));
    assert_eq!(settings.paste_delay, Duration::from_millis(75));
    assert_eq!(settings.capture, CaptureMode::Hotkey);
}

#[test]
fn test_command_line_wins_over_config() {
    let mut args = cli(&[
        "cbq",
        "--state-file",
        "/cli.json",
        "--log-level",
        "warn",
        "--no-color",
        "status",
    ]);
    let config = table(
        r#"
        state-file = "/config.json"
        log-level = "trace"
        color = true
        "#,
    );

    Args::apply_toml_values(&mut args, &config).unwrap();

    assert_eq!(args.state_file, Some(PathBuf::from("/cli.json")));
    assert_eq!(args.log_level.as_deref(), Some("warn"));
    assert!(!args.use_color(true));
}

#[test]
fn test_config_color_beats_terminal_detection() {
    let mut args = cli(&["cbq", "status"]);
    Args::apply_toml_values(&mut args, &table("no-color = true")).unwrap();
    assert!(!args.use_color(true));

    let mut args = cli(&["cbq", "status"]);
    Args::apply_toml_values(&mut args, &table("color = true")).unwrap();
    assert!(args.use_color(false));
}

#[test]
fn test_log_file_none_in_config_disables_file_logging() {
    let mut args = cli(&["cbq", "status"]);
    Args::apply_toml_values(&mut args, &table(r#"log-file = "none""#)).unwrap();
    assert_eq!(args.log_file_path(), None);
}

#[test]
fn test_hotkeys_table() {
    let mut args = cli(&["cbq", "start"]);
    let config = table(
        r#"
        [hotkeys]
        activate = "alt+shift+KeyA"
        copy = "alt+shift+KeyC"
        "#,
    );

    Args::apply_toml_values(&mut args, &config).unwrap();

    let bindings = args.hotkey_bindings();
    assert_eq!(bindings.activate, "alt+shift+KeyA");
    assert_eq!(bindings.copy.as_deref(), Some("alt+shift+KeyC"));
    // Unspecified chords keep their defaults
    assert!(bindings.paste.ends_with("+KeyV"));
}

#[test]
fn test_invalid_values_are_rejected() {
    let cases = [
        "log-level = \"chatty\"",
        "log-format = \"yaml\"",
        "poll-interval-ms = 0",
        "paste-delay-ms = -5",
        "copy-delay-ms = \"fast\"",
        "capture = \"keylogger\"",
        "color = \"yes\"",
        "[hotkeys]\npaste = \"not a chord\"",
        "[hotkeys]\nunknown = \"alt+KeyA\"",
    ];
    for case in cases {
        let mut args = cli(&["cbq", "status"]);
        let result = Args::apply_toml_values(&mut args, &table(case));
        assert!(
            matches!(result, Err(ConfigError::Invalid { .. })),
            "expected rejection for {:?}, got {:?}",
            case,
            result
        );
    }
}

#[test]
fn test_unknown_keys_are_ignored() {
    let mut args = cli(&["cbq", "status"]);
    Args::apply_toml_values(&mut args, &table("theme = \"dark\"")).unwrap();
}

#[test]
fn test_explicit_config_file_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");

    assert!(matches!(
        load_config_file(Some(&missing)),
        Err(ConfigError::Missing { .. })
    ));
}

#[test]
fn test_load_config_file_reads_and_parses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cbq.toml");
    std::fs::write(&path, "poll-interval-ms = 400\n").unwrap();

    let (loaded_path, table) = load_config_file(Some(&path)).unwrap().unwrap();
    assert_eq!(loaded_path, path);
    assert_eq!(table.get("poll-interval-ms").and_then(|v| v.as_integer()), Some(400));

    std::fs::write(&path, "poll-interval-ms = [").unwrap();
    assert!(matches!(
        load_config_file(Some(&path)),
        Err(ConfigError::Parse { .. })
    ));
}
