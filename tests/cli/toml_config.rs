//! CLI TOML configuration tests
//!
//! Configuration values fill what the command line left unset.

use clap::Parser;
use cbq::app::cli::args::Args;
use cbq::app::cli::config::load_config_file;
use cbq::monitor::CaptureMode;
use std::time::Duration;

#[test]
fn test_config_file_round_trip_into_monitor_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cbq.toml");
    std::fs::write(
        &path,
        r#"
log-level = "debug"
poll-interval-ms = 125
capture = "poll"

[hotkeys]
activate = "alt+shift+KeyQ"
deactivate = "alt+shift+KeyW"
paste = "alt+shift+KeyE"
"#,
    )
    .unwrap();

    let mut args = Args::try_parse_from(["cbq", "-c", path.to_str().unwrap(), "start"]).unwrap();
    let (_, table) = load_config_file(args.config_file.as_deref())
        .unwrap()
        .unwrap();
    Args::apply_toml_values(&mut args, &table).unwrap();

    assert_eq!(args.log_level.as_deref(), Some("debug"));
    let settings = args.monitor_settings();
    assert_eq!(settings.poll_interval, Duration::from_millis(125));
    assert_eq!(settings.capture, CaptureMode::Poll);

    let bindings = args.hotkey_bindings();
    assert_eq!(bindings.paste, "alt+shift+KeyE");
    assert_eq!(bindings.parse().unwrap().len(), 3);
}

#[test]
fn test_cli_log_level_overrides_config() {
    let mut args = Args::try_parse_from(["cbq", "--log-level", "error", "status"]).unwrap();
    let table: toml::Table = toml::from_str("log-level = \"trace\"").unwrap();

    Args::apply_toml_values(&mut args, &table).unwrap();

    assert_eq!(args.log_level.as_deref(), Some("error"));
}
