//! Runs the `cbq` binary against a temporary state file
//!
//! Only commands that never need a working OS clipboard are checked for
//! clipboard effects; failed clipboard writes are warnings, so the
//! commands still succeed on headless machines.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

struct Workspace {
    _dir: tempfile::TempDir,
    state: PathBuf,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        // An explicit empty config keeps the user's own config file out of the test
        let config = dir.path().join("cbq.toml");
        std::fs::write(&config, "").unwrap();
        Self {
            _dir: dir,
            state,
            config,
        }
    }

    fn with_state(json: &str) -> Self {
        let workspace = Self::new();
        std::fs::write(&workspace.state, json).unwrap();
        workspace
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_cbq"))
            .arg("--config-file")
            .arg(&self.config)
            .arg("--state-file")
            .arg(&self.state)
            .args(["--no-color", "--log-level", "error"])
            .args(args)
            .output()
            .unwrap()
    }

    fn state_json(&self) -> serde_json::Value {
        read_json(&self.state)
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_status_of_fresh_install() {
    let ws = Workspace::new();

    let output = ws.run(&["status"]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Capture: inactive  Mode: queue\nQueue is empty\n"
    );
    // Reading never creates the state file
    assert!(!ws.state.exists());
}

#[test]
fn test_status_lists_items() {
    let ws = Workspace::with_state(r#"{"items":["one","two"],"active":true,"is_stack":true}"#);

    let output = ws.run(&["status"]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Capture: active  Mode: stack\n1: one\n2: two <- next\n"
    );
}

#[test]
fn test_pop_follows_persisted_mode_and_flag() {
    let ws = Workspace::with_state(r#"{"items":["a","b","c"],"active":true,"is_stack":false}"#);

    let output = ws.run(&["pop"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Popped: a\n");

    let output = ws.run(&["pop", "--stack"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Popped: c\n");

    assert_eq!(ws.state_json()["items"], serde_json::json!(["b"]));
}

#[test]
fn test_pop_empty_queue_fails() {
    let ws = Workspace::new();

    let output = ws.run(&["pop"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Queue is empty"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_clear_keeps_flags() {
    let ws = Workspace::with_state(r#"{"items":["a","b"],"active":true,"is_stack":true}"#);

    let output = ws.run(&["clear"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "Queue cleared\n");
    assert_eq!(
        ws.state_json(),
        serde_json::json!({"items": [], "active": true, "is_stack": true})
    );
}

#[test]
fn test_mode_persists_without_touching_items() {
    let ws = Workspace::with_state(r#"{"items":["a","b"],"active":true,"is_stack":false}"#);

    let output = ws.run(&["mode", "stack"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "Mode set to stack\n");
    let state = ws.state_json();
    assert_eq!(state["is_stack"], serde_json::json!(true));
    assert_eq!(state["items"], serde_json::json!(["a", "b"]));
}

#[test]
fn test_corrupt_state_file_is_fatal() {
    let ws = Workspace::with_state("{ this is not json");

    let output = ws.run(&["status"]);

    assert_eq!(output.status.code(), Some(1));
    // The broken file is left for the user to inspect
    assert_eq!(std::fs::read_to_string(&ws.state).unwrap(), "{ this is not json");
}

#[test]
fn test_missing_config_file_is_fatal() {
    let ws = Workspace::new();

    let output = Command::new(env!("CARGO_BIN_EXE_cbq"))
        .args(["--config-file", "/definitely/not/here.toml", "status"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
    assert!(!ws.state.exists());
}

#[test]
fn test_version_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_cbq"))
        .arg("--version")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).starts_with(&format!("cbq {}", env!("CARGO_PKG_VERSION"))));
}
