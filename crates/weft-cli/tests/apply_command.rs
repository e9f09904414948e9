//! Integration tests for the `weft` binary.
//!
//! Runs `weft apply` against edit files in a temporary directory and checks
//! the printed outcome, the exit status, and the files left on disk.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use tempfile::TempDir;
use url::Url;

fn file_uri(path: &Path) -> String {
    Url::from_file_path(path)
        .expect("absolute temp path")
        .to_string()
}

fn weft(dir: &TempDir) -> assert_cmd::Command {
    let mut command = cargo_bin_cmd!("weft");
    command.current_dir(dir.path()).env("WEFT_LOG_FILTER", "off");
    command
}

#[test]
fn applied_edit_rewrites_the_file() {
    let dir = TempDir::new().expect("create temp dir");
    let source = dir.path().join("notes.txt");
    fs::write(&source, "first\nsecond\n").expect("write source");
    let edit = serde_json::json!({
        "changes": {
            file_uri(&source): [
                { "range": { "start": { "line": 1, "character": 0 },
                             "end": { "line": 1, "character": 6 } },
                  "newText": "2nd" }
            ]
        }
    });
    let edit_path = dir.path().join("edit.json");
    fs::write(&edit_path, edit.to_string()).expect("write edit");

    weft(&dir)
        .arg("apply")
        .arg(&edit_path)
        .assert()
        .success()
        .stdout(contains(r#"{"applied":true}"#));

    assert_eq!(
        fs::read_to_string(&source).expect("read source"),
        "first\n2nd\n"
    );
}

#[test]
fn conflicting_edit_is_rejected() {
    let dir = TempDir::new().expect("create temp dir");
    let source = dir.path().join("notes.txt");
    fs::write(&source, "first\n").expect("write source");
    let edit = serde_json::json!({
        "changes": {
            file_uri(&source): [
                { "range": { "start": { "line": 0, "character": 0 },
                             "end": { "line": 0, "character": 3 } },
                  "newText": "x" },
                { "range": { "start": { "line": 0, "character": 2 },
                             "end": { "line": 0, "character": 5 } },
                  "newText": "y" }
            ]
        }
    });
    let edit_path = dir.path().join("edit.json");
    fs::write(&edit_path, edit.to_string()).expect("write edit");

    weft(&dir)
        .arg("apply")
        .arg(&edit_path)
        .assert()
        .failure()
        .stdout(contains(r#"{"applied":false}"#));

    assert_eq!(fs::read_to_string(&source).expect("read source"), "first\n");
}

#[test]
fn missing_edit_file_exits_with_failure() {
    let dir = TempDir::new().expect("create temp dir");

    weft(&dir)
        .arg("apply")
        .arg("absent.json")
        .assert()
        .failure()
        .stderr(contains("failed to read workspace edit"));
}

#[test]
fn version_flag_succeeds() {
    let dir = TempDir::new().expect("create temp dir");
    weft(&dir).arg("--version").assert().success();
}
