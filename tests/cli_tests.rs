//! Command-line tests for the `flowstate` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn flowstate() -> Command {
    Command::cargo_bin("flowstate").unwrap()
}

#[test]
fn modes_lists_all_durations() {
    flowstate()
        .arg("modes")
        .assert()
        .success()
        .stdout(predicate::str::contains("short-focus"))
        .stdout(predicate::str::contains("50:00"))
        .stdout(predicate::str::contains("10:00"));
}

#[test]
fn modes_json_is_parseable() {
    let output = flowstate().args(["modes", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let modes = value.as_array().unwrap();
    assert_eq!(modes.len(), 4);
    assert_eq!(modes[1]["id"], "long-focus");
    assert_eq!(modes[1]["duration_seconds"], 3000);
}

#[test]
fn tracks_json_lists_catalog() {
    let output = flowstate().args(["tracks", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|track| track["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["rain", "wave", "forest", "fire"]);
}

#[test]
fn completions_bash() {
    flowstate()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flowstate"));
}

#[test]
fn run_rejects_invalid_volume() {
    flowstate()
        .args(["run", "--volume", "150", "--no-sound"])
        .assert()
        .failure();
}

#[test]
fn run_rejects_sound_dir_that_is_a_file() {
    let file = tempfile::NamedTempFile::new().unwrap();

    flowstate()
        .args(["run", "--sound-dir"])
        .arg(file.path())
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("エラー"));
}

#[test]
fn run_session_until_quit() {
    let dir = tempfile::tempdir().unwrap();

    flowstate()
        .args(["run", "--no-sound", "--mode", "short-break", "--sound-dir"])
        .arg(dir.path())
        .write_stdin("add stretch\ntrack rain\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Flow State"))
        .stdout(predicate::str::contains("05:00"))
        .stdout(predicate::str::contains("stretch"))
        .stdout(predicate::str::contains("Rain"));
}

#[test]
fn run_session_ends_on_eof() {
    flowstate()
        .args(["run", "--no-sound"])
        .write_stdin("")
        .assert()
        .success();
}
