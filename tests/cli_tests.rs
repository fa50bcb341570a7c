//! CLI integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn clip_history_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_clip-history"))
}

/// Binary isolated from the user's config and store
fn isolated(home: &Path) -> Command {
    let mut cmd = clip_history_bin();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("CLIP_HISTORY_STORE")
        .env_remove("CLIP_HISTORY_MAX_ITEMS")
        .env_remove("RUST_LOG");
    cmd
}

fn seeded_store(dir: &TempDir, items: Value) -> PathBuf {
    let path = dir.path().join("store.json");
    fs::write(&path, json!({ "clipboard-history": items }).to_string()).unwrap();
    path
}

fn text_item(value: &str, copied_at: &str) -> Value {
    json!({ "type": "text", "value": value, "copiedAt": copied_at })
}

fn persisted_history(path: &Path) -> Vec<Value> {
    let store: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    store["clipboard-history"].as_array().cloned().unwrap_or_default()
}

#[test]
fn help_output() {
    clip_history_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("clipboard"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("copy"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("--store"));
}

#[test]
fn version_output() {
    clip_history_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("clip-history"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_command_is_usage_error() {
    clip_history_bin().assert().code(2);
}

#[test]
fn list_empty_store_shows_hint() {
    let home = tempfile::tempdir().unwrap();
    isolated(home.path())
        .args(["list", "--store"])
        .arg(home.path().join("none.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn list_shows_newest_first_with_indices() {
    let home = tempfile::tempdir().unwrap();
    let store = seeded_store(
        &home,
        json!([
            text_item("newest", "2024-03-14T10:00:00+00:00"),
            text_item("oldest", "2024-03-13T10:00:00+00:00"),
        ]),
    );

    let output = isolated(home.path())
        .args(["list", "--store"])
        .arg(&store)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let newest = stdout.find("newest").unwrap();
    let oldest = stdout.find("oldest").unwrap();
    assert!(newest < oldest);
}

#[test]
fn list_query_matches_text_case_insensitively() {
    let home = tempfile::tempdir().unwrap();
    let store = seeded_store(
        &home,
        json!([
            text_item("Hello World", "2024-03-14T10:00:00+00:00"),
            text_item("goodbye", "2024-03-14T09:00:00+00:00"),
        ]),
    );

    isolated(home.path())
        .args(["list", "-q", "WORLD", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello World"))
        .stdout(predicate::str::contains("goodbye").not());
}

#[test]
fn list_query_without_match_prints_no_results() {
    let home = tempfile::tempdir().unwrap();
    let store = seeded_store(&home, json!([text_item("abc", "2024-03-14T10:00:00+00:00")]));

    isolated(home.path())
        .args(["list", "-q", "zzz", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("No results"));
}

#[test]
fn list_with_every_kind_off_is_not_a_failed_search() {
    let home = tempfile::tempdir().unwrap();
    let store = seeded_store(&home, json!([text_item("abc", "2024-03-14T10:00:00+00:00")]));

    isolated(home.path())
        .args(["list", "--no-text", "--no-images", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("No results").not())
        .stderr(predicate::str::contains("filtered out"));
}

#[test]
fn list_json_includes_original_indices() {
    let home = tempfile::tempdir().unwrap();
    let store = seeded_store(
        &home,
        json!([
            text_item("first", "2024-03-14T10:00:00+00:00"),
            text_item("second", "2024-03-14T09:00:00+00:00"),
        ]),
    );

    let output = isolated(home.path())
        .args(["list", "--json", "-q", "second", "--store"])
        .arg(&store)
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["index"], json!(1));
    assert_eq!(rows[0]["value"], json!("second"));
}

#[test]
fn list_no_text_hides_text_items() {
    let home = tempfile::tempdir().unwrap();
    let store = seeded_store(&home, json!([text_item("hidden", "2024-03-14T10:00:00+00:00")]));

    isolated(home.path())
        .args(["list", "--no-text", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("hidden").not());
}

#[test]
fn delete_keeps_entries_from_older_versions() {
    let home = tempfile::tempdir().unwrap();
    let legacy = text_item("legacy", "Thu Mar 14 2024 09:30:00 GMT-0700 (PDT)");
    let undated = json!({ "type": "text", "value": "undated" });
    let store = seeded_store(
        &home,
        json!([
            text_item("newest", "2024-03-15T10:00:00+00:00"),
            legacy.clone(),
            undated.clone(),
        ]),
    );

    isolated(home.path())
        .args(["list", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("legacy"));

    isolated(home.path())
        .args(["delete", "0", "--store"])
        .arg(&store)
        .assert()
        .success();

    assert_eq!(persisted_history(&store), vec![legacy, undated]);
}

#[test]
fn store_env_var_is_honored() {
    let home = tempfile::tempdir().unwrap();
    let store = seeded_store(&home, json!([text_item("from env", "2024-03-14T10:00:00+00:00")]));

    isolated(home.path())
        .env("CLIP_HISTORY_STORE", &store)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("from env"));
}

#[test]
fn delete_removes_one_occurrence() {
    let home = tempfile::tempdir().unwrap();
    let store = seeded_store(
        &home,
        json!([
            text_item("dup", "2024-03-14T10:00:00+00:00"),
            text_item("keep", "2024-03-14T09:00:00+00:00"),
            text_item("dup", "2024-03-14T08:00:00+00:00"),
        ]),
    );

    isolated(home.path())
        .args(["delete", "0", "--store"])
        .arg(&store)
        .assert()
        .success();

    let history = persisted_history(&store);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["value"], json!("keep"));
    assert_eq!(history[1]["value"], json!("dup"));
}

#[test]
fn delete_all_removes_every_occurrence() {
    let home = tempfile::tempdir().unwrap();
    let store = seeded_store(
        &home,
        json!([
            text_item("dup", "2024-03-14T10:00:00+00:00"),
            text_item("keep", "2024-03-14T09:00:00+00:00"),
            text_item("dup", "2024-03-14T08:00:00+00:00"),
        ]),
    );

    isolated(home.path())
        .args(["delete", "2", "--all", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stderr(predicate::str::contains("Deleted 2 items"));

    let history = persisted_history(&store);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["value"], json!("keep"));
}

#[test]
fn delete_out_of_range_fails() {
    let home = tempfile::tempdir().unwrap();
    let store = seeded_store(&home, json!([]));

    isolated(home.path())
        .args(["delete", "4", "--store"])
        .arg(&store)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("index 4"));
}

#[test]
fn copy_out_of_range_fails() {
    let home = tempfile::tempdir().unwrap();
    let store = seeded_store(&home, json!([]));

    isolated(home.path())
        .args(["copy", "0", "--store"])
        .arg(&store)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No history item"));
}

#[test]
fn clear_empties_history() {
    let home = tempfile::tempdir().unwrap();
    let store = seeded_store(&home, json!([text_item("gone", "2024-03-14T10:00:00+00:00")]));

    isolated(home.path())
        .args(["clear", "--store"])
        .arg(&store)
        .assert()
        .success();

    assert!(persisted_history(&store).is_empty());
}

#[test]
fn corrupt_store_is_an_error() {
    let home = tempfile::tempdir().unwrap();
    let store = home.path().join("store.json");
    fs::write(&store, "not json").unwrap();

    isolated(home.path())
        .args(["list", "--store"])
        .arg(&store)
        .assert()
        .code(1);
}

#[test]
fn config_path_command() {
    let home = tempfile::tempdir().unwrap();
    isolated(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("clip-history"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_help() {
    clip_history_bin()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("path"));
}
