use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn binder_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("binder"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("BINDER_BACKEND")
        .env_remove("BINDER_REMOTE_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// One category `C` with ten cards, saved as `<dir>/alpha.json`.
fn write_definition(dir: &Path) -> PathBuf {
    let cards: Vec<String> = (1..=10).map(|i| format!("Card {i}")).collect();
    let definition = serde_json::json!({
        "title": "Alpha",
        "categories": [{
            "name": "Main",
            "tabId": "tab-main",
            "prefix": "C",
            "showPrefix": true,
            "odds": null,
            "cards": cards,
        }]
    });
    let path = dir.join("alpha.json");
    fs::write(&path, serde_json::to_string_pretty(&definition).unwrap()).expect("write definition");
    path
}

fn status_json(home: &Path, definition: &Path) -> serde_json::Value {
    let output = binder_cmd(home)
        .args(["status", "--json"])
        .arg(definition)
        .output()
        .expect("run status");
    assert!(output.status.success(), "status failed: {output:?}");
    serde_json::from_slice(&output.stdout).expect("status JSON")
}

#[test]
fn toggled_items_end_up_in_the_share_link() {
    let home = TempDir::new().expect("home");
    let workspace = TempDir::new().expect("workspace");
    let definition = write_definition(workspace.path());

    binder_cmd(home.path())
        .arg("toggle")
        .arg(&definition)
        .args(["C-1", "c-10"])
        .assert()
        .success()
        .stdout(contains("https://localhost/alpha.html#gEA"));

    binder_cmd(home.path())
        .arg("share")
        .arg(&definition)
        .assert()
        .success()
        .stdout(contains("https://localhost/alpha.html#gEA"));

    let status = status_json(home.path(), &definition);
    assert_eq!(status["checked"], serde_json::json!(["C-1", "C-10"]));
    assert_eq!(status["overall"]["checked"], 2);
    assert_eq!(status["overall"]["percent"], 20);
    assert_eq!(status["state"], "unconfigured");
    assert_eq!(status["dirty"], false);
}

#[test]
fn site_flag_changes_the_link() {
    let home = TempDir::new().expect("home");
    let workspace = TempDir::new().expect("workspace");
    let definition = write_definition(workspace.path());

    binder_cmd(home.path())
        .arg("check")
        .arg(&definition)
        .args(["C-1", "--site", "example.com/sets"])
        .assert()
        .success()
        .stdout(contains("https://example.com/sets/alpha.html#gAA"));
}

#[test]
fn unknown_item_changes_nothing() {
    let home = TempDir::new().expect("home");
    let workspace = TempDir::new().expect("workspace");
    let definition = write_definition(workspace.path());

    binder_cmd(home.path())
        .arg("check")
        .arg(&definition)
        .args(["C-1", "X-9"])
        .assert()
        .failure()
        .stderr(contains("no item 'X-9'"));

    let status = status_json(home.path(), &definition);
    assert_eq!(status["overall"]["checked"], 0);
}

#[test]
fn opening_a_shared_token_checks_exactly_those_items() {
    let home = TempDir::new().expect("home");
    let workspace = TempDir::new().expect("workspace");
    let definition = write_definition(workspace.path());

    binder_cmd(home.path())
        .arg("open")
        .arg(&definition)
        .arg("#gEA")
        .assert()
        .success()
        .stdout(contains("Loaded 2 selections"));

    let status = status_json(home.path(), &definition);
    assert_eq!(status["checked"], serde_json::json!(["C-1", "C-10"]));
    assert_eq!(status["address"], "https://localhost/alpha.html#gEA");
}

#[test]
fn clear_then_undo() {
    let home = TempDir::new().expect("home");
    let workspace = TempDir::new().expect("workspace");
    let definition = write_definition(workspace.path());

    binder_cmd(home.path())
        .arg("check")
        .arg(&definition)
        .args(["C-2", "C-3", "C-4"])
        .assert()
        .success();

    binder_cmd(home.path())
        .arg("clear")
        .arg(&definition)
        .assert()
        .success()
        .stdout(contains("Cleared all selections"));
    assert_eq!(status_json(home.path(), &definition)["overall"]["checked"], 0);

    binder_cmd(home.path())
        .arg("clear")
        .arg(&definition)
        .assert()
        .success()
        .stdout(contains("Restored 3 selections"));
    assert_eq!(status_json(home.path(), &definition)["overall"]["checked"], 3);
}

#[test]
fn table_output_lists_categories() {
    let home = TempDir::new().expect("home");
    let workspace = TempDir::new().expect("workspace");
    let definition = write_definition(workspace.path());

    binder_cmd(home.path())
        .arg("status")
        .arg(&definition)
        .assert()
        .success()
        .stdout(contains("Main Cards (C-1\u{2013}C-10)"))
        .stdout(contains("0/10"));
}

#[test]
fn sync_without_credentials_reports_it() {
    let home = TempDir::new().expect("home");
    let workspace = TempDir::new().expect("workspace");
    let definition = write_definition(workspace.path());

    binder_cmd(home.path())
        .args(["remote", "sync"])
        .arg(&definition)
        .assert()
        .failure()
        .stderr(contains("No API key set."));
}

#[test]
fn unreachable_remote_fails_sync_but_clear_still_forgets_credentials() {
    let home = TempDir::new().expect("home");
    let workspace = TempDir::new().expect("workspace");
    let definition = write_definition(workspace.path());
    let dead = "http://127.0.0.1:9/v1/json";

    binder_cmd(home.path())
        .args(["remote", "configure"])
        .arg(&definition)
        .arg("key-1")
        .assert()
        .success()
        .stdout(contains("Credentials saved."));
    let storage = fs::read_to_string(home.path().join(".binder/storage.json")).expect("storage");
    assert!(storage.contains("jsonstorage_api_key"));

    binder_cmd(home.path())
        .args(["remote", "sync"])
        .arg(&definition)
        .args(["--remote-url", dead])
        .assert()
        .failure()
        .stderr(contains("Sync failed:"));

    binder_cmd(home.path())
        .args(["remote", "clear"])
        .arg(&definition)
        .args(["--remote-url", dead])
        .assert()
        .success()
        .stdout(contains("Cloud settings cleared."));
    let storage = fs::read_to_string(home.path().join(".binder/storage.json")).expect("storage");
    assert!(!storage.contains("jsonstorage_api_key"));
    assert_eq!(status_json(home.path(), &definition)["state"], "unconfigured");
}

#[test]
fn reload_refuses_unsynced_changes_unless_forced() {
    let home = TempDir::new().expect("home");
    let workspace = TempDir::new().expect("workspace");
    let definition = write_definition(workspace.path());

    // A configured session that synced "gAA" and has cleared the flags since.
    // The record lives on a port nothing listens on.
    fs::create_dir_all(home.path().join(".binder")).unwrap();
    fs::write(
        home.path().join(".binder/storage.json"),
        r#"{
            "jsonstorage_api_key": "key-1",
            "jsonstorage_blob_uri_alpha": "http://127.0.0.1:9/v1/json/blob-1",
            "session_alpha": "{\"token\":\"AAA\",\"last_synced_token\":\"gAA\"}"
        }"#,
    )
    .unwrap();
    assert_eq!(status_json(home.path(), &definition)["dirty"], true);

    binder_cmd(home.path())
        .arg("reload")
        .arg(&definition)
        .assert()
        .failure()
        .stderr(contains("unsynced changes"));

    binder_cmd(home.path())
        .args(["reload", "--force"])
        .arg(&definition)
        .assert()
        .success()
        .stdout(contains("Reloaded 'Alpha'"));
    assert_eq!(status_json(home.path(), &definition)["dirty"], false);
}

#[test]
fn reload_without_a_session_starts_fresh() {
    let home = TempDir::new().expect("home");
    let workspace = TempDir::new().expect("workspace");
    let definition = write_definition(workspace.path());

    binder_cmd(home.path())
        .arg("reload")
        .arg(&definition)
        .assert()
        .success()
        .stdout(contains("Reloaded 'Alpha': 0/10 collected."));
    assert_eq!(status_json(home.path(), &definition)["token"], "AAA");
}

#[test]
fn changing_the_site_keeps_the_selections() {
    let home = TempDir::new().expect("home");
    let workspace = TempDir::new().expect("workspace");
    let definition = write_definition(workspace.path());

    binder_cmd(home.path())
        .arg("check")
        .arg(&definition)
        .args(["C-1", "C-10"])
        .assert()
        .success()
        .stdout(contains("https://localhost/alpha.html#gEA"));

    binder_cmd(home.path())
        .arg("share")
        .arg(&definition)
        .args(["--site", "example.com/sets"])
        .assert()
        .success()
        .stdout(contains("https://example.com/sets/alpha.html#gEA"));
}

#[test]
fn new_scaffolds_a_definition() {
    let home = TempDir::new().expect("home");
    let data = TempDir::new().expect("data");

    binder_cmd(home.path())
        .args(["new", "New Series", "--base", "--category", "Gold Foil=GF;1:10"])
        .arg("--data-dir")
        .arg(data.path())
        .assert()
        .success()
        .stdout(contains("new_series.json"));

    let raw = fs::read_to_string(data.path().join("new_series.json")).expect("definition");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["title"], "New Series");
    assert_eq!(value["categories"][0]["tabId"], "tab-base");
    assert_eq!(value["categories"][1]["tabId"], "tab-gold-foil");
    assert_eq!(value["categories"][1]["odds"], "1:10");

    binder_cmd(home.path())
        .args(["new", "New Series"])
        .arg("--data-dir")
        .arg(data.path())
        .args(["--category", "Inserts=IN"])
        .assert()
        .failure();
}
