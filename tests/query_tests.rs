//! Integration tests for the read commands

#![allow(deprecated)]

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::{data_dir, init_site, muse_cmd, publish};

#[test]
fn test_archive_excludes_today_and_future() {
    let temp = TempDir::new().unwrap();
    init_site(temp.path());
    publish(temp.path(), "2020-01-01", "Oldest").success();
    publish(temp.path(), "2020-01-02", "Older").success();
    publish(temp.path(), "today", "Current").success();
    publish(temp.path(), "2099-01-01", "Future").success();

    muse_cmd()
        .current_dir(temp.path())
        .arg("archive")
        .assert()
        .success()
        .stdout(predicate::str::contains("2020-01-02  #01    Older\n2020-01-01  #01    Oldest"))
        .stdout(predicate::str::contains("Current").not())
        .stdout(predicate::str::contains("Future").not());

    muse_cmd()
        .current_dir(temp.path())
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current"));
}

#[test]
fn test_today_when_nothing_scheduled() {
    let temp = TempDir::new().unwrap();
    init_site(temp.path());
    muse_cmd()
        .current_dir(temp.path())
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing scheduled"));
}

#[test]
fn test_list_before_and_limit() {
    let temp = TempDir::new().unwrap();
    init_site(temp.path());
    for (date, title) in [("2024-06-01", "A"), ("2024-06-02", "B"), ("2024-06-03", "C")] {
        publish(temp.path(), date, title).success();
    }

    muse_cmd()
        .current_dir(temp.path())
        .args(["list", "--limit", "2"])
        .assert()
        .success()
        .stdout("2024-06-03  #01    C\n2024-06-02  #01    B\n");

    muse_cmd()
        .current_dir(temp.path())
        .args(["list", "--before", "2024-06-03"])
        .assert()
        .success()
        .stdout("2024-06-02  #01    B\n2024-06-01  #01    A\n");
}

#[test]
fn test_show_missing_entry_exits_4() {
    let temp = TempDir::new().unwrap();
    init_site(temp.path());
    muse_cmd()
        .current_dir(temp.path())
        .args(["show", "2024-06-01"])
        .assert()
        .code(4);
}

#[test]
fn test_legacy_records_are_readable() {
    let temp = TempDir::new().unwrap();
    init_site(temp.path());
    let dir = data_dir(temp.path());
    fs::write(
        dir.join("2023-11-02.json"),
        r#"{"id": "2023-11-02", "title": "Old", "imageUrl": "https://cdn/old.jpg", "createdAt": 1.0}"#,
    )
    .unwrap();
    fs::write(
        dir.join("2023-10-01.json"),
        r#"{"scheduledDate": "2023-10-01", "title": "Paneled", "panels": [{"imageUrl": "/p1.jpg"}]}"#,
    )
    .unwrap();
    fs::remove_file(dir.join("index.json")).unwrap();

    muse_cmd()
        .current_dir(temp.path())
        .arg("archive")
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-11-02  -      Old"))
        .stdout(predicate::str::contains("2023-10-01  -      Paneled"));

    muse_cmd()
        .current_dir(temp.path())
        .args(["show", "2023-11-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("comic:     https://cdn/old.jpg"));
}

#[test]
fn test_corrupt_record_skipped_in_listing() {
    let temp = TempDir::new().unwrap();
    init_site(temp.path());
    publish(temp.path(), "2024-06-01", "Good").success();
    fs::write(data_dir(temp.path()).join("2024-06-02.json"), "{broken").unwrap();
    muse_cmd().current_dir(temp.path()).arg("reindex").assert().success();

    muse_cmd()
        .current_dir(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout("2024-06-01  #01    Good\n");
}

#[test]
fn test_reindex_rebuilds_from_records() {
    let temp = TempDir::new().unwrap();
    init_site(temp.path());
    publish(temp.path(), "2024-06-01", "A").success();
    publish(temp.path(), "2024-06-02", "B").success();
    let index = data_dir(temp.path()).join("index.json");
    fs::write(&index, "garbage").unwrap();

    muse_cmd()
        .current_dir(temp.path())
        .arg("reindex")
        .assert()
        .success()
        .stdout("Indexed 2 entries\n");

    let rebuilt = fs::read_to_string(&index).unwrap();
    assert!(rebuilt.find("2024-06-02").unwrap() < rebuilt.find("2024-06-01").unwrap());
}
