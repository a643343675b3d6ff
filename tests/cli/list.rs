use predicates::prelude::*;
use tempfile::tempdir;

use crate::cli::support::{kabureport, write_export};

#[test]
fn test_list_empty() {
    let dir = tempdir().unwrap();

    kabureport()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No reports found"));
}

#[test]
fn test_list_shows_recorded_dates() {
    let dir = tempdir().unwrap();
    write_export(dir.path());

    kabureport().current_dir(dir.path()).arg("run").assert().success();

    kabureport()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("NVDA [2 dates] latest 2024-01-05"));
}

#[test]
fn test_list_json_format() {
    let dir = tempdir().unwrap();
    write_export(dir.path());

    kabureport().current_dir(dir.path()).arg("run").assert().success();

    kabureport()
        .current_dir(dir.path())
        .args(["--format", "json", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"NVDA\""))
        .stdout(predicate::str::contains("2024-01-01"));
}
