use std::fs;

use predicates::prelude::*;
use tempfile::tempdir;

use crate::cli::support::{kabureport, write_export};

#[test]
fn test_index_with_no_reports() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("output")).unwrap();

    kabureport()
        .current_dir(dir.path())
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("Index rebuilt: 0 entries"));

    let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(index.contains("米国株レポート"));
}

#[test]
fn test_index_rebuilds_from_existing_reports() {
    let dir = tempdir().unwrap();
    write_export(dir.path());

    kabureport().current_dir(dir.path()).arg("run").assert().success();
    fs::remove_file(dir.path().join("index.html")).unwrap();

    kabureport()
        .current_dir(dir.path())
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("Index rebuilt: 1 entries"))
        .stdout(predicate::str::contains("2024-01-05"));

    assert!(dir.path().join("index.html").is_file());
}

#[test]
fn test_index_json_format() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("output")).unwrap();

    kabureport()
        .current_dir(dir.path())
        .args(["--format", "json", "index"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"index_entries\": 0"));
}
