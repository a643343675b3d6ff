use std::fs;

use predicates::prelude::*;
use tempfile::tempdir;

use crate::cli::support::{kabureport, write_export, write_extended_export};

#[test]
fn test_run_missing_input_is_fatal() {
    let dir = tempdir().unwrap();

    kabureport()
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("input file not found"));

    // Nothing else ran
    assert!(!dir.path().join("output").exists());
    assert!(!dir.path().join("index.html").exists());
}

#[test]
fn test_run_records_sentinel_sections_and_index() {
    let dir = tempdir().unwrap();
    write_export(dir.path());

    kabureport()
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Processed 1 topics: 2 new sections (0 skipped, 2 degraded)",
        ));

    let report = fs::read_to_string(dir.path().join("output/NVDA.html")).unwrap();
    assert!(report.contains("<h2>2024-01-01</h2>\n<pre>要約エラー</pre>"));
    assert!(report.contains("<h2>2024-01-05</h2>"));

    // Out-of-scope thread produced no document
    assert!(!dir.path().join("output/日本株メモ.html").exists());

    let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(index.contains(">NVDA</a>"));
    assert!(index.contains("最終更新日: 2024-01-05"));
}

#[test]
fn test_second_run_is_idempotent() {
    let dir = tempdir().unwrap();
    write_export(dir.path());

    kabureport().current_dir(dir.path()).arg("run").assert().success();
    let first = fs::read_to_string(dir.path().join("output/NVDA.html")).unwrap();

    kabureport()
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "0 new sections (2 skipped, 0 degraded)",
        ));

    let second = fs::read_to_string(dir.path().join("output/NVDA.html")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_append_only_across_runs() {
    let dir = tempdir().unwrap();
    write_export(dir.path());

    kabureport().current_dir(dir.path()).arg("run").assert().success();
    let before = fs::read_to_string(dir.path().join("output/NVDA.html")).unwrap();

    write_extended_export(dir.path());
    kabureport()
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1 new sections (2 skipped, 1 degraded)",
        ));

    let after = fs::read_to_string(dir.path().join("output/NVDA.html")).unwrap();
    // Existing bytes up to the closing body tag are untouched
    let prefix = &before[..before.rfind("</body>").unwrap()];
    assert!(after.starts_with(prefix));
    assert!(after.contains("<h2>2024-01-07</h2>"));

    let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(index.contains("最終更新日: 2024-01-07"));
}

#[test]
fn test_run_json_format() {
    let dir = tempdir().unwrap();
    write_export(dir.path());

    kabureport()
        .current_dir(dir.path())
        .args(["--format", "json", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sections_written\": 2"))
        .stdout(predicate::str::contains("\"last_updated\": \"2024-01-05\""));
}

#[test]
fn test_run_without_api_key_is_usage_error() {
    let dir = tempdir().unwrap();
    write_export(dir.path());

    kabureport()
        .current_dir(dir.path())
        .env_remove("GEMINI_API_KEY")
        .arg("run")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("missing API key"));
}

#[test]
fn test_run_with_custom_paths() {
    let dir = tempdir().unwrap();
    write_export(dir.path());
    fs::rename(
        dir.path().join("conversations.json"),
        dir.path().join("export.json"),
    )
    .unwrap();

    kabureport()
        .current_dir(dir.path())
        .args([
            "run",
            "--input",
            "export.json",
            "--output-dir",
            "reports",
            "--index",
            "top.html",
        ])
        .assert()
        .success();

    assert!(dir.path().join("reports/NVDA.html").is_file());
    assert!(dir.path().join("top.html").is_file());
}
