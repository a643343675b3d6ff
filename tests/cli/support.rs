use std::fs;
use std::path::Path;

use assert_cmd::Command;

/// Unroutable endpoint: every summarization call fails fast and the
/// pipeline records the failure sentinel.
pub const DEAD_ENDPOINT: &str = "http://127.0.0.1:1/generate";

pub fn kabureport() -> Command {
    let mut cmd = Command::cargo_bin("kabureport").unwrap();
    cmd.env("GEMINI_API_KEY", "test-key")
        .env("KABUREPORT_ENDPOINT", DEAD_ENDPOINT)
        .env("KABUREPORT_TIMEOUT", "5");
    cmd
}

/// Write a two-thread export: one in-scope topic with two dated segments,
/// one out-of-scope thread.
pub fn write_export(dir: &Path) {
    let export = serde_json::json!([
        {
            "title": "NVDA_米国株",
            "mapping": {
                "a": { "message": { "author": { "role": "assistant" },
                                     "content": { "parts": ["2024-01-01 の分析です"] } } },
                "b": { "message": { "author": { "role": "user" },
                                     "content": { "parts": ["続けて"] } } },
                "c": { "message": { "author": { "role": "assistant" },
                                     "content": { "parts": ["2024-01-05 の続報"] } } },
            }
        },
        {
            "title": "日本株メモ",
            "mapping": {
                "a": { "message": { "author": { "role": "assistant" },
                                     "content": { "parts": ["2024-01-02 対象外"] } } },
            }
        }
    ]);
    fs::write(
        dir.join("conversations.json"),
        serde_json::to_string_pretty(&export).unwrap(),
    )
    .unwrap();
}

/// Same export with a third dated segment for the in-scope topic.
pub fn write_extended_export(dir: &Path) {
    let export = serde_json::json!([
        {
            "title": "NVDA_米国株",
            "mapping": {
                "a": { "message": { "author": { "role": "assistant" },
                                     "content": { "parts": ["2024-01-01 の分析です"] } } },
                "b": { "message": { "author": { "role": "user" },
                                     "content": { "parts": ["続けて"] } } },
                "c": { "message": { "author": { "role": "assistant" },
                                     "content": { "parts": ["2024-01-05 の続報"] } } },
                "d": { "message": { "author": { "role": "assistant" },
                                     "content": { "parts": ["2024-01-07 の追記"] } } },
            }
        }
    ]);
    fs::write(
        dir.join("conversations.json"),
        serde_json::to_string_pretty(&export).unwrap(),
    )
    .unwrap();
}
