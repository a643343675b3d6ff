//! Index page generation
//!
//! Scans every persisted document, extracts a short status snippet from
//! each, and regenerates the single cross-topic index page from scratch.
//! A document that fails to read is skipped; it never aborts index
//! generation for the others.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::ReportConfig;
use crate::document::{heading_dates, last_section_body};
use crate::error::Result;

/// Placeholder used when a document has no sections or a label is missing
pub const NOT_RECORDED: &str = "記載なし";

fn status_re() -> &'static Regex {
    static STATUS_RE: OnceLock<Regex> = OnceLock::new();
    STATUS_RE.get_or_init(|| Regex::new(r"最新の状況[（(]?.*?[)）]?[：:]?\s*\n(.+)").unwrap())
}

fn timing_re() -> &'static Regex {
    static TIMING_RE: OnceLock<Regex> = OnceLock::new();
    TIMING_RE.get_or_init(|| Regex::new(r"いつ買うべきか[（(]?.*?[)）]?[：:]?\s*\n(.+)").unwrap())
}

/// One listing row on the index page, recomputed from scratch every run
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub title: String,
    pub href: String,
    pub status: String,
    pub timing: String,
}

/// Result of one index build
#[derive(Debug, Clone, Serialize)]
pub struct IndexSummary {
    pub entries: Vec<IndexEntry>,
    /// Lexical maximum over all section-heading dates, empty when none
    pub latest: String,
}

/// Extract the "current situation" and "purchase timing" lines from the
/// last section of a document body. Missing label or missing section
/// degrades to the placeholder.
pub fn extract_summary_lines(content: &str) -> (String, String) {
    let Some(body) = last_section_body(content) else {
        return (NOT_RECORDED.to_string(), NOT_RECORDED.to_string());
    };

    let extract = |re: &Regex| {
        re.captures(&body)
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_else(|| NOT_RECORDED.to_string())
    };

    (extract(status_re()), extract(timing_re()))
}

/// Persisted documents under `output_dir` as `(file_name, content)`,
/// sorted by file name. Unreadable files are skipped with a warning.
fn scan_documents(output_dir: &Path) -> Vec<(String, String)> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(output_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        match fs::read_to_string(path) {
            Ok(content) => {
                let name = entry.file_name().to_string_lossy().to_string();
                documents.push((name, content));
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable document");
            }
        }
    }

    documents
}

/// Regenerate the index page from every persisted document.
///
/// The page is fully overwritten on every call; nothing in it is
/// persisted independently.
pub fn build_index(config: &ReportConfig) -> Result<IndexSummary> {
    let documents = scan_documents(&config.output_dir);

    let mut entries = Vec::with_capacity(documents.len());
    let mut latest = String::new();

    for (name, content) in &documents {
        let stem = name.strip_suffix(".html").unwrap_or(name.as_str());
        // Strip the filter suffix defensively for documents written by
        // older runs that kept it in the file name
        let title = stem.replace(&config.filter_suffix, "");
        let (status, timing) = extract_summary_lines(content);

        if let Some(newest) = heading_dates(content).into_iter().max() {
            if newest > latest {
                latest = newest;
            }
        }

        tracing::debug!(document = %name, status = %status, timing = %timing, "index entry");

        entries.push(IndexEntry {
            title,
            href: format!("{}/{}", config.output_dir.display(), name),
            status,
            timing,
        });
    }

    fs::write(&config.index_path, render_index(&entries, &latest))?;

    Ok(IndexSummary { entries, latest })
}

/// Recorded state of one persisted document, for read-only listings
#[derive(Debug, Clone, Serialize)]
pub struct DocumentStatus {
    pub title: String,
    /// Section-heading dates in document order
    pub dates: Vec<String>,
}

/// Read-only scan of every persisted document's recorded dates
pub fn document_statuses(config: &ReportConfig) -> Vec<DocumentStatus> {
    scan_documents(&config.output_dir)
        .into_iter()
        .map(|(name, content)| {
            let stem = name.strip_suffix(".html").unwrap_or(name.as_str());
            DocumentStatus {
                title: stem.replace(&config.filter_suffix, ""),
                dates: heading_dates(&content),
            }
        })
        .collect()
}

fn render_index(entries: &[IndexEntry], latest: &str) -> String {
    let links = entries
        .iter()
        .map(|entry| {
            format!(
                "<li><a href=\"{}\">{}</a><br>最新の状況：{}<br>いつ買うべきか：{}</li>",
                entry.href, entry.title, entry.status, entry.timing
            )
        })
        .collect::<Vec<_>>()
        .join("\n    ");

    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
  <meta charset="UTF-8">
  <meta name="robots" content="noindex">
  <title>米国株レポート一覧</title>
</head>
<body>
  <h1>米国株レポート</h1>
  <ul>
    {links}
  </ul>
  <p>最終更新日: {latest}</p>
</body>
</html>
"#,
        links = links,
        latest = latest
    )
}
