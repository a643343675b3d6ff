//! Persisted per-topic documents
//!
//! One HTML file per topic, holding a strictly append-only sequence of
//! `<h2>YYYY-MM-DD</h2>\n<pre>summary</pre>` sections. That exact section
//! shape is the parsing contract for both existing-date detection and
//! index extraction, so this module owns all reading and writing of it.
//!
//! The merger never touches existing bytes: new sections are inserted
//! immediately before the final `</body>` tag and the file is rewritten
//! in full. Concurrent writers to the same document are out of scope.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;

fn h2_re() -> &'static Regex {
    static H2_RE: OnceLock<Regex> = OnceLock::new();
    H2_RE.get_or_init(|| Regex::new(r"<h2>([^<]*)</h2>").unwrap())
}

fn date_heading_re() -> &'static Regex {
    static DATE_HEADING_RE: OnceLock<Regex> = OnceLock::new();
    DATE_HEADING_RE.get_or_init(|| Regex::new(r"<h2>(\d{4}-\d{2}-\d{2})</h2>").unwrap())
}

fn pre_re() -> &'static Regex {
    static PRE_RE: OnceLock<Regex> = OnceLock::new();
    PRE_RE.get_or_init(|| Regex::new(r"(?s)<pre>(.*?)</pre>").unwrap())
}

/// Escape summary text for embedding inside a `<pre>` block
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Inverse of [`escape_html`]
pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// All `YYYY-MM-DD` section-heading dates in document order
pub fn heading_dates(content: &str) -> Vec<String> {
    date_heading_re()
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// The unescaped `<pre>` body of the last section (by document order),
/// or `None` when the document has no date heading or no following block.
pub fn last_section_body(content: &str) -> Option<String> {
    let last_heading = date_heading_re().find_iter(content).last()?;
    let tail = &content[last_heading.end()..];
    let caps = pre_re().captures(tail)?;
    Some(unescape_html(&caps[1]))
}

/// The durable record for one topic
#[derive(Debug, Clone)]
pub struct TopicDocument {
    title: String,
    path: PathBuf,
}

impl TopicDocument {
    /// Document location for a suffix-stripped topic title
    pub fn new(output_dir: &Path, title: &str) -> Self {
        Self {
            title: title.to_string(),
            path: output_dir.join(format!("{}.html", title)),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Dates already recorded in this document.
    ///
    /// Never fails the caller: a missing or unreadable document degrades to
    /// an empty set, which only risks redundant re-summarization, never
    /// data loss.
    pub fn recorded_dates(&self) -> BTreeSet<String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return BTreeSet::new(),
            Err(err) => {
                tracing::warn!(topic = %self.title, error = %err, "unreadable document, treating as empty");
                return BTreeSet::new();
            }
        };

        h2_re()
            .captures_iter(&content)
            .map(|caps| caps[1].trim().to_string())
            .collect()
    }

    /// Append one `(date, summary)` section, creating the document from the
    /// page shell on first write. Performs no de-duplication: the caller is
    /// expected to have consulted [`Self::recorded_dates`] first.
    pub fn append_section(&self, date: &str, summary: &str) -> Result<()> {
        let section = format!("<h2>{}</h2>\n<pre>{}</pre>", date, escape_html(summary));

        let content = if self.exists() {
            let existing = fs::read_to_string(&self.path)?;
            match existing.rfind("</body>") {
                Some(pos) => {
                    let mut updated = String::with_capacity(existing.len() + section.len() + 1);
                    updated.push_str(&existing[..pos]);
                    updated.push_str(&section);
                    updated.push('\n');
                    updated.push_str(&existing[pos..]);
                    updated
                }
                None => {
                    // Malformed shell; keep prior bytes and append at the end
                    tracing::warn!(topic = %self.title, "document has no </body> tag, appending at end");
                    format!("{}\n{}", existing, section)
                }
            }
        } else {
            page_shell(&self.title, &section)
        };

        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Fixed page shell wrapped around the first section of a new document
fn page_shell(title: &str, content: &str) -> String {
    format!(
        r#"<html>
<head>
  <meta charset='utf-8'>
  <title>{title}</title>
  <style>
    body {{
      font-family: sans-serif;
      margin: 40px;
    }}
    pre {{
      white-space: pre-wrap;
      word-break: break-word;
      background-color: #f5f5f5;
      padding: 1em;
      border-radius: 6px;
    }}
    h2 {{
      border-bottom: 1px solid #ccc;
      padding-bottom: 0.2em;
      margin-top: 2em;
    }}
  </style>
</head>
<body>
  <h1>{title} - 分析要約履歴</h1>
  {content}
</body>
</html>
"#,
        title = title,
        content = content
    )
}
