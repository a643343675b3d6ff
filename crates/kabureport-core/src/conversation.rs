//! Conversation export reading
//!
//! Turns the raw branching export (`conversations.json`, an array of
//! threads with a node `mapping`) into an ordered sequence of
//! (role, text) messages per thread.
//!
//! Nodes are emitted in the mapping's native enumeration order, not by
//! following parent links; `serde_json` is built with `preserve_order`
//! so that order is the export's own. Structurally incomplete nodes
//! (no message payload, no author role, no content parts) are skipped
//! silently in favor of forward progress.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ReportError, Result};

/// Speaker role of a reconstructed message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    /// Any other author (system, tool) - formatted like assistant output
    Other,
}

impl Role {
    fn parse(role: &str) -> Self {
        match role {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other,
        }
    }

    pub fn is_user(self) -> bool {
        self == Role::User
    }

    pub fn is_assistant(self) -> bool {
        self == Role::Assistant
    }
}

/// A reconstructed conversation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// One conversation export unit
#[derive(Debug, Deserialize)]
pub struct Thread {
    #[serde(default)]
    pub title: String,
    /// Node graph keyed by node id. Kept as raw JSON because the export
    /// shape varies between versions; nodes are decoded leniently one at
    /// a time in [`collect_messages`].
    #[serde(default)]
    pub mapping: serde_json::Map<String, Value>,
}

impl Thread {
    /// Topic identity: the trimmed title with `suffix` stripped, or `None`
    /// when the title does not carry the suffix (thread out of scope).
    pub fn topic(&self, suffix: &str) -> Option<String> {
        self.title
            .trim()
            .strip_suffix(suffix)
            .map(|t| t.to_string())
    }
}

/// Read the conversation export. Absence of the file is the only fatal
/// condition in the whole pipeline.
pub fn read_threads(path: &Path) -> Result<Vec<Thread>> {
    if !path.is_file() {
        return Err(ReportError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    let threads: Vec<Thread> = serde_json::from_str(&content)?;
    Ok(threads)
}

/// Walk a thread's mapping and reconstruct its ordered message sequence.
pub fn collect_messages(thread: &Thread) -> Vec<Message> {
    let mut messages = Vec::new();

    for node in thread.mapping.values() {
        let Some(payload) = node.get("message").filter(|m| !m.is_null()) else {
            // Structural/root nodes carry no message payload
            continue;
        };

        let Some(role) = payload
            .get("author")
            .and_then(|a| a.get("role"))
            .and_then(Value::as_str)
        else {
            continue;
        };

        let Some(first_part) = payload
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(Value::as_array)
            .and_then(|parts| parts.first())
        else {
            continue;
        };

        let text = match first_part {
            Value::String(s) => s.clone(),
            // Some export versions wrap the text in a value object
            Value::Object(obj) => obj
                .get("value")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        };

        messages.push(Message::new(Role::parse(role), text));
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn thread_from(value: Value) -> Thread {
        serde_json::from_value(value).unwrap()
    }

    fn node(role: &str, text: Value) -> Value {
        json!({
            "message": {
                "author": { "role": role },
                "content": { "parts": [text] }
            }
        })
    }

    #[test]
    fn test_collect_messages_basic() {
        let thread = thread_from(json!({
            "title": "Foo_米国株",
            "mapping": {
                "a": node("user", json!("hello")),
                "b": node("assistant", json!("2024-01-01 の分析")),
            }
        }));

        let messages = collect_messages(&thread);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::new(Role::User, "hello"));
        assert_eq!(messages[1].role, Role::Assistant);
    }

    #[test]
    fn test_collect_skips_nodes_without_message() {
        let thread = thread_from(json!({
            "title": "t",
            "mapping": {
                "root": { "id": "root" },
                "null": { "message": null },
                "a": node("user", json!("x")),
            }
        }));

        assert_eq!(collect_messages(&thread).len(), 1);
    }

    #[test]
    fn test_collect_skips_missing_role_or_parts() {
        let thread = thread_from(json!({
            "title": "t",
            "mapping": {
                "no_role": { "message": { "content": { "parts": ["x"] } } },
                "no_parts": { "message": { "author": { "role": "user" }, "content": {} } },
                "empty_parts": { "message": { "author": { "role": "user" }, "content": { "parts": [] } } },
            }
        }));

        assert!(collect_messages(&thread).is_empty());
    }

    #[test]
    fn test_collect_extracts_nested_value_object() {
        let thread = thread_from(json!({
            "title": "t",
            "mapping": {
                "a": node("assistant", json!({ "value": "nested text" })),
                "b": node("assistant", json!({ "other": "field" })),
                "c": node("assistant", json!(42)),
            }
        }));

        let messages = collect_messages(&thread);
        assert_eq!(messages[0].text, "nested text");
        assert_eq!(messages[1].text, "");
        assert_eq!(messages[2].text, "");
    }

    #[test]
    fn test_collect_preserves_mapping_order() {
        let thread = thread_from(json!({
            "title": "t",
            "mapping": {
                "z": node("user", json!("first")),
                "a": node("user", json!("second")),
                "m": node("user", json!("third")),
            }
        }));

        let texts: Vec<_> = collect_messages(&thread)
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unknown_role_maps_to_other() {
        let thread = thread_from(json!({
            "title": "t",
            "mapping": { "a": node("tool", json!("output")) }
        }));

        assert_eq!(collect_messages(&thread)[0].role, Role::Other);
    }

    #[test]
    fn test_topic_suffix_filter() {
        let thread = thread_from(json!({ "title": "  NVDA_米国株 ", "mapping": {} }));
        assert_eq!(thread.topic("_米国株"), Some("NVDA".to_string()));

        let thread = thread_from(json!({ "title": "日本株メモ", "mapping": {} }));
        assert_eq!(thread.topic("_米国株"), None);
    }

    #[test]
    fn test_read_threads_missing_file() {
        let err = read_threads(Path::new("/nonexistent/conversations.json")).unwrap_err();
        assert!(matches!(err, ReportError::InputNotFound { .. }));
    }
}
