//! Date segmentation
//!
//! Scans an ordered message sequence and buckets messages by calendar
//! date. Only assistant messages can move the date cursor; every message
//! (including the one that set the date, and user messages) lands in the
//! bucket of the most recently detected date. Messages seen before any
//! date is established are dropped.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::conversation::Message;

/// Messages grouped by canonical `YYYY-MM-DD` key, ascending by date
pub type DateSegments = BTreeMap<String, Vec<Message>>;

fn date_re() -> &'static Regex {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    DATE_RE.get_or_init(|| Regex::new(r"(20\d{2})[-/](\d{1,2})[-/](\d{1,2})").unwrap())
}

/// Extract the first date mention in `text`, canonicalized to zero-padded
/// `YYYY-MM-DD`. Subsequent date mentions in the same text are ignored.
/// Calendar-impossible matches (month 13, day 40) yield `None` so that
/// every produced key stays lexically comparable.
pub fn extract_date(text: &str) -> Option<String> {
    let caps = date_re().captures(text)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    chrono::NaiveDate::from_ymd_opt(year, month, day)?;
    Some(format!("{:04}-{:02}-{:02}", year, month, day))
}

/// Partition `messages` into date buckets.
///
/// The cursor lives inside this call, so it resets for every topic.
pub fn segment_by_date(messages: &[Message]) -> DateSegments {
    let mut segments = DateSegments::new();
    let mut current_date: Option<String> = None;

    for message in messages {
        if message.role.is_assistant() {
            if let Some(date) = extract_date(&message.text) {
                current_date = Some(date);
            }
        }

        if let Some(date) = &current_date {
            segments
                .entry(date.clone())
                .or_default()
                .push(message.clone());
        }
    }

    segments
}
