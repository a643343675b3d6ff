//! Pipeline orchestration
//!
//! Reader -> Segmenter -> (per unseen date) Summarizer -> Merger, one
//! topic at a time, fully sequential; then the index builder runs once
//! over all persisted documents. The summarization round-trip is the
//! accepted critical path.

use std::fs;

use serde::Serialize;

use crate::config::ReportConfig;
use crate::conversation::{collect_messages, read_threads, Thread};
use crate::document::TopicDocument;
use crate::error::Result;
use crate::index::{build_index, IndexSummary};
use crate::segment::segment_by_date;
use crate::summary::{format_transcript, Summarizer, SummaryOutcome};

/// Per-run statistics for CLI reporting
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunStats {
    /// Threads in scope after suffix filtering
    pub topics: usize,
    /// Sections appended this run
    pub sections_written: usize,
    /// Dates skipped because they were already recorded
    pub sections_skipped: usize,
    /// Sections recorded with the failure sentinel
    pub degraded: usize,
}

/// Process one topic: inspect the existing document, segment the message
/// stream, summarize every unseen date, and merge the new sections in.
pub fn process_topic(
    config: &ReportConfig,
    topic: &str,
    thread: &Thread,
    summarizer: &dyn Summarizer,
    stats: &mut RunStats,
) -> Result<()> {
    let document = TopicDocument::new(&config.output_dir, topic);
    let existing = document.recorded_dates();

    let messages = collect_messages(thread);
    let segments = segment_by_date(&messages);
    tracing::debug!(
        topic = %topic,
        dates = ?segments.keys().collect::<Vec<_>>(),
        "detected dates"
    );

    for (date, bucket) in &segments {
        if existing.contains(date) {
            tracing::info!(topic = %topic, date = %date, "already recorded, skipping");
            stats.sections_skipped += 1;
            continue;
        }

        let transcript = format_transcript(bucket);
        let outcome = summarizer.summarize(&transcript);
        if let SummaryOutcome::Degraded { reason } = &outcome {
            tracing::warn!(
                topic = %topic,
                date = %date,
                reason = %reason,
                "summarization failed, recording sentinel"
            );
            stats.degraded += 1;
        }

        document.append_section(date, &outcome.into_text())?;
        tracing::info!(topic = %topic, date = %date, "section recorded");
        stats.sections_written += 1;
    }

    Ok(())
}

/// Run the whole pipeline: read the export, process every in-scope topic,
/// then regenerate the index page.
pub fn run(
    config: &ReportConfig,
    summarizer: &dyn Summarizer,
) -> Result<(RunStats, IndexSummary)> {
    let threads = read_threads(&config.input)?;
    fs::create_dir_all(&config.output_dir)?;

    let mut stats = RunStats::default();
    for thread in &threads {
        let Some(topic) = thread.topic(&config.filter_suffix) else {
            continue;
        };
        stats.topics += 1;
        process_topic(config, &topic, thread, summarizer, &mut stats)?;
    }

    let index = build_index(config)?;
    Ok((stats, index))
}
