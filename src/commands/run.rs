//! `kabureport run` command - the full pipeline
//!
//! Reads the conversation export, updates every in-scope topic's
//! persisted report, then rebuilds the index page.

use std::time::Instant;

use kabureport_core::config::ReportConfig;
use kabureport_core::error::Result;
use kabureport_core::pipeline;
use kabureport_core::summary::GeminiClient;

use crate::cli::{Cli, OutputFormat};

/// Execute the run command
pub fn execute(cli: &Cli, config: &ReportConfig, start: Instant) -> Result<()> {
    // The key is required before any document is touched, like the
    // original batch job: a run without credentials does nothing.
    let client = GeminiClient::new(config)?;

    let (stats, index) = pipeline::run(config, &client)?;

    if cli.verbose {
        eprintln!("pipeline: {:?}", start.elapsed());
    }

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "ok",
                "topics": stats.topics,
                "sections_written": stats.sections_written,
                "sections_skipped": stats.sections_skipped,
                "degraded": stats.degraded,
                "index_entries": index.entries.len(),
                "last_updated": index.latest,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!(
                    "Processed {} topics: {} new sections ({} skipped, {} degraded)",
                    stats.topics, stats.sections_written, stats.sections_skipped, stats.degraded
                );
                println!(
                    "Index updated: {} entries, last updated {}",
                    index.entries.len(),
                    if index.latest.is_empty() {
                        "-"
                    } else {
                        index.latest.as_str()
                    }
                );
            }
        }
    }

    Ok(())
}
