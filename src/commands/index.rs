//! `kabureport index` command - rebuild the index page only
//!
//! Regenerates the cross-topic index from the persisted documents on
//! disk. Makes no network calls and never touches the documents.

use kabureport_core::config::ReportConfig;
use kabureport_core::error::Result;
use kabureport_core::index::build_index;

use crate::cli::{Cli, OutputFormat};

/// Execute the index command
pub fn execute(cli: &Cli, config: &ReportConfig) -> Result<()> {
    let summary = build_index(config)?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "ok",
                "index_entries": summary.entries.len(),
                "last_updated": summary.latest,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!(
                    "Index rebuilt: {} entries, last updated {}",
                    summary.entries.len(),
                    if summary.latest.is_empty() {
                        "-"
                    } else {
                        summary.latest.as_str()
                    }
                );
            }
        }
    }

    Ok(())
}
