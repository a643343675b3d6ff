//! `kabureport list` command - list topics and recorded dates

use kabureport_core::config::ReportConfig;
use kabureport_core::error::Result;
use kabureport_core::index::document_statuses;

use crate::cli::{Cli, OutputFormat};

/// Execute the list command
pub fn execute(cli: &Cli, config: &ReportConfig) -> Result<()> {
    let statuses = document_statuses(config);

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&statuses)?);
        }
        OutputFormat::Human => {
            if statuses.is_empty() {
                if !cli.quiet {
                    println!("No reports found in {}", config.output_dir.display());
                }
            } else {
                for status in &statuses {
                    let latest = status
                        .dates
                        .iter()
                        .max()
                        .map(String::as_str)
                        .unwrap_or("-");
                    println!(
                        "{} [{} dates] latest {}",
                        status.title,
                        status.dates.len(),
                        latest
                    );
                }
            }
        }
    }

    Ok(())
}
