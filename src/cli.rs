//! CLI argument parsing for kabureport
//!
//! Supports global flags: --root, --format, --quiet, --verbose,
//! --log-level, --log-json.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use kabureport_core::format::OutputFormat;

/// Kabureport - incremental HTML report generator for exported
/// stock-analysis conversation logs
#[derive(Parser, Debug)]
#[command(name = "kabureport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory for locating kabureport.toml
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Explicit log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline: read the export, update per-topic reports,
    /// rebuild the index page
    Run {
        /// Conversation export to read
        #[arg(long)]
        input: Option<PathBuf>,

        /// Directory holding one HTML report per topic
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Path of the regenerated index page
        #[arg(long)]
        index: Option<PathBuf>,

        /// Topic filter suffix on thread titles
        #[arg(long)]
        suffix: Option<String>,
    },

    /// Rebuild only the index page from existing reports (no network)
    Index {
        /// Directory holding one HTML report per topic
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Path of the regenerated index page
        #[arg(long)]
        index: Option<PathBuf>,

        /// Topic filter suffix stripped from report names
        #[arg(long)]
        suffix: Option<String>,
    },

    /// List topics with their recorded dates (read-only)
    List {
        /// Directory holding one HTML report per topic
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}
