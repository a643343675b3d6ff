//! Command dispatch logic for kabureport

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use kabureport_core::config::ReportConfig;
use kabureport_core::error::Result;

use crate::cli::{Cli, Commands};
use crate::commands;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    // Directory for resolving kabureport.toml
    let root = cli
        .root
        .clone()
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if cli.verbose {
        eprintln!("resolve_root: {:?}", start.elapsed());
    }

    match &cli.command {
        None => handle_no_command(),

        Some(Commands::Run {
            input,
            output_dir,
            index,
            suffix,
        }) => {
            let mut config = load_config(&root, output_dir, index, suffix)?;
            if let Some(input) = input {
                config.input = input.clone();
            }
            commands::run::execute(cli, &config, start)
        }

        Some(Commands::Index {
            output_dir,
            index,
            suffix,
        }) => {
            let config = load_config(&root, output_dir, index, suffix)?;
            commands::index::execute(cli, &config)
        }

        Some(Commands::List { output_dir }) => {
            let config = load_config(&root, output_dir, &None, &None)?;
            commands::list::execute(cli, &config)
        }
    }
}

/// Build the run configuration once: file + env, then CLI overrides
fn load_config(
    root: &PathBuf,
    output_dir: &Option<PathBuf>,
    index: &Option<PathBuf>,
    suffix: &Option<String>,
) -> Result<ReportConfig> {
    let mut config = ReportConfig::load(root)?;

    if let Some(output_dir) = output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(index) = index {
        config.index_path = index.clone();
    }
    if let Some(suffix) = suffix {
        config.filter_suffix = suffix.clone();
    }

    Ok(config)
}

fn handle_no_command() -> Result<()> {
    println!("kabureport {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Incremental HTML report generator for exported conversation logs.");
    println!();
    println!("Run `kabureport --help` for usage information.");
    Ok(())
}
