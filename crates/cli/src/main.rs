use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::*;
use ordo_core::{load_document, DEFAULT_DOCUMENT_FILE};

mod commands;

/// Ordo - A dependency-aware parallel task runner
#[derive(Parser)]
#[command(name = "ordo")]
#[command(about = "Run a tree of tasks honoring dependencies, retries and timeouts")]
#[command(version)]
struct Cli {
    /// Path to the task document (defaults to ordo.yml)
    file: Option<PathBuf>,

    /// Print the execution plan without running anything
    #[arg(long)]
    plan: bool,

    /// Print the JSON Schema for the task document format
    #[arg(long)]
    schema: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.schema {
        return match commands::schema::execute() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report_error(e),
        };
    }

    let path = cli
        .file
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT_FILE));
    let document = match load_document(&path) {
        Ok(document) => document,
        Err(e) => return report_error(anyhow::anyhow!(e)),
    };

    if cli.plan {
        return match commands::plan::execute(&document) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report_error(e),
        };
    }

    match commands::run::execute(&document).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => report_error(e),
    }
}

/// Configuration and parse failures all exit 2; task failures exit 1.
fn report_error(e: anyhow::Error) -> ExitCode {
    eprintln!("{} {:#}", "error:".red().bold(), e);
    ExitCode::from(2)
}
