use anyhow::Result;
use colored::*;
use ordo_core::{run_document, RunDocument};

/// Execute the document and report the aggregate outcome.
///
/// Returns whether the run succeeded; configuration-stage failures
/// (flattening, duplicate ids, cycles) bubble up as errors.
pub async fn execute(document: &RunDocument) -> Result<bool> {
    let summary = run_document(document)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run tasks: {}", e))?;

    println!();
    println!(
        "{}",
        format!(
            "{} succeeded, {} failed, {} skipped",
            summary.succeeded, summary.failed, summary.skipped
        )
        .dimmed()
    );
    if summary.success {
        println!(
            "{} {}",
            "✓".green().bold(),
            "All required tasks completed successfully!".green().bold()
        );
    } else {
        println!(
            "{} {}",
            "✗".red().bold(),
            format!("{} task(s) failed", summary.failed).red().bold()
        );
    }

    Ok(summary.success)
}
