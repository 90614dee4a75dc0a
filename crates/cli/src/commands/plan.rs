use std::collections::HashSet;

use anyhow::Result;
use colored::*;
use ordo_core::execution::{build_task_index, DependencyGraph};
use ordo_core::{flatten, RunDocument};

/// Print the flattened execution plan without running anything.
pub fn execute(document: &RunDocument) -> Result<()> {
    let specs = flatten(&document.tasks)
        .map_err(|e| anyhow::anyhow!("Failed to build execution plan: {}", e))?;
    build_task_index(&specs).map_err(|e| anyhow::anyhow!("Failed to build execution plan: {}", e))?;
    let graph = DependencyGraph::build(&specs)
        .map_err(|e| anyhow::anyhow!("Failed to build execution plan: {}", e))?;

    let needed: Option<HashSet<String>> = if document.entry.is_empty() {
        None
    } else {
        Some(graph.reachable_from(&document.entry))
    };

    println!("{}", "Execution plan:".bold());
    for (i, spec) in specs.iter().enumerate() {
        let scope = match &needed {
            Some(needed) if !needed.contains(&spec.id) => {
                format!(" {}", "(outside entry set, skipped)".yellow())
            }
            _ => String::new(),
        };
        println!("  {}. {}{}", i + 1, spec.id.cyan(), scope);

        let deps = graph.dependencies_of(&spec.id);
        if deps.is_empty() {
            println!("     {}", "no dependencies".dimmed());
        } else {
            println!("     {} {}", "depends on:".dimmed(), deps.join(", "));
        }
    }

    Ok(())
}
