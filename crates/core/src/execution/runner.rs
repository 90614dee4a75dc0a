//! High-level task runner
//!
//! This module drives a run to completion: it owns every piece of mutable
//! scheduling state (ready queue, statuses, remaining-dependency counters)
//! in a single coordinator loop, dispatches ready tasks to spawned workers
//! up to the configured parallelism, and folds completions back into the
//! schedule as they arrive over a channel. Workers only execute; they never
//! touch scheduling state, so no lock guards any of it.

use std::collections::VecDeque;

use colored::*;
use tokio::sync::mpsc;

use crate::configs::document::RunDocument;
use crate::execution::command;
use crate::execution::dependencies::{build_task_index, DependencyGraph};
use crate::flatten::{flatten, TaskSpec};
use crate::results::{RunSummary, TaskResult, TaskStatus};
use crate::tasks::get_task_color;
use crate::types::OrdoResult;

/// Task runner configured from a document's run options
pub struct TaskRunner {
    parallel: usize,
    stop_on_failure: bool,
    entry: Vec<String>,
}

/// Flatten a document's task tree and run it.
pub async fn run_document(document: &RunDocument) -> OrdoResult<RunSummary> {
    let specs = flatten(&document.tasks)?;
    TaskRunner::new(document).run(specs).await
}

impl TaskRunner {
    pub fn new(document: &RunDocument) -> Self {
        Self {
            parallel: document.parallel,
            stop_on_failure: document.stop_on_failure,
            entry: document.entry.clone(),
        }
    }

    /// Run every needed task exactly once, honoring dependencies.
    ///
    /// Errors only before anything executes (duplicate ids, dependency
    /// cycles); task failures are folded into the returned summary.
    pub async fn run(&self, specs: Vec<TaskSpec>) -> OrdoResult<RunSummary> {
        let index = build_task_index(&specs)?;
        let graph = DependencyGraph::build(&specs)?;

        let task_count = specs.len();
        let mut statuses = vec![TaskStatus::Pending; task_count];
        let mut remaining_deps: Vec<usize> =
            specs.iter().map(|spec| spec.depends_on.len()).collect();

        // Entry-set closure: with an entry set, only tasks it transitively
        // reaches are needed; the rest are skipped before scheduling.
        if !self.entry.is_empty() {
            let mut needed = vec![false; task_count];
            for id in graph.reachable_from(&self.entry) {
                if let Some(&i) = index.get(&id) {
                    needed[i] = true;
                }
            }
            for (i, is_needed) in needed.iter().enumerate() {
                if !*is_needed {
                    statuses[i] = TaskStatus::Skipped;
                }
            }
        }

        let mut ready: VecDeque<usize> = (0..task_count)
            .filter(|&i| statuses[i] == TaskStatus::Pending && remaining_deps[i] == 0)
            .collect();

        let workers = self.parallel.max(1);
        let (tx, mut rx) = mpsc::channel::<(usize, TaskResult)>(workers);
        let mut results: Vec<Option<TaskResult>> = vec![None; task_count];
        let mut in_flight = 0usize;
        let mut halted = false;

        loop {
            while in_flight < workers {
                let Some(i) = ready.pop_front() else { break };
                statuses[i] = TaskStatus::Running;
                in_flight += 1;
                let spec = specs[i].clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = run_attempts(&spec).await;
                    let _ = tx.send((i, result)).await;
                });
            }

            if in_flight == 0 {
                break;
            }
            let Some((i, result)) = rx.recv().await else { break };
            in_flight -= 1;

            let success = result.status == TaskStatus::Success;
            statuses[i] = if success {
                TaskStatus::Success
            } else {
                TaskStatus::Failed
            };
            print_result_line(&result);
            results[i] = Some(result);

            // After the stop-on-failure drain, in-flight completions are
            // recorded but schedule nothing further.
            if halted {
                continue;
            }

            if !success && self.stop_on_failure && !specs[i].ignore_failure {
                ready.clear();
                halted = true;
                continue;
            }

            let finished_id = specs[i].id.as_str();
            for j in 0..task_count {
                let matching = specs[j]
                    .depends_on
                    .iter()
                    .filter(|dep| dep.as_str() == finished_id)
                    .count();
                if matching == 0 {
                    continue;
                }
                remaining_deps[j] = remaining_deps[j].saturating_sub(matching);
                if !success && !specs[j].ignore_failure && statuses[j] == TaskStatus::Pending {
                    statuses[j] = TaskStatus::Skipped;
                }
                if statuses[j] == TaskStatus::Pending && remaining_deps[j] == 0 {
                    ready.push_back(j);
                }
            }
        }

        // Whatever is still pending can no longer run: drained by
        // stop-on-failure, downstream of a skipped task, or waiting on a
        // dependency id that names no task.
        for i in 0..task_count {
            if statuses[i] == TaskStatus::Pending {
                if !halted && remaining_deps[i] > 0 {
                    eprintln!(
                        "{} task '{}' never became ready (unsatisfied dependencies)",
                        "warning:".yellow().bold(),
                        specs[i].id
                    );
                }
                statuses[i] = TaskStatus::Skipped;
            }
        }

        Ok(summarize(&specs, &statuses, results))
    }
}

/// Retry loop for one ready-queue occupancy: up to `retries + 1` attempts,
/// stopping at the first success; the last attempt's result is reported.
async fn run_attempts(spec: &TaskSpec) -> TaskResult {
    let mut result = command::execute(spec).await;
    let mut attempt: u32 = 1;
    while result.status != TaskStatus::Success && attempt <= spec.retries {
        result = command::execute(spec).await;
        attempt += 1;
    }
    result
}

fn print_result_line(result: &TaskResult) {
    let tag = if result.status == TaskStatus::Success {
        "[OK]".green().bold()
    } else {
        "[FAIL]".red().bold()
    };
    println!(
        "{} {} (exit={})",
        tag,
        result.id.color(get_task_color(&result.id)),
        result.exit_code
    );
}

fn summarize(
    specs: &[TaskSpec],
    statuses: &[TaskStatus],
    mut results: Vec<Option<TaskResult>>,
) -> RunSummary {
    let mut summary_results = Vec::with_capacity(specs.len());
    let mut succeeded = 0;
    let mut failed = 0;
    let mut skipped = 0;
    let mut success = true;

    for (i, spec) in specs.iter().enumerate() {
        match statuses[i] {
            TaskStatus::Success => succeeded += 1,
            TaskStatus::Failed => {
                failed += 1;
                if !spec.ignore_failure {
                    success = false;
                }
            }
            TaskStatus::Skipped => skipped += 1,
            TaskStatus::Pending | TaskStatus::Running => {}
        }
        let result = results[i].take().unwrap_or_else(|| TaskResult {
            id: spec.id.clone(),
            status: statuses[i],
            exit_code: 0,
            message: String::new(),
        });
        summary_results.push(result);
    }

    RunSummary {
        results: summary_results,
        succeeded,
        failed,
        skipped,
        success,
    }
}
