//! Subprocess execution for a single task attempt
//!
//! One call to [`execute`] is one attempt: spawn the task's command with the
//! merged environment, poll it against the optional deadline, and classify
//! the outcome as a [`TaskResult`]. Retry policy lives in the worker pool,
//! not here; every attempt starts from scratch.

use std::time::{Duration, Instant};

use tokio::process::Command;
use tokio::time::sleep;

use crate::flatten::TaskSpec;
use crate::platform::{classify_exit, EXIT_INTERNAL, EXIT_TIMEOUT};
use crate::results::{TaskResult, TaskStatus};

/// How often a running child is polled for completion. The poll loop, not a
/// blocking wait, is what keeps the timeout deadline observable.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Render the command and its arguments as a single shell line.
fn shell_line(spec: &TaskSpec) -> String {
    let mut line = spec.cmd.clone();
    for arg in &spec.args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Build the child command: direct invocation, or a shell wrapper that
/// changes directory first when a cwd is set.
fn build_command(spec: &TaskSpec) -> Command {
    let mut command = if spec.cwd.is_empty() {
        let mut command = Command::new(&spec.cmd);
        command.args(&spec.args);
        command
    } else {
        let mut command = Command::new("/bin/sh");
        command
            .arg("-c")
            .arg(format!("cd '{}' && {}", spec.cwd, shell_line(spec)));
        command
    };
    // Host environment is inherited; task keys win on conflict
    command.envs(&spec.env);
    command
}

/// Run one attempt of a task to completion.
///
/// Never panics and never returns an error: spawn failures, wait failures
/// and timeouts all come back as a `Failed` result with a synthetic exit
/// code, so a bad task cannot take its worker down.
pub async fn execute(spec: &TaskSpec) -> TaskResult {
    let mut child = match build_command(spec).spawn() {
        Ok(child) => child,
        Err(e) => {
            return TaskResult::failed(&spec.id, EXIT_INTERNAL, format!("spawn failed: {}", e))
        }
    };

    let deadline = (spec.timeout_ms > 0).then(|| Instant::now() + Duration::from_millis(spec.timeout_ms));

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let exit_code = classify_exit(status);
                let status = if exit_code == 0 {
                    TaskStatus::Success
                } else {
                    TaskStatus::Failed
                };
                return TaskResult {
                    id: spec.id.clone(),
                    status,
                    exit_code,
                    message: String::new(),
                };
            }
            Ok(None) => {
                if deadline.is_some_and(|deadline| Instant::now() > deadline) {
                    // Force-kill and reap before reporting
                    let _ = child.kill().await;
                    return TaskResult::failed(&spec.id, EXIT_TIMEOUT, "timeout");
                }
                sleep(POLL_INTERVAL).await;
            }
            Err(e) => {
                return TaskResult::failed(&spec.id, EXIT_INTERNAL, format!("wait failed: {}", e))
            }
        }
    }
}
