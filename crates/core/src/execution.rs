//! Task execution module
//!
//! This module handles the actual execution of flattened tasks: dependency
//! graph construction and reachability, subprocess execution with timeout,
//! and the worker pool that drives a run to completion.

pub mod command;
pub mod dependencies;
pub mod runner;

pub use dependencies::{build_task_index, DependencyGraph};
pub use runner::{run_document, TaskRunner};
