//! Ordo Core Library
//!
//! This is the core library for the Ordo task runner. It provides all the
//! business logic for turning a declarative task document into a completed
//! run: flattening, dependency resolution, scheduling and subprocess
//! execution.
//!
//! ## Architecture
//!
//! The core library is organized into several modules:
//!
//! - [`configs`] - Configuration parsing for task documents
//! - [`flatten`] - Flattening the task tree into executable specs
//! - [`execution`] - Scheduling and execution engine (graph, worker pool,
//!   subprocess handling)
//! - [`results`] - Per-task and aggregate result types
//! - [`tasks`] - Task id color management for terminal output
//! - [`platform`] - Exit-status classification
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! The primary entry point is [`execution::run_document`]:
//!
//! ```rust,no_run
//! use ordo_core::configs::parse_document;
//! use ordo_core::execution::run_document;
//!
//! # async fn example() -> ordo_core::types::OrdoResult<()> {
//! let document = parse_document("tasks: [{id: hello, cmd: echo, args: [hi]}]")?;
//! let summary = run_document(&document).await?;
//! assert!(summary.success);
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod execution;
pub mod flatten;
pub mod platform;
pub mod results;
pub mod tasks;
pub mod types;

// Re-export the main types for easier usage
pub use configs::{load_document, parse_document, RunDocument, TaskNode, DEFAULT_DOCUMENT_FILE};
pub use execution::{run_document, TaskRunner};
pub use flatten::{flatten, TaskSpec};
pub use results::{RunSummary, TaskResult, TaskStatus};
pub use types::{OrdoError, OrdoResult};
