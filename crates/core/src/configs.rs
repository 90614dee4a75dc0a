//! Configuration parsing for task documents
//!
//! A task document is the declarative input to a run: a tree of task nodes
//! plus the run options (entry set, parallelism, failure policy). Parsing
//! fills defaults for every omitted field; flattening and validation happen
//! later, in [`crate::flatten`].

pub mod document;
pub mod tasks;

pub use document::{load_document, parse_document, RunDocument, DEFAULT_DOCUMENT_FILE};
pub use tasks::TaskNode;
