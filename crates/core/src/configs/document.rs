use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::configs::tasks::TaskNode;
use crate::types::{OrdoError, OrdoResult};

/// File name used when the CLI is invoked without a document path
pub const DEFAULT_DOCUMENT_FILE: &str = "ordo.yml";

fn default_parallel() -> usize {
    4
}

fn default_stop_on_failure() -> bool {
    true
}

/// A complete task document: the root task nodes plus run options.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunDocument {
    #[serde(default)]
    pub tasks: Vec<TaskNode>,
    /// Task ids the run is scoped to; empty means every task is needed.
    #[serde(default)]
    pub entry: Vec<String>,
    /// Number of concurrent workers, clamped to at least 1 at run time.
    #[serde(default = "default_parallel")]
    pub parallel: usize,
    /// When true, the first unignored failure stops all further scheduling.
    #[serde(default = "default_stop_on_failure")]
    pub stop_on_failure: bool,
}

pub fn parse_document(yaml_str: &str) -> OrdoResult<RunDocument> {
    let document: RunDocument = serde_yaml::from_str(yaml_str)?;
    Ok(document)
}

/// Read and parse a task document from disk.
///
/// YAML is the native format; JSON documents parse through the same path.
pub fn load_document(path: &Path) -> OrdoResult<RunDocument> {
    let content = fs::read_to_string(path).map_err(|e| {
        OrdoError::Config(format!("Failed to read document {}: {}", path.display(), e))
    })?;
    parse_document(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let document = parse_document("tasks: [{id: a, cmd: ls}]").unwrap();
        assert!(document.entry.is_empty());
        assert_eq!(document.parallel, 4);
        assert!(document.stop_on_failure);
    }

    #[test]
    fn test_run_options() {
        let yaml = r#"
tasks:
  - id: a
    cmd: ls
entry: [a]
parallel: 2
stopOnFailure: false
"#;
        let document = parse_document(yaml).unwrap();
        assert_eq!(document.entry, vec!["a".to_string()]);
        assert_eq!(document.parallel, 2);
        assert!(!document.stop_on_failure);
    }

    #[test]
    fn test_json_document_parses() {
        let json = r#"{"tasks": [{"id": "a", "cmd": "ls", "timeoutMs": 100}], "parallel": 1}"#;
        let document = parse_document(json).unwrap();
        assert_eq!(document.parallel, 1);
        assert_eq!(document.tasks[0].timeout_ms, 100);
    }

    #[test]
    fn test_empty_document() {
        let document = parse_document("{}").unwrap();
        assert!(document.tasks.is_empty());
    }

    #[test]
    fn test_load_document_missing_file() {
        let err = load_document(Path::new("/nonexistent/ordo.yml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read document"));
    }

    #[test]
    fn test_load_document_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ordo.yml");
        fs::write(&path, "tasks: [{id: a, cmd: ls}]\nentry: [a]\n").unwrap();

        let document = load_document(&path).unwrap();
        assert_eq!(document.tasks.len(), 1);
        assert_eq!(document.entry, vec!["a".to_string()]);
    }
}
