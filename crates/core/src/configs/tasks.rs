use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One node in the task tree.
///
/// A node with child `tasks` and no `cmd` is a group: it only namespaces its
/// descendants and passes its attributes down to them. A node with a `cmd`
/// and no children is a leaf, the unit of actual execution. `id` is the only
/// required field and must be unique among siblings.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskNode {
    pub id: String,
    /// Dependency ids, sibling-relative unless they contain `.`, `:` or `/`.
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub cmd: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment overlay; merges additively down the tree, child keys win.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub cwd: String,
    #[serde(default)]
    pub retries: u32,
    /// Per-attempt deadline in milliseconds; 0 disables the timeout.
    #[serde(default)]
    pub timeout_ms: u64,
    /// When set, this task's failure neither skips dependents nor halts the run.
    #[serde(default)]
    pub ignore_failure: bool,
    #[serde(default)]
    pub tasks: Vec<TaskNode>,
}

impl TaskNode {
    /// A group node namespaces children and contributes no command itself.
    pub fn is_group(&self) -> bool {
        !self.tasks.is_empty() && self.cmd.is_empty()
    }
}
