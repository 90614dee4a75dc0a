//! Task tree flattening
//!
//! This module turns the nested task tree into the ordered, flat list of
//! executable task specifications the scheduler works on. Flattening is a
//! pure transform: it accumulates inherited attributes while descending,
//! rewrites relative dependency references to fully-qualified ids, and never
//! touches scheduling state.

use std::collections::BTreeMap;

use crate::configs::tasks::TaskNode;
use crate::types::{OrdoError, OrdoResult};

/// A fully resolved, executable task.
///
/// The `id` is the dot-joined path from the tree root to the leaf and is
/// globally unique; `depends_on` entries are fully qualified. Specs are
/// immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    pub id: String,
    pub depends_on: Vec<String>,
    pub cmd: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub cwd: String,
    pub retries: u32,
    pub timeout_ms: u64,
    pub ignore_failure: bool,
}

/// Attributes accumulated while descending the tree.
#[derive(Debug, Clone, Default)]
struct InheritedContext {
    env: BTreeMap<String, String>,
    cwd: String,
    retries: u32,
    timeout_ms: u64,
    ignore_failure: bool,
    depends: Vec<String>,
}

/// A dependency id containing a path-like separator is already fully
/// qualified and is used as-is.
fn is_absolute_id(id: &str) -> bool {
    id.contains('.') || id.contains(':') || id.contains('/')
}

/// Flatten the task tree into specs, depth-first in sibling order.
pub fn flatten(nodes: &[TaskNode]) -> OrdoResult<Vec<TaskSpec>> {
    let mut specs = Vec::new();
    let base = InheritedContext::default();
    for node in nodes {
        flatten_node(node, "", &base, &mut specs)?;
    }
    Ok(specs)
}

fn flatten_node(
    node: &TaskNode,
    prefix: &str,
    inherited: &InheritedContext,
    specs: &mut Vec<TaskSpec>,
) -> OrdoResult<()> {
    let fqid = if prefix.is_empty() {
        node.id.clone()
    } else {
        format!("{}.{}", prefix, node.id)
    };

    let mut local = inherited.clone();
    local
        .env
        .extend(node.env.iter().map(|(k, v)| (k.clone(), v.clone())));
    if !node.cwd.is_empty() {
        local.cwd = node.cwd.clone();
    }
    if node.retries > 0 {
        local.retries = node.retries;
    }
    if node.timeout_ms > 0 {
        local.timeout_ms = node.timeout_ms;
    }
    if node.ignore_failure {
        local.ignore_failure = node.ignore_failure;
    }
    local.depends.extend(node.depends_on.iter().cloned());

    if node.is_group() {
        for child in &node.tasks {
            flatten_node(child, &fqid, &local, specs)?;
        }
        return Ok(());
    }

    if node.cmd.is_empty() {
        return Err(OrdoError::Config(format!("leaf task requires cmd: {}", fqid)));
    }

    // Relative dependency ids are anchored to the parent group, not the leaf.
    let depends_on = local
        .depends
        .iter()
        .map(|dep| {
            if !is_absolute_id(dep) && !prefix.is_empty() {
                format!("{}.{}", prefix, dep)
            } else {
                dep.clone()
            }
        })
        .collect();

    specs.push(TaskSpec {
        id: fqid,
        depends_on,
        cmd: node.cmd.clone(),
        args: node.args.clone(),
        env: local.env,
        cwd: local.cwd,
        retries: local.retries,
        timeout_ms: local.timeout_ms,
        ignore_failure: local.ignore_failure,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(yaml: &str) -> Vec<TaskNode> {
        serde_yaml::from_str(yaml).expect("test yaml should parse")
    }

    #[test]
    fn test_flat_list_preserves_sibling_order() {
        let specs = flatten(&nodes(
            "[{id: b, cmd: ls}, {id: a, cmd: ls}, {id: c, cmd: ls}]",
        ))
        .unwrap();
        let ids: Vec<_> = specs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_fully_qualified_ids() {
        let yaml = r#"
- id: ci
  tasks:
    - id: build
      cmd: make
    - id: deep
      tasks:
        - id: leaf
          cmd: ls
"#;
        let specs = flatten(&nodes(yaml)).unwrap();
        let ids: Vec<_> = specs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["ci.build", "ci.deep.leaf"]);
    }

    #[test]
    fn test_group_contributes_no_spec() {
        let yaml = "[{id: grp, tasks: [{id: a, cmd: ls}]}]";
        let specs = flatten(&nodes(yaml)).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].id, "grp.a");
    }

    #[test]
    fn test_env_merges_additively_child_wins() {
        let yaml = r#"
- id: grp
  env: {A: "1", B: "1"}
  tasks:
    - id: leaf
      cmd: ls
      env: {B: "2", C: "3"}
"#;
        let specs = flatten(&nodes(yaml)).unwrap();
        let env = &specs[0].env;
        assert_eq!(env.get("A").map(String::as_str), Some("1"));
        assert_eq!(env.get("B").map(String::as_str), Some("2"));
        assert_eq!(env.get("C").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_scalar_attributes_inherit_unless_overridden() {
        let yaml = r#"
- id: grp
  cwd: /srv
  retries: 2
  timeoutMs: 1000
  ignoreFailure: true
  tasks:
    - id: inherits
      cmd: ls
    - id: overrides
      cmd: ls
      cwd: /tmp
      retries: 5
      timeoutMs: 50
"#;
        let specs = flatten(&nodes(yaml)).unwrap();
        assert_eq!(specs[0].cwd, "/srv");
        assert_eq!(specs[0].retries, 2);
        assert_eq!(specs[0].timeout_ms, 1000);
        assert!(specs[0].ignore_failure);
        assert_eq!(specs[1].cwd, "/tmp");
        assert_eq!(specs[1].retries, 5);
        assert_eq!(specs[1].timeout_ms, 50);
        assert!(specs[1].ignore_failure, "flags inherit through overrides");
    }

    #[test]
    fn test_relative_dependency_anchored_to_parent_group() {
        let yaml = r#"
- id: grp
  tasks:
    - id: build
      cmd: make
    - id: test
      cmd: make
      dependsOn: [build]
"#;
        let specs = flatten(&nodes(yaml)).unwrap();
        assert_eq!(specs[1].depends_on, vec!["grp.build".to_string()]);
    }

    #[test]
    fn test_absolute_dependency_used_as_is() {
        let yaml = r#"
- id: grp
  tasks:
    - id: test
      cmd: make
      dependsOn: [other.build]
"#;
        let specs = flatten(&nodes(yaml)).unwrap();
        assert_eq!(specs[0].depends_on, vec!["other.build".to_string()]);
    }

    #[test]
    fn test_group_dependencies_accumulate_onto_leaves() {
        let yaml = r#"
- id: grp
  dependsOn: [setup.init]
  tasks:
    - id: leaf
      cmd: ls
      dependsOn: [sibling]
"#;
        let specs = flatten(&nodes(yaml)).unwrap();
        assert_eq!(
            specs[0].depends_on,
            vec!["setup.init".to_string(), "grp.sibling".to_string()]
        );
    }

    #[test]
    fn test_root_relative_dependency_stays_bare() {
        let specs = flatten(&nodes(
            "[{id: a, cmd: ls}, {id: b, cmd: ls, dependsOn: [a]}]",
        ))
        .unwrap();
        assert_eq!(specs[1].depends_on, vec!["a".to_string()]);
    }

    #[test]
    fn test_empty_node_is_an_error() {
        let err = flatten(&nodes("[{id: grp, tasks: [{id: hollow}]}]")).unwrap_err();
        assert!(
            err.to_string().contains("leaf task requires cmd: grp.hollow"),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_node_with_cmd_and_children_is_a_leaf() {
        let yaml = "[{id: odd, cmd: ls, tasks: [{id: ignored, cmd: ls}]}]";
        let specs = flatten(&nodes(yaml)).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].id, "odd");
    }
}
