//! Task dependency management
//!
//! This module builds the dependency graph over flattened tasks and answers
//! the scheduling questions asked before anything runs: which ids exist,
//! which tasks the entry set reaches, and whether the graph is cycle-free.
//!
//! Dependency ids that name no known task are deliberately not an error:
//! they contribute no edge, and the scheduler's per-task counters keep such
//! tasks from ever becoming ready.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::kosaraju_scc;
use petgraph::prelude::*;

use crate::flatten::TaskSpec;
use crate::types::{OrdoError, OrdoResult};

/// Build the id -> flattened-index map, rejecting duplicate ids.
pub fn build_task_index(specs: &[TaskSpec]) -> OrdoResult<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(specs.len());
    for (i, spec) in specs.iter().enumerate() {
        if index.insert(spec.id.clone(), i).is_some() {
            return Err(OrdoError::Graph(format!("duplicate task id: {}", spec.id)));
        }
    }
    Ok(index)
}

/// The dependency graph over flattened tasks.
///
/// Nodes are task ids; an edge points from a task to each of its resolved
/// dependencies, so following edges walks toward work that must run first.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Build the graph and reject dependency cycles.
    pub fn build(specs: &[TaskSpec]) -> OrdoResult<Self> {
        let mut graph = DiGraph::<String, ()>::new();
        let mut nodes = HashMap::with_capacity(specs.len());

        for spec in specs {
            let node = graph.add_node(spec.id.clone());
            nodes.insert(spec.id.clone(), node);
        }

        for spec in specs {
            let from = nodes[&spec.id];
            for dep in &spec.depends_on {
                // Dangling ids contribute no edge
                if let Some(&to) = nodes.get(dep) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        let cycles = find_cycles(&graph);
        if !cycles.is_empty() {
            let description = cycles
                .into_iter()
                .map(|cycle| {
                    let mut path = cycle.clone();
                    if let Some(first) = path.first().cloned() {
                        path.push(first);
                    }
                    path.join(" -> ")
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(OrdoError::Graph(format!(
                "circular dependency detected: {}",
                description
            )));
        }

        Ok(Self { graph, nodes })
    }

    /// Compute the set of task ids reachable from the entry set by following
    /// dependency edges transitively. Unknown entry ids are ignored.
    pub fn reachable_from(&self, entry: &[String]) -> HashSet<String> {
        let mut reachable = HashSet::new();
        let mut queue: VecDeque<NodeIndex> = entry
            .iter()
            .filter_map(|id| self.nodes.get(id).copied())
            .collect();

        while let Some(node) = queue.pop_front() {
            if !reachable.insert(self.graph[node].clone()) {
                continue;
            }
            for neighbor in self.graph.neighbors(node) {
                queue.push_back(neighbor);
            }
        }

        reachable
    }

    /// Resolved (non-dangling) dependency ids of one task, for plan output.
    pub fn dependencies_of(&self, id: &str) -> Vec<String> {
        let Some(&node) = self.nodes.get(id) else {
            return Vec::new();
        };
        self.graph
            .neighbors(node)
            .map(|neighbor| self.graph[neighbor].clone())
            .collect()
    }
}

/// Collect strongly connected components that form cycles, sorted for
/// stable error messages.
fn find_cycles(graph: &DiGraph<String, ()>) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = kosaraju_scc(graph)
        .into_iter()
        .filter_map(|component| {
            if component.len() > 1 {
                let mut cycle = component
                    .iter()
                    .map(|node| graph[*node].clone())
                    .collect::<Vec<_>>();
                cycle.sort();
                Some(cycle)
            } else {
                let node = component[0];
                if graph.contains_edge(node, node) {
                    Some(vec![graph[node].clone()])
                } else {
                    None
                }
            }
        })
        .collect();
    cycles.sort();
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::tasks::TaskNode;
    use crate::flatten::flatten;

    fn specs(yaml: &str) -> Vec<TaskSpec> {
        let nodes: Vec<TaskNode> = serde_yaml::from_str(yaml).expect("test yaml should parse");
        flatten(&nodes).expect("test tree should flatten")
    }

    #[test]
    fn test_index_rejects_duplicate_ids() {
        let specs = specs("[{id: a, cmd: ls}, {id: a, cmd: ls}]");
        let err = build_task_index(&specs).unwrap_err();
        assert!(err.to_string().contains("duplicate task id: a"));
    }

    #[test]
    fn test_reachability_closure() {
        let specs = specs(
            "[{id: a, cmd: ls}, {id: b, cmd: ls, dependsOn: [a]}, {id: c, cmd: ls}]",
        );
        let graph = DependencyGraph::build(&specs).unwrap();

        let reachable = graph.reachable_from(&["b".to_string()]);
        assert!(reachable.contains("a"), "transitive dependency is needed");
        assert!(reachable.contains("b"), "entry task is needed");
        assert!(!reachable.contains("c"), "unrelated task is not needed");
    }

    #[test]
    fn test_unknown_entry_ids_are_ignored() {
        let specs = specs("[{id: a, cmd: ls}]");
        let graph = DependencyGraph::build(&specs).unwrap();
        assert!(graph.reachable_from(&["ghost".to_string()]).is_empty());
    }

    #[test]
    fn test_dangling_dependency_is_not_an_error() {
        let specs = specs("[{id: a, cmd: ls, dependsOn: [ghost]}]");
        let graph = DependencyGraph::build(&specs).unwrap();
        assert!(graph.dependencies_of("a").is_empty());
    }

    #[test]
    fn test_cycle_detection() {
        let specs = specs(
            "[{id: a, cmd: ls, dependsOn: [b]}, {id: b, cmd: ls, dependsOn: [a]}]",
        );
        let err = DependencyGraph::build(&specs).unwrap_err();
        let message = err.to_string();
        assert!(
            message.contains("circular dependency detected"),
            "unexpected error: {}",
            message
        );
        assert!(message.contains("a -> b -> a"), "cycle path should be reported");
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let specs = specs("[{id: a, cmd: ls, dependsOn: [a]}]");
        let err = DependencyGraph::build(&specs).unwrap_err();
        assert!(err.to_string().contains("a -> a"));
    }
}
