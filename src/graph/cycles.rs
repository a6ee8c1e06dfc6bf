//! Circular dependency detection.
//!
//! Depth-first traversal from every unvisited node with a global
//! visited set, a recursion-stack membership map, and an explicit path
//! stack. One report is emitted per back edge found, not one per
//! elementary cycle: overlapping reports on dense graphs are part of
//! the contract, since enumerating elementary cycles is combinatorial.
//! The traversal is an explicit stack machine, so deeply chained graphs
//! cannot overflow the call stack. Runs in O(V+E) over a single forest.

use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::dependency_graph::{DependencyGraph, NodeKind};

/// How disruptive a cycle is, judged by its widest-scoped member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleSeverity {
    Low,
    Medium,
    High,
}

impl fmt::Display for CycleSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleSeverity::Low => write!(f, "low"),
            CycleSeverity::Medium => write!(f, "medium"),
            CycleSeverity::High => write!(f, "high"),
        }
    }
}

/// One circular reference chain.
///
/// `nodes` is the cycle in discovery order, closed: the first id is
/// repeated at the end.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CircularDependency {
    pub nodes: Vec<String>,
    pub severity: CycleSeverity,
}

impl CircularDependency {
    /// Distinct member ids, without the closing repeat.
    pub fn members(&self) -> &[String] {
        self.nodes
            .split_last()
            .map(|(_, rest)| rest)
            .unwrap_or(&[])
    }

    /// Formats the cycle as "a -> b -> a".
    pub fn path(&self) -> String {
        self.nodes.join(" -> ")
    }
}

/// Severity from member node kinds: any project member makes the cycle
/// high, any namespace medium, otherwise low.
fn classify(graph: &DependencyGraph, members: &[NodeIndex]) -> CycleSeverity {
    let mut severity = CycleSeverity::Low;
    for &idx in members {
        match graph.node_at(idx).kind {
            NodeKind::Project => return CycleSeverity::High,
            NodeKind::Namespace => severity = CycleSeverity::Medium,
            _ => {}
        }
    }
    severity
}

struct Frame {
    node: NodeIndex,
    targets: Vec<NodeIndex>,
    next: usize,
}

impl Frame {
    fn new(node: NodeIndex, graph: &DependencyGraph) -> Self {
        Self {
            node,
            targets: graph.outgoing(node).collect(),
            next: 0,
        }
    }
}

/// Finds circular reference chains in the graph.
///
/// # Example
///
/// ```rust
/// use depscope::graph::{detect_cycles, DependencyGraph, EdgeKind, NodeKind};
///
/// let mut graph = DependencyGraph::new();
/// graph.get_or_create_node("A", "A", "A", NodeKind::Type, "App");
/// graph.get_or_create_node("B", "B", "B", NodeKind::Type, "App");
/// graph.add_edge("A", "B", EdgeKind::Uses);
/// graph.add_edge("B", "A", EdgeKind::Uses);
///
/// let cycles = detect_cycles(&graph);
/// assert_eq!(cycles.len(), 1);
/// assert_eq!(cycles[0].path(), "A -> B -> A");
/// ```
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<CircularDependency> {
    let mut cycles = Vec::new();
    let mut visited: HashSet<NodeIndex> = HashSet::new();

    for start in graph.indices() {
        if visited.contains(&start) {
            continue;
        }
        visited.insert(start);

        // Path stack plus a position map standing in for the recursion
        // stack of the recursive formulation.
        let mut path: Vec<NodeIndex> = vec![start];
        let mut on_stack: HashMap<NodeIndex, usize> = HashMap::new();
        on_stack.insert(start, 0);
        let mut stack: Vec<Frame> = vec![Frame::new(start, graph)];

        loop {
            let next_target = match stack.last_mut() {
                None => break,
                Some(frame) => {
                    if frame.next < frame.targets.len() {
                        let target = frame.targets[frame.next];
                        frame.next += 1;
                        Some(target)
                    } else {
                        None
                    }
                }
            };

            match next_target {
                Some(target) => {
                    if let Some(&pos) = on_stack.get(&target) {
                        // Back edge: the cycle is the path suffix from
                        // the target to the current node, closed by the
                        // target id again.
                        let members = &path[pos..];
                        let severity = classify(graph, members);
                        let mut nodes: Vec<String> = members
                            .iter()
                            .map(|&idx| graph.node_at(idx).id.clone())
                            .collect();
                        nodes.push(graph.node_at(target).id.clone());
                        cycles.push(CircularDependency { nodes, severity });
                    } else if visited.insert(target) {
                        on_stack.insert(target, path.len());
                        path.push(target);
                        stack.push(Frame::new(target, graph));
                    }
                    // Already visited off-path: cross or forward edge.
                }
                None => {
                    if let Some(frame) = stack.pop() {
                        on_stack.remove(&frame.node);
                        path.pop();
                    }
                }
            }
        }
    }

    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::dependency_graph::EdgeKind;

    fn type_graph(edges: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (source, target) in edges {
            graph.get_or_create_node(source, source, source, NodeKind::Type, "App");
            graph.get_or_create_node(target, target, target, NodeKind::Type, "App");
            graph.add_edge(source, target, EdgeKind::Uses);
        }
        graph
    }

    #[test]
    fn test_no_cycles_in_dag() {
        let graph = type_graph(&[("A", "B"), ("B", "C"), ("A", "C")]);
        assert!(detect_cycles(&graph).is_empty());
    }

    #[test]
    fn test_three_node_cycle_single_report() {
        let graph = type_graph(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let cycles = detect_cycles(&graph);

        assert_eq!(cycles.len(), 1);
        let cycle = &cycles[0];
        assert_eq!(cycle.members().len(), 3);
        for id in ["A", "B", "C"] {
            assert!(cycle.members().contains(&id.to_string()));
        }
        // Closed: first id repeated at the end
        assert_eq!(cycle.nodes.first(), cycle.nodes.last());
        assert_eq!(cycle.path(), "A -> B -> C -> A");
    }

    #[test]
    fn test_self_loop() {
        let graph = type_graph(&[("A", "A")]);
        let cycles = detect_cycles(&graph);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].nodes, vec!["A", "A"]);
    }

    #[test]
    fn test_one_report_per_back_edge() {
        // Two distinct back edges into A: A->B->A and A->B->C->A
        let graph = type_graph(&[("A", "B"), ("B", "A"), ("B", "C"), ("C", "A")]);
        let cycles = detect_cycles(&graph);
        assert_eq!(cycles.len(), 2);
    }

    #[test]
    fn test_parallel_back_edges_each_reported() {
        let mut graph = type_graph(&[("A", "B")]);
        graph.add_edge("B", "A", EdgeKind::Uses);
        graph.add_edge("B", "A", EdgeKind::Inherits);

        let cycles = detect_cycles(&graph);
        assert_eq!(cycles.len(), 2);
    }

    #[test]
    fn test_two_disjoint_cycles() {
        let graph = type_graph(&[("A", "B"), ("B", "A"), ("C", "D"), ("D", "C")]);
        let cycles = detect_cycles(&graph);
        assert_eq!(cycles.len(), 2);
    }

    #[test]
    fn test_cycle_ids_exist_in_graph() {
        let graph = type_graph(&[("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")]);
        for cycle in detect_cycles(&graph) {
            for id in &cycle.nodes {
                assert!(graph.contains(id), "dangling id {} in cycle report", id);
            }
        }
    }

    #[test]
    fn test_severity_classification() {
        // Types only
        let graph = type_graph(&[("A", "B"), ("B", "A")]);
        assert_eq!(detect_cycles(&graph)[0].severity, CycleSeverity::Low);

        // A namespace member raises severity to medium
        let mut graph = DependencyGraph::new();
        graph.get_or_create_node("T", "T", "T", NodeKind::Type, "App");
        graph.get_or_create_node("NS", "NS", "NS", NodeKind::Namespace, "App");
        graph.add_edge("T", "NS", EdgeKind::Uses);
        graph.add_edge("NS", "T", EdgeKind::Uses);
        assert_eq!(detect_cycles(&graph)[0].severity, CycleSeverity::Medium);

        // A project member wins over namespace
        let mut graph = DependencyGraph::new();
        graph.get_or_create_node("P", "P", "P", NodeKind::Project, "P");
        graph.get_or_create_node("NS", "NS", "NS", NodeKind::Namespace, "App");
        graph.add_edge("P", "NS", EdgeKind::References);
        graph.add_edge("NS", "P", EdgeKind::Uses);
        assert_eq!(detect_cycles(&graph)[0].severity, CycleSeverity::High);
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        // A pathological 10k-node chain ending in a cycle
        let mut graph = DependencyGraph::new();
        let n = 10_000;
        for i in 0..n {
            let id = format!("N{}", i);
            graph.get_or_create_node(&id, &id, &id, NodeKind::Type, "App");
        }
        for i in 0..n - 1 {
            graph.add_edge(&format!("N{}", i), &format!("N{}", i + 1), EdgeKind::Uses);
        }
        graph.add_edge(&format!("N{}", n - 1), "N0", EdgeKind::Uses);

        let cycles = detect_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].members().len(), n);
    }

    #[test]
    fn test_members_excludes_closing_repeat() {
        let graph = type_graph(&[("A", "B"), ("B", "A")]);
        let cycles = detect_cycles(&graph);
        assert_eq!(cycles[0].members(), ["A", "B"]);
        assert_eq!(cycles[0].nodes.len(), 3);
    }
}
