//! Dependency graph storage built on petgraph.
//!
//! Nodes are identified by stable string ids; edges reference node ids
//! only, never object references, so serialized views stay acyclic.
//! Parallel edges are permitted and meaningful: each one counts toward
//! coupling metrics.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Project label for nodes not owned by any workspace project.
pub const EXTERNAL_PROJECT: &str = "External";

/// The kind of entity a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Type,
    Namespace,
    Project,
    Assembly,
}

impl NodeKind {
    /// Short label used in reports and count maps.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Type => "type",
            NodeKind::Namespace => "namespace",
            NodeKind::Project => "project",
            NodeKind::Assembly => "assembly",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The kind of relationship an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Source inherits from target.
    Inherits,
    /// Source implements the target interface.
    Implements,
    /// Source references members of target.
    Uses,
    /// Source project/assembly reference to target.
    References,
}

impl EdgeKind {
    pub fn label(&self) -> &'static str {
        match self {
            EdgeKind::Inherits => "inherits",
            EdgeKind::Implements => "implements",
            EdgeKind::Uses => "uses",
            EdgeKind::References => "references",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A node in the dependency graph.
///
/// The node does not own its edges; adjacency lives in the graph.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DependencyNode {
    /// Stable id, derived deterministically from symbol identity.
    pub id: String,
    /// Short display label, fixed at first creation.
    pub name: String,
    /// Fully qualified display form.
    pub full_name: String,
    pub kind: NodeKind,
    /// Owning project name, or [`EXTERNAL_PROJECT`].
    pub project: String,
}

/// An edge in the dependency graph, referencing endpoints by id.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DependencyEdge {
    pub source_id: String,
    pub target_id: String,
    pub kind: EdgeKind,
}

/// Serializable snapshot of a graph: nodes in insertion order plus the
/// edge list.
#[derive(Debug, Clone, Serialize, Default)]
pub struct GraphView {
    pub nodes: Vec<DependencyNode>,
    pub edges: Vec<DependencyEdge>,
}

/// A directed graph of code-level dependencies.
///
/// Node creation is get-or-create: the first lookup for an id fixes the
/// node's display name permanently. Edge insertion requires both
/// endpoints to exist already.
///
/// # Example
///
/// ```rust
/// use depscope::graph::{DependencyGraph, EdgeKind, NodeKind};
///
/// let mut graph = DependencyGraph::new();
/// graph.get_or_create_node("App.A", "A", "App.A", NodeKind::Type, "App");
/// graph.get_or_create_node("App.B", "B", "App.B", NodeKind::Type, "App");
///
/// assert!(graph.add_edge("App.A", "App.B", EdgeKind::Uses));
/// assert!(!graph.add_edge("App.A", "App.Missing", EdgeKind::Uses));
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph.
    graph: DiGraph<DependencyNode, EdgeKind>,
    /// Maps node ids to their indices for O(1) lookup.
    node_indices: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Creates a new empty dependency graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Gets the node for `id`, creating it if absent.
    ///
    /// If a node with the same id already exists, its index is returned
    /// unchanged: the display name and every other field are fixed by
    /// the first creation.
    pub fn get_or_create_node(
        &mut self,
        id: &str,
        name: &str,
        full_name: &str,
        kind: NodeKind,
        project: &str,
    ) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(id) {
            return idx;
        }

        let node = DependencyNode {
            id: id.to_string(),
            name: name.to_string(),
            full_name: full_name.to_string(),
            kind,
            project: project.to_string(),
        };
        let idx = self.graph.add_node(node);
        self.node_indices.insert(id.to_string(), idx);
        idx
    }

    /// Adds an edge between two existing nodes.
    ///
    /// Returns `false` without inserting if either endpoint is missing.
    /// Parallel edges between the same pair are allowed.
    pub fn add_edge(&mut self, source_id: &str, target_id: &str, kind: EdgeKind) -> bool {
        let source = match self.node_indices.get(source_id) {
            Some(&idx) => idx,
            None => return false,
        };
        let target = match self.node_indices.get(target_id) {
            Some(&idx) => idx,
            None => return false,
        };

        self.graph.add_edge(source, target, kind);
        true
    }

    /// Returns true if a node with the given id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Gets a node by id.
    pub fn node(&self, id: &str) -> Option<&DependencyNode> {
        self.node_indices
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Gets the index of a node by id.
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    /// Gets a node by index.
    ///
    /// # Panics
    ///
    /// Panics if the index does not belong to this graph.
    pub fn node_at(&self, idx: NodeIndex) -> &DependencyNode {
        &self.graph[idx]
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All node indices, in insertion order.
    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.graph.node_weights()
    }

    /// Targets of the node's outgoing edges, one entry per edge.
    pub fn outgoing(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Outgoing)
    }

    /// Sources of the node's incoming edges, one entry per edge.
    pub fn incoming(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Incoming)
    }

    /// Number of outgoing edges (efferent coupling).
    pub fn outgoing_count(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
    }

    /// Number of incoming edges (afferent coupling).
    pub fn incoming_count(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    /// All edges as id-referencing values, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = DependencyEdge> + '_ {
        self.graph.edge_references().map(|e| DependencyEdge {
            source_id: self.graph[e.source()].id.clone(),
            target_id: self.graph[e.target()].id.clone(),
            kind: *e.weight(),
        })
    }

    /// Builds a serializable snapshot of the graph.
    pub fn view(&self) -> GraphView {
        GraphView {
            nodes: self.graph.node_weights().cloned().collect(),
            edges: self.edges().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_empty_graph() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_get_or_create_node() {
        let mut graph = DependencyGraph::new();
        let idx = graph.get_or_create_node("App.A", "A", "App.A", NodeKind::Type, "App");

        assert_eq!(graph.node_count(), 1);
        assert!(graph.contains("App.A"));

        // Same id returns the same index without modification
        let idx2 = graph.get_or_create_node("App.A", "A", "App.A", NodeKind::Type, "App");
        assert_eq!(idx, idx2);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_first_creation_fixes_name() {
        let mut graph = DependencyGraph::new();
        graph.get_or_create_node("App.A", "A", "App.A", NodeKind::Type, "App");
        graph.get_or_create_node("App.A", "Renamed", "Other.A", NodeKind::Namespace, "Other");

        let node = graph.node("App.A").unwrap();
        assert_eq!(node.name, "A");
        assert_eq!(node.full_name, "App.A");
        assert_eq!(node.kind, NodeKind::Type);
        assert_eq!(node.project, "App");
    }

    #[test]
    fn test_add_edge_requires_endpoints() {
        let mut graph = DependencyGraph::new();
        graph.get_or_create_node("A", "A", "A", NodeKind::Type, "App");
        graph.get_or_create_node("B", "B", "B", NodeKind::Type, "App");

        assert!(graph.add_edge("A", "B", EdgeKind::Uses));
        assert_eq!(graph.edge_count(), 1);

        assert!(!graph.add_edge("A", "missing", EdgeKind::Uses));
        assert!(!graph.add_edge("missing", "B", EdgeKind::Uses));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_parallel_edges_not_deduplicated() {
        let mut graph = DependencyGraph::new();
        graph.get_or_create_node("A", "A", "A", NodeKind::Type, "App");
        graph.get_or_create_node("B", "B", "B", NodeKind::Type, "App");

        assert!(graph.add_edge("A", "B", EdgeKind::Uses));
        assert!(graph.add_edge("A", "B", EdgeKind::Uses));
        assert!(graph.add_edge("A", "B", EdgeKind::Inherits));

        assert_eq!(graph.edge_count(), 3);
        let a = graph.index_of("A").unwrap();
        assert_eq!(graph.outgoing_count(a), 3);
    }

    #[test]
    fn test_degree_counts() {
        let mut graph = DependencyGraph::new();
        graph.get_or_create_node("A", "A", "A", NodeKind::Type, "App");
        graph.get_or_create_node("B", "B", "B", NodeKind::Type, "App");
        graph.get_or_create_node("C", "C", "C", NodeKind::Type, "App");
        graph.add_edge("A", "B", EdgeKind::Uses);
        graph.add_edge("C", "B", EdgeKind::Uses);
        graph.add_edge("B", "C", EdgeKind::Uses);

        let b = graph.index_of("B").unwrap();
        assert_eq!(graph.incoming_count(b), 2);
        assert_eq!(graph.outgoing_count(b), 1);
    }

    #[test]
    fn test_edges_reference_ids() {
        let mut graph = DependencyGraph::new();
        graph.get_or_create_node("A", "A", "A", NodeKind::Type, "App");
        graph.get_or_create_node("B", "B", "B", NodeKind::Type, "App");
        graph.add_edge("A", "B", EdgeKind::Implements);

        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source_id, "A");
        assert_eq!(edges[0].target_id, "B");
        assert_eq!(edges[0].kind, EdgeKind::Implements);
    }

    #[test]
    fn test_view_preserves_insertion_order() {
        let mut graph = DependencyGraph::new();
        graph.get_or_create_node("C", "C", "C", NodeKind::Type, "App");
        graph.get_or_create_node("A", "A", "A", NodeKind::Type, "App");
        graph.get_or_create_node("B", "B", "B", NodeKind::Type, "App");

        let view = graph.view();
        let ids: Vec<_> = view.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_view_serializes() {
        let mut graph = DependencyGraph::new();
        graph.get_or_create_node("A", "A", "A", NodeKind::Project, "A");
        graph.get_or_create_node("B", "B", "B", NodeKind::Project, "B");
        graph.add_edge("A", "B", EdgeKind::References);

        let json = serde_json::to_value(graph.view()).unwrap();
        assert_eq!(json["nodes"][0]["kind"], "project");
        assert_eq!(json["edges"][0]["kind"], "references");
        assert_eq!(json["edges"][0]["source_id"], "A");
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(NodeKind::Type.label(), "type");
        assert_eq!(NodeKind::Namespace.label(), "namespace");
        assert_eq!(NodeKind::Project.label(), "project");
        assert_eq!(NodeKind::Assembly.label(), "assembly");
        assert_eq!(format!("{}", EdgeKind::Inherits), "inherits");
        assert_eq!(format!("{}", EdgeKind::Uses), "uses");
    }
}
