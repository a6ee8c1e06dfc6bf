//! Coupling metrics over a completed dependency graph.
//!
//! Per node: afferent coupling (Ca, incoming edges), efferent coupling
//! (Ce, outgoing edges), and instability Ce/(Ca+Ce). Graph-wide:
//! average outgoing degree plus hub and god node detection against
//! fixed thresholds.

use serde::Serialize;

use super::dependency_graph::DependencyGraph;

/// A node is highly coupled when `ca + ce` exceeds this.
pub const HIGHLY_COUPLED_THRESHOLD: usize = 10;
/// A node is a hub when `ce` exceeds this: it depends on many others.
pub const HUB_THRESHOLD: usize = 7;
/// A node is a god node when `ca` exceeds this: many others depend on it.
pub const GOD_THRESHOLD: usize = 10;
/// The per-node metric list is capped to this many entries.
pub const NODE_METRIC_CAP: usize = 50;

/// Coupling numbers for one node.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NodeMetric {
    pub id: String,
    pub name: String,
    /// Incoming dependency edges (Ca).
    pub afferent: usize,
    /// Outgoing dependency edges (Ce).
    pub efferent: usize,
    /// Ce / (Ca + Ce), in [0, 1]; 0 when the node has no edges.
    pub instability: f64,
    pub highly_coupled: bool,
    pub hub: bool,
    pub god: bool,
}

impl NodeMetric {
    fn new(id: String, name: String, afferent: usize, efferent: usize) -> Self {
        let total = afferent + efferent;
        let instability = if total == 0 {
            0.0
        } else {
            efferent as f64 / total as f64
        };
        Self {
            id,
            name,
            afferent,
            efferent,
            instability,
            highly_coupled: total > HIGHLY_COUPLED_THRESHOLD,
            hub: efferent > HUB_THRESHOLD,
            god: afferent > GOD_THRESHOLD,
        }
    }

    /// Total coupling `ca + ce`, the ranking key.
    pub fn total_coupling(&self) -> usize {
        self.afferent + self.efferent
    }
}

/// Graph-wide coupling snapshot.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DependencyMetrics {
    /// |E| / |V|, 0 for the empty graph.
    pub average_outgoing_dependencies: f64,
    pub highly_coupled_count: usize,
    /// Ids of hub nodes, most coupled first.
    pub hub_nodes: Vec<String>,
    /// Ids of god nodes, most coupled first.
    pub god_nodes: Vec<String>,
    /// Per-node metrics, sorted descending by total coupling and capped
    /// to [`NODE_METRIC_CAP`] entries.
    pub node_metrics: Vec<NodeMetric>,
}

/// Computes the metrics snapshot for a completed graph.
///
/// # Example
///
/// ```rust
/// use depscope::graph::{calculate_metrics, DependencyGraph, EdgeKind, NodeKind};
///
/// let mut graph = DependencyGraph::new();
/// graph.get_or_create_node("A", "A", "A", NodeKind::Type, "App");
/// graph.get_or_create_node("B", "B", "B", NodeKind::Type, "App");
/// graph.add_edge("A", "B", EdgeKind::Uses);
///
/// let metrics = calculate_metrics(&graph);
/// assert_eq!(metrics.average_outgoing_dependencies, 0.5);
/// assert_eq!(metrics.node_metrics[0].instability, 1.0); // A: ce=1, ca=0
/// ```
pub fn calculate_metrics(graph: &DependencyGraph) -> DependencyMetrics {
    let mut node_metrics: Vec<NodeMetric> = graph
        .indices()
        .map(|idx| {
            let node = graph.node_at(idx);
            NodeMetric::new(
                node.id.clone(),
                node.name.clone(),
                graph.incoming_count(idx),
                graph.outgoing_count(idx),
            )
        })
        .collect();

    // Descending by total coupling, id ascending on ties for stable output.
    node_metrics.sort_by(|a, b| {
        b.total_coupling()
            .cmp(&a.total_coupling())
            .then_with(|| a.id.cmp(&b.id))
    });

    let hub_nodes = node_metrics
        .iter()
        .filter(|m| m.hub)
        .map(|m| m.id.clone())
        .collect();
    let god_nodes = node_metrics
        .iter()
        .filter(|m| m.god)
        .map(|m| m.id.clone())
        .collect();
    let highly_coupled_count = node_metrics.iter().filter(|m| m.highly_coupled).count();

    node_metrics.truncate(NODE_METRIC_CAP);

    let average_outgoing_dependencies = if graph.node_count() == 0 {
        0.0
    } else {
        graph.edge_count() as f64 / graph.node_count() as f64
    };

    DependencyMetrics {
        average_outgoing_dependencies,
        highly_coupled_count,
        hub_nodes,
        god_nodes,
        node_metrics,
    }
}
