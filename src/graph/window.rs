//! Size-bounded selection of the graph returned to the caller.
//!
//! The full graph can be arbitrarily large; responses cannot. The
//! windower keeps at most the requested number of nodes and, when the
//! caller's size estimate still exceeds the hard ceiling, shrinks the
//! keep count through a fixed ratio ladder. Edges survive only when
//! both endpoints survived, so the returned subgraph is always
//! self-consistent.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dependency_graph::DependencyGraph;

/// Fractions of the requested maximum tried in order until the size
/// estimate fits the ceiling.
pub const KEEP_RATIOS: &[f64] = &[1.0, 0.75, 0.5, 0.25, 0.1];

/// Default requested maximum node count.
pub const DEFAULT_MAX_NODES: usize = 100;

/// Default hard ceiling for the size estimate, in estimator units
/// (serialized bytes for the JSON estimator).
pub const DEFAULT_SIZE_CEILING: usize = 200_000;

/// Windowing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowOptions {
    pub max_nodes: usize,
    pub size_ceiling: usize,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            size_ceiling: DEFAULT_SIZE_CEILING,
        }
    }
}

/// What the windower kept, and whether anything was cut.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WindowOutcome {
    pub truncated: bool,
    pub returned_nodes: usize,
    pub total_nodes: usize,
}

/// Size estimator based on the serialized JSON length of the graph view.
pub fn estimated_json_len(graph: &DependencyGraph) -> usize {
    serde_json::to_string(&graph.view())
        .map(|s| s.len())
        .unwrap_or(usize::MAX)
}

/// Selects a size-bounded subgraph.
///
/// Nodes are kept in insertion order. The ratio ladder is walked until
/// `estimate` fits the ceiling; the smallest cut is returned even if it
/// still exceeds the ceiling.
pub fn window_graph<F>(
    graph: &DependencyGraph,
    options: &WindowOptions,
    estimate: F,
) -> (DependencyGraph, WindowOutcome)
where
    F: Fn(&DependencyGraph) -> usize,
{
    let total_nodes = graph.node_count();

    let mut limited = limit_graph(graph, options.max_nodes.min(total_nodes));
    for &ratio in &KEEP_RATIOS[1..] {
        if estimate(&limited) <= options.size_ceiling {
            break;
        }
        let keep = ((options.max_nodes as f64) * ratio).floor() as usize;
        limited = limit_graph(graph, keep.min(total_nodes));
    }
    if estimate(&limited) > options.size_ceiling {
        debug!(
            nodes = limited.node_count(),
            ceiling = options.size_ceiling,
            "estimate still above ceiling at smallest keep ratio"
        );
    }

    let returned_nodes = limited.node_count();
    let outcome = WindowOutcome {
        truncated: returned_nodes < total_nodes,
        returned_nodes,
        total_nodes,
    };
    (limited, outcome)
}

/// First `keep` nodes in insertion order plus every edge whose
/// endpoints both survived.
fn limit_graph(graph: &DependencyGraph, keep: usize) -> DependencyGraph {
    let mut limited = DependencyGraph::with_capacity(keep, graph.edge_count());
    for node in graph.nodes().take(keep) {
        limited.get_or_create_node(&node.id, &node.name, &node.full_name, node.kind, &node.project);
    }
    for edge in graph.edges() {
        limited.add_edge(&edge.source_id, &edge.target_id, edge.kind);
    }
    limited
}
