//! Dependency graph construction and analysis.
//!
//! The [`DependencyGraph`] arena stores nodes and typed edges; the
//! sibling modules walk it: [`builder`] populates it from a workspace,
//! [`cycles`] finds circular reference chains, [`metrics`] computes
//! coupling numbers, [`connectivity`] measures components and depth,
//! and [`window`] cuts the bounded view returned to callers.
//!
//! # Example
//!
//! ```rust
//! use depscope::graph::{DependencyGraph, EdgeKind, NodeKind};
//!
//! let mut graph = DependencyGraph::new();
//! graph.get_or_create_node("App.A", "A", "App.A", NodeKind::Type, "App");
//! graph.get_or_create_node("App.B", "B", "App.B", NodeKind::Type, "App");
//! graph.add_edge("App.A", "App.B", EdgeKind::Uses);
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

pub mod builder;
pub mod connectivity;
pub mod cycles;
mod dependency_graph;
pub mod metrics;
pub mod window;

pub use builder::{
    BuildOutput, BuilderOptions, Granularity, GraphBuilder, DEFAULT_EXCLUDED_PREFIXES,
};
pub use connectivity::{connected_components, max_dependency_depth};
pub use cycles::{detect_cycles, CircularDependency, CycleSeverity};
pub use dependency_graph::{
    DependencyEdge, DependencyGraph, DependencyNode, EdgeKind, GraphView, NodeKind,
    EXTERNAL_PROJECT,
};
pub use metrics::{
    calculate_metrics, DependencyMetrics, NodeMetric, GOD_THRESHOLD, HIGHLY_COUPLED_THRESHOLD,
    HUB_THRESHOLD, NODE_METRIC_CAP,
};
pub use window::{
    estimated_json_len, window_graph, WindowOptions, WindowOutcome, DEFAULT_MAX_NODES,
    DEFAULT_SIZE_CEILING, KEEP_RATIOS,
};
