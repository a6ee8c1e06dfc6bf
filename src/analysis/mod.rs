//! Analysis orchestration: one call in, one result out.
//!
//! [`analyze`] resolves the scope, builds the graph, runs cycle
//! detection, metrics, and connectivity over the full graph, then
//! windows the returned view. Only an empty scope is a hard error;
//! everything else degrades toward a smaller but valid result, with
//! warnings collected on the way.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::graph::{
    calculate_metrics, connected_components, detect_cycles, estimated_json_len,
    max_dependency_depth, window_graph, BuilderOptions, CircularDependency, DependencyGraph,
    DependencyMetrics, Granularity, GraphBuilder, GraphView, WindowOptions, WindowOutcome,
};
use crate::workspace::{resolve_scope, AnalysisScope, Workspace};

/// Errors surfaced to the caller.
///
/// Per-project failures are not here on purpose: they degrade the
/// result instead of failing it, and arrive as [`AnalysisWarning`]s.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No projects matched the requested scope.
    #[error("no projects found for scope '{scope}'")]
    ScopeNotFound { scope: String },
}

/// Non-fatal conditions collected during a run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// The project's compilation could not be obtained; it was skipped.
    CompilationUnavailable { project: String },
}

/// Cooperative cancellation signal shared between the caller and a
/// running analysis. Cloning is cheap; all clones observe the same
/// state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Traversal loops observe it at their next
    /// step and stop early with a partial result.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Aggregate counts describing the full (pre-window) graph.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DependencyAnalysisInfo {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_kind: BTreeMap<String, usize>,
    pub edges_by_kind: BTreeMap<String, usize>,
    pub connected_components: usize,
    pub max_dependency_depth: usize,
}

impl DependencyAnalysisInfo {
    /// Computes the info block from a completed graph.
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let mut nodes_by_kind: BTreeMap<String, usize> = BTreeMap::new();
        for node in graph.nodes() {
            *nodes_by_kind.entry(node.kind.label().to_string()).or_default() += 1;
        }
        let mut edges_by_kind: BTreeMap<String, usize> = BTreeMap::new();
        for edge in graph.edges() {
            *edges_by_kind.entry(edge.kind.label().to_string()).or_default() += 1;
        }

        Self {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            nodes_by_kind,
            edges_by_kind,
            connected_components: connected_components(graph),
            max_dependency_depth: max_dependency_depth(graph),
        }
    }
}

/// Parameters of one analysis call.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub scope: AnalysisScope,
    pub granularity: Granularity,
    pub options: BuilderOptions,
    pub window: WindowOptions,
}

/// Everything one analysis call produces.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// The windowed graph view; counts in `info` describe the full graph.
    pub graph: GraphView,
    pub info: DependencyAnalysisInfo,
    pub metrics: DependencyMetrics,
    pub cycles: Vec<CircularDependency>,
    pub window: WindowOutcome,
    pub warnings: Vec<AnalysisWarning>,
    /// True when the run was cancelled; the result is then partial.
    pub cancelled: bool,
}

/// Runs one dependency analysis over the workspace.
///
/// The graph is built fresh on every call and discarded with the
/// result; nothing persists between invocations.
///
/// # Errors
///
/// [`AnalysisError::ScopeNotFound`] when the scope matches no project.
pub fn analyze(
    workspace: &Workspace,
    request: &AnalysisRequest,
    cancel: &CancelToken,
) -> Result<AnalysisResult, AnalysisError> {
    let projects = resolve_scope(workspace, &request.scope)?;
    debug!(
        scope = %request.scope,
        granularity = %request.granularity,
        projects = projects.len(),
        "starting dependency analysis"
    );

    let builder = GraphBuilder::new(request.granularity, request.options.clone());
    let output = builder.build(&projects, cancel);

    let cycles = detect_cycles(&output.graph);
    let metrics = calculate_metrics(&output.graph);
    let info = DependencyAnalysisInfo::from_graph(&output.graph);
    let (limited, window) = window_graph(&output.graph, &request.window, estimated_json_len);

    debug!(
        nodes = info.node_count,
        edges = info.edge_count,
        cycles = cycles.len(),
        returned = window.returned_nodes,
        "dependency analysis complete"
    );

    Ok(AnalysisResult {
        graph: limited.view(),
        info,
        metrics,
        cycles,
        window,
        warnings: output.warnings,
        cancelled: output.cancelled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::model::{Compilation, Project, SourceFile, SymbolKind, TypeDecl, TypeRef};

    fn decl_with_refs(name: &str, ns: &str, project: &str, refs: &[&str]) -> TypeDecl {
        let mut d = TypeDecl::new(name, format!("{}.{}", ns, name), SymbolKind::Class);
        d.namespace = ns.to_string();
        for r in refs {
            d.type_refs
                .push(TypeRef::new(*r, format!("{}.{}", ns, r), ns, project));
        }
        d
    }

    /// One project, three types in a cycle: A -> B -> C -> A.
    fn cyclic_workspace() -> Workspace {
        let mut file = SourceFile::new("src/app.cs");
        file.namespace = Some("App".to_string());
        file.types.push(decl_with_refs("A", "App", "App", &["B"]));
        file.types.push(decl_with_refs("B", "App", "App", &["C"]));
        file.types.push(decl_with_refs("C", "App", "App", &["A"]));

        let mut project = Project::new("App", "src/App");
        project.compilation = Some(Compilation { files: vec![file] });
        Workspace {
            projects: vec![project],
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::default()
    }

    #[test]
    fn test_scope_not_found_is_the_only_failure() {
        let ws = Workspace::default();
        let result = analyze(&ws, &request(), &CancelToken::new());
        assert!(matches!(result, Err(AnalysisError::ScopeNotFound { .. })));
    }

    #[test]
    fn test_three_node_cycle_end_to_end() {
        let ws = cyclic_workspace();
        let result = analyze(&ws, &request(), &CancelToken::new()).unwrap();

        assert_eq!(result.info.node_count, 3);
        assert_eq!(result.info.edge_count, 3);
        assert_eq!(result.cycles.len(), 1);
        let members = result.cycles[0].members();
        for id in ["App.A", "App.B", "App.C"] {
            assert!(members.contains(&id.to_string()));
        }
        assert!(!result.window.truncated);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_determinism_across_runs() {
        let ws = cyclic_workspace();
        let first = analyze(&ws, &request(), &CancelToken::new()).unwrap();
        let second = analyze(&ws, &request(), &CancelToken::new()).unwrap();

        assert_eq!(first.graph.nodes, second.graph.nodes);
        assert_eq!(first.graph.edges, second.graph.edges);
        assert_eq!(first.cycles, second.cycles);
    }

    #[test]
    fn test_no_dangling_edges_in_result() {
        let ws = cyclic_workspace();
        let result = analyze(&ws, &request(), &CancelToken::new()).unwrap();

        let ids: std::collections::HashSet<_> =
            result.graph.nodes.iter().map(|n| n.id.as_str()).collect();
        for edge in &result.graph.edges {
            assert!(ids.contains(edge.source_id.as_str()));
            assert!(ids.contains(edge.target_id.as_str()));
        }
    }

    #[test]
    fn test_project_scenario_external_assembly_excluded() {
        let mut p1 = Project::new("P1", "src/P1");
        p1.project_refs.push("P2".to_string());
        let mut p2 = Project::new("P2", "src/P2");
        p2.assembly_refs.push("ExternalLib".to_string());
        let ws = Workspace {
            projects: vec![p1, p2],
        };

        let mut req = request();
        req.granularity = Granularity::Project;
        let result = analyze(&ws, &req, &CancelToken::new()).unwrap();

        let ids: Vec<_> = result.graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2"]);
        assert_eq!(result.graph.edges.len(), 1);
        assert_eq!(result.graph.edges[0].source_id, "P1");
        assert_eq!(result.graph.edges[0].target_id, "P2");
        assert_eq!(result.info.edges_by_kind.get("references"), Some(&1));
    }

    #[test]
    fn test_info_counts_by_kind() {
        let ws = cyclic_workspace();
        let result = analyze(&ws, &request(), &CancelToken::new()).unwrap();

        assert_eq!(result.info.nodes_by_kind.get("type"), Some(&3));
        assert_eq!(result.info.edges_by_kind.get("uses"), Some(&3));
        assert_eq!(result.info.connected_components, 1);
        assert_eq!(result.info.max_dependency_depth, 3);
    }

    #[test]
    fn test_windowing_truncates_result_graph() {
        let mut file = SourceFile::new("src/app.cs");
        file.namespace = Some("App".to_string());
        for i in 0..30 {
            file.types
                .push(decl_with_refs(&format!("T{:02}", i), "App", "App", &[]));
        }
        let mut project = Project::new("App", "src/App");
        project.compilation = Some(Compilation { files: vec![file] });
        let ws = Workspace {
            projects: vec![project],
        };

        let mut req = request();
        req.window.max_nodes = 10;
        let result = analyze(&ws, &req, &CancelToken::new()).unwrap();

        assert!(result.window.truncated);
        assert_eq!(result.window.returned_nodes, 10);
        assert_eq!(result.window.total_nodes, 30);
        assert_eq!(result.graph.nodes.len(), 10);
        // Info still describes the full graph
        assert_eq!(result.info.node_count, 30);
    }

    #[test]
    fn test_skipped_project_degrades_gracefully() {
        let mut ws = cyclic_workspace();
        let mut broken = Project::new("Broken", "src/Broken");
        broken.compilation = None;
        ws.projects.push(broken);

        let result = analyze(&ws, &request(), &CancelToken::new()).unwrap();

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.info.node_count, 3);
    }

    #[test]
    fn test_cancelled_before_start_yields_empty_partial() {
        let ws = cyclic_workspace();
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = analyze(&ws, &request(), &cancel).unwrap();

        assert!(result.cancelled);
        assert_eq!(result.info.node_count, 0);
        assert!(result.cycles.is_empty());
    }

    #[test]
    fn test_cancel_token_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_result_serializes_to_json() {
        let ws = cyclic_workspace();
        let result = analyze(&ws, &request(), &CancelToken::new()).unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["info"]["node_count"], 3);
        assert_eq!(json["window"]["truncated"], false);
        assert!(json["cycles"].as_array().is_some());
        assert_eq!(json["cancelled"], false);
    }

    #[test]
    fn test_scope_error_message_names_scope() {
        let ws = Workspace::default();
        let mut req = request();
        req.scope = AnalysisScope::Project("Ghost".to_string());
        let err = analyze(&ws, &req, &CancelToken::new()).unwrap_err();
        assert_eq!(err.to_string(), "no projects found for scope 'project:Ghost'");
    }
}
