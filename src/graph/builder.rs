//! Graph construction from a workspace symbol model.
//!
//! The builder walks resolved projects strictly sequentially at one of
//! three granularities and emits nodes and typed edges into a fresh
//! [`DependencyGraph`]. A project whose compilation is unavailable is
//! skipped with a warning; cancellation is checked cooperatively at
//! every traversal step and yields a partial graph.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use super::dependency_graph::{DependencyGraph, EdgeKind, NodeKind, EXTERNAL_PROJECT};
use crate::analysis::{AnalysisWarning, CancelToken};
use crate::workspace::model::{Project, SourceFile, TypeRef};

/// Namespace prefixes treated as external by default: host
/// platform/runtime namespaces plus the common serialization library.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] =
    &["System", "Microsoft", "mscorlib", "netstandard", "Newtonsoft"];

/// Node granularity of the generated graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One node per type/enum/delegate declaration.
    #[default]
    Type,
    /// One node per namespace, one `Uses` edge per referencing file.
    Namespace,
    /// One node per project, `References` edges for declared references.
    Project,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Type => write!(f, "type"),
            Granularity::Namespace => write!(f, "namespace"),
            Granularity::Project => write!(f, "project"),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "type" => Ok(Granularity::Type),
            "namespace" => Ok(Granularity::Namespace),
            "project" => Ok(Granularity::Project),
            _ => Err(format!(
                "Unknown granularity: '{}'. Valid values: type, namespace, project",
                s
            )),
        }
    }
}

/// Options controlling graph construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderOptions {
    /// Include symbols from excluded-prefix namespaces and external
    /// assemblies.
    pub include_external: bool,
    /// Namespace prefixes considered external.
    pub excluded_prefixes: Vec<String>,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            include_external: false,
            excluded_prefixes: DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl BuilderOptions {
    /// A namespace is external if it is empty or starts with one of the
    /// excluded prefixes.
    pub fn is_external(&self, namespace: &str) -> bool {
        namespace.is_empty()
            || self
                .excluded_prefixes
                .iter()
                .any(|p| namespace.starts_with(p.as_str()))
    }

    /// Whether a reference into `namespace` should produce a node and
    /// edge under these options.
    fn includes(&self, namespace: &str) -> bool {
        self.include_external || !self.is_external(namespace)
    }
}

/// Result of one build: the graph plus everything that went sideways.
#[derive(Debug)]
pub struct BuildOutput {
    pub graph: DependencyGraph,
    pub warnings: Vec<AnalysisWarning>,
    /// True when the build stopped early on a cancellation signal; the
    /// graph then holds whatever was emitted before the stop.
    pub cancelled: bool,
}

/// Walks project symbol models and emits dependency nodes and edges.
pub struct GraphBuilder {
    granularity: Granularity,
    options: BuilderOptions,
}

impl GraphBuilder {
    pub fn new(granularity: Granularity, options: BuilderOptions) -> Self {
        Self {
            granularity,
            options,
        }
    }

    /// Builds a fresh graph from the given projects.
    ///
    /// Projects are processed sequentially; a project without an
    /// obtainable compilation is skipped with a warning and never
    /// aborts the rest of the run.
    pub fn build(&self, projects: &[&Project], cancel: &CancelToken) -> BuildOutput {
        let mut graph = DependencyGraph::new();
        let mut warnings = Vec::new();

        for project in projects {
            if cancel.is_cancelled() {
                return BuildOutput {
                    graph,
                    warnings,
                    cancelled: true,
                };
            }
            debug!(project = %project.name, granularity = %self.granularity, "processing project");

            if self.granularity == Granularity::Project {
                self.add_project(&mut graph, project);
                continue;
            }

            let Some(compilation) = &project.compilation else {
                warn!(project = %project.name, "compilation unavailable; skipping project");
                warnings.push(AnalysisWarning::CompilationUnavailable {
                    project: project.name.clone(),
                });
                continue;
            };

            for file in &compilation.files {
                if cancel.is_cancelled() {
                    return BuildOutput {
                        graph,
                        warnings,
                        cancelled: true,
                    };
                }
                match self.granularity {
                    Granularity::Type => self.add_file_types(&mut graph, project, file),
                    Granularity::Namespace => self.add_file_namespaces(&mut graph, project, file),
                    Granularity::Project => {}
                }
            }
        }

        BuildOutput {
            graph,
            warnings,
            cancelled: false,
        }
    }

    /// Type granularity: a node per declaration, `Inherits` to the base
    /// type, `Implements` per interface, and one `Uses` edge per
    /// distinct referenced type other than self.
    fn add_file_types(&self, graph: &mut DependencyGraph, project: &Project, file: &SourceFile) {
        for decl in &file.types {
            let source_id = decl.full_name.as_str();
            graph.get_or_create_node(
                source_id,
                &decl.name,
                &decl.full_name,
                NodeKind::Type,
                &project.name,
            );

            if let Some(base) = &decl.base_type {
                self.add_type_edge(graph, source_id, base, EdgeKind::Inherits);
            }
            for interface in &decl.interfaces {
                self.add_type_edge(graph, source_id, interface, EdgeKind::Implements);
            }

            let mut seen: HashSet<&str> = HashSet::new();
            for reference in &decl.type_refs {
                if reference.full_name == decl.full_name {
                    continue;
                }
                if !seen.insert(reference.full_name.as_str()) {
                    continue;
                }
                self.add_type_edge(graph, source_id, reference, EdgeKind::Uses);
            }
        }
    }

    fn add_type_edge(
        &self,
        graph: &mut DependencyGraph,
        source_id: &str,
        target: &TypeRef,
        kind: EdgeKind,
    ) {
        if !self.options.includes(&target.namespace) {
            return;
        }
        let project = target.project.as_deref().unwrap_or(EXTERNAL_PROJECT);
        graph.get_or_create_node(
            &target.full_name,
            &target.name,
            &target.full_name,
            NodeKind::Type,
            project,
        );
        graph.add_edge(source_id, &target.full_name, kind);
    }

    /// Namespace granularity: a node for the file's namespace and one
    /// `Uses` edge per distinct referenced namespace in that file.
    /// Multiplicity across files is deliberate and not deduplicated.
    fn add_file_namespaces(
        &self,
        graph: &mut DependencyGraph,
        project: &Project,
        file: &SourceFile,
    ) {
        let source_ns = file.namespace_or_global();
        graph.get_or_create_node(
            source_ns,
            short_namespace_name(source_ns),
            source_ns,
            NodeKind::Namespace,
            &project.name,
        );

        // BTreeMap keeps the per-file edge order deterministic.
        let mut referenced: BTreeMap<&str, &TypeRef> = BTreeMap::new();
        for reference in file.all_refs() {
            let ns = reference.namespace.as_str();
            if ns.is_empty() || ns == source_ns {
                continue;
            }
            if !self.options.includes(ns) {
                continue;
            }
            referenced.entry(ns).or_insert(reference);
        }

        for (ns, reference) in referenced {
            let project_label = reference.project.as_deref().unwrap_or(EXTERNAL_PROJECT);
            graph.get_or_create_node(
                ns,
                short_namespace_name(ns),
                ns,
                NodeKind::Namespace,
                project_label,
            );
            graph.add_edge(source_ns, ns, EdgeKind::Uses);
        }
    }

    /// Project granularity: a node per project, `References` edges for
    /// project references, and (only with external inclusion) edges to
    /// non-framework referenced assemblies.
    fn add_project(&self, graph: &mut DependencyGraph, project: &Project) {
        graph.get_or_create_node(
            &project.name,
            &project.name,
            &project.name,
            NodeKind::Project,
            &project.name,
        );

        for target in &project.project_refs {
            graph.get_or_create_node(target, target, target, NodeKind::Project, target);
            graph.add_edge(&project.name, target, EdgeKind::References);
        }

        if !self.options.include_external {
            return;
        }
        for assembly in &project.assembly_refs {
            if self.options.is_external(assembly) {
                continue;
            }
            graph.get_or_create_node(
                assembly,
                assembly,
                assembly,
                NodeKind::Assembly,
                EXTERNAL_PROJECT,
            );
            graph.add_edge(&project.name, assembly, EdgeKind::References);
        }
    }
}

/// Last dotted segment of a namespace, used as its short label.
fn short_namespace_name(namespace: &str) -> &str {
    namespace.rsplit('.').next().unwrap_or(namespace)
}
