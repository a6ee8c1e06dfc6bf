//! Data structures describing a resolved workspace.
//!
//! These types mirror what a semantic-analysis backend exposes per
//! symbol: identity, kind, containing namespace and project, base-type
//! and interface lists, and resolved references. A project whose
//! `compilation` is `None` models the "compilation could not be
//! obtained" condition; the builder skips it with a warning.

use serde::{Deserialize, Serialize};

/// Placeholder namespace for files that declare none.
pub const GLOBAL_NAMESPACE: &str = "<global>";

/// The kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    #[default]
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
}

/// A resolved reference to a type, as supplied by the symbol backend.
///
/// For member references this is the *containing type* of the resolved
/// symbol; the engine never sees raw identifier tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeRef {
    /// Short name (e.g. "OrderService").
    pub name: String,
    /// Fully qualified display form (e.g. "Shop.Core.OrderService").
    pub full_name: String,
    /// Containing namespace, empty if global.
    #[serde(default)]
    pub namespace: String,
    /// Owning project name; `None` for symbols outside the workspace.
    #[serde(default)]
    pub project: Option<String>,
}

impl TypeRef {
    /// Creates a reference owned by a workspace project.
    pub fn new(
        name: impl Into<String>,
        full_name: impl Into<String>,
        namespace: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            namespace: namespace.into(),
            project: Some(project.into()),
        }
    }

    /// Creates a reference to a symbol outside the workspace.
    pub fn external(
        name: impl Into<String>,
        full_name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            namespace: namespace.into(),
            project: None,
        }
    }
}

/// A type, enum, or delegate declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Short name.
    pub name: String,
    /// Fully qualified display form; stable identity of the symbol.
    pub full_name: String,
    #[serde(default)]
    pub kind: SymbolKind,
    /// Containing namespace, empty if global.
    #[serde(default)]
    pub namespace: String,
    /// Base type, if any.
    #[serde(default)]
    pub base_type: Option<TypeRef>,
    /// Implemented interfaces.
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    /// Containing types of resolved identifier references inside the
    /// declaration body. May contain duplicates and self-references;
    /// the builder deduplicates.
    #[serde(default)]
    pub type_refs: Vec<TypeRef>,
}

impl TypeDecl {
    /// Creates a declaration with no base type, interfaces, or references.
    pub fn new(name: impl Into<String>, full_name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            kind,
            namespace: String::new(),
            base_type: None,
            interfaces: Vec::new(),
            type_refs: Vec::new(),
        }
    }
}

/// A compilation unit: one file and its declarations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceFile {
    pub path: String,
    /// File-level namespace; `None` maps to [`GLOBAL_NAMESPACE`].
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            namespace: None,
            types: Vec::new(),
        }
    }

    /// The file's namespace, or the global placeholder.
    pub fn namespace_or_global(&self) -> &str {
        self.namespace.as_deref().unwrap_or(GLOBAL_NAMESPACE)
    }

    /// All resolved references in the file: base types, interfaces, and
    /// body references of every declaration.
    pub fn all_refs(&self) -> impl Iterator<Item = &TypeRef> {
        self.types.iter().flat_map(|t| {
            t.base_type
                .iter()
                .chain(t.interfaces.iter())
                .chain(t.type_refs.iter())
        })
    }
}

/// The semantic model of one project.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Compilation {
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

/// A project in the workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub path: String,
    /// Semantic model; `None` when it could not be obtained.
    #[serde(default)]
    pub compilation: Option<Compilation>,
    /// Declared project-to-project references, by project name.
    #[serde(default)]
    pub project_refs: Vec<String>,
    /// Declared external assembly reference names.
    #[serde(default)]
    pub assembly_refs: Vec<String>,
}

impl Project {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            compilation: Some(Compilation::default()),
            project_refs: Vec::new(),
            assembly_refs: Vec::new(),
        }
    }

    /// Returns true if the project's symbol tree contains a namespace
    /// matching `target`, case-insensitively. A target matches a full
    /// dotted path, any nested prefix of one, or any single segment, so
    /// "core" matches both "Shop.Core" and "Core.Util".
    pub fn declares_namespace(&self, target: &str) -> bool {
        let Some(compilation) = &self.compilation else {
            return false;
        };
        let target = target.to_lowercase();
        compilation
            .files
            .iter()
            .flat_map(|f| {
                f.namespace
                    .iter()
                    .map(String::as_str)
                    .chain(f.types.iter().map(|t| t.namespace.as_str()))
            })
            .filter(|ns| !ns.is_empty())
            .any(|ns| namespace_matches(ns, &target))
    }

    /// Returns true if this project owns the file at `path` (exact
    /// match, or the file path ends with the given suffix).
    pub fn owns_file(&self, path: &str) -> bool {
        let Some(compilation) = &self.compilation else {
            return false;
        };
        compilation
            .files
            .iter()
            .any(|f| f.path == path || f.path.ends_with(path))
    }
}

/// Case-insensitive namespace match against a lowercased target:
/// full path, nested prefix, or single segment.
fn namespace_matches(namespace: &str, target_lower: &str) -> bool {
    let ns = namespace.to_lowercase();
    if ns == target_lower {
        return true;
    }
    let mut prefix = String::new();
    for segment in ns.split('.') {
        if segment == target_lower {
            return true;
        }
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(segment);
        if prefix == target_lower {
            return true;
        }
    }
    false
}

/// A resolved workspace: the root input to every analysis call.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Workspace {
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Workspace {
    /// Looks a project up by exact name.
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }
}
