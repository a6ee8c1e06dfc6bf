//! Scope resolution: turning a scope descriptor into a project set.
//!
//! A scope never defaults silently. If nothing matches, resolution
//! fails with [`AnalysisError::ScopeNotFound`] so the caller can report
//! the miss instead of analyzing the wrong thing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::model::{Project, Workspace};
use crate::analysis::AnalysisError;

/// What part of the workspace to analyze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "scope", content = "target", rename_all = "snake_case")]
pub enum AnalysisScope {
    /// Every project in the workspace.
    #[default]
    Solution,
    /// Projects whose name or path matches the target exactly or by
    /// substring.
    Project(String),
    /// Projects whose symbol tree declares a namespace matching the
    /// target, case-insensitively, including nested namespaces.
    Namespace(String),
    /// The single project owning the file at the given path.
    Type(String),
}

impl fmt::Display for AnalysisScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisScope::Solution => write!(f, "solution"),
            AnalysisScope::Project(t) => write!(f, "project:{}", t),
            AnalysisScope::Namespace(t) => write!(f, "namespace:{}", t),
            AnalysisScope::Type(t) => write!(f, "type:{}", t),
        }
    }
}

impl FromStr for AnalysisScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("solution") {
            return Ok(AnalysisScope::Solution);
        }
        match s.split_once(':') {
            Some(("project", t)) if !t.is_empty() => Ok(AnalysisScope::Project(t.to_string())),
            Some(("namespace", t)) if !t.is_empty() => Ok(AnalysisScope::Namespace(t.to_string())),
            Some(("type", t)) if !t.is_empty() => Ok(AnalysisScope::Type(t.to_string())),
            _ => Err(format!(
                "Unknown scope: '{}'. Valid scopes: solution, project:NAME, namespace:NS, type:PATH",
                s
            )),
        }
    }
}

/// Resolves a scope to the concrete set of projects to analyze.
///
/// # Errors
///
/// Returns [`AnalysisError::ScopeNotFound`] when no project matches.
pub fn resolve_scope<'a>(
    workspace: &'a Workspace,
    scope: &AnalysisScope,
) -> Result<Vec<&'a Project>, AnalysisError> {
    let projects: Vec<&Project> = match scope {
        AnalysisScope::Solution => workspace.projects.iter().collect(),
        AnalysisScope::Project(target) => workspace
            .projects
            .iter()
            .filter(|p| p.name == *target || p.name.contains(target) || p.path.contains(target))
            .collect(),
        AnalysisScope::Namespace(target) => workspace
            .projects
            .iter()
            .filter(|p| p.declares_namespace(target))
            .collect(),
        AnalysisScope::Type(path) => workspace
            .projects
            .iter()
            .find(|p| p.owns_file(path))
            .into_iter()
            .collect(),
    };

    if projects.is_empty() {
        return Err(AnalysisError::ScopeNotFound {
            scope: scope.to_string(),
        });
    }
    Ok(projects)
}
