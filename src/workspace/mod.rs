//! Workspace symbol model consumed by the analysis engine.
//!
//! The engine never reads source code itself. Callers hand it an
//! already-resolved [`Workspace`]: projects, their compilations, and
//! per-declaration symbol information (base types, interfaces, resolved
//! references). The model is plain serde data so it can be constructed
//! in tests or loaded from JSON by the CLI.
//!
//! # Example
//!
//! ```rust
//! use depscope::workspace::{Project, Workspace};
//!
//! let ws = Workspace {
//!     projects: vec![Project::new("Core", "src/Core")],
//! };
//! assert_eq!(ws.projects.len(), 1);
//! ```

pub mod model;
pub mod scope;

pub use model::{
    Compilation, Project, SourceFile, SymbolKind, TypeDecl, TypeRef, Workspace, GLOBAL_NAMESPACE,
};
pub use scope::{resolve_scope, AnalysisScope};
