//! Depscope - dependency graph analysis engine for code symbol models
//!
//! This crate builds a directed graph of code-level relationships
//! (inheritance, interface implementation, member usage, project and
//! assembly references) from a symbol model, detects circular reference
//! chains, computes coupling metrics, and returns a size-bounded view
//! suitable for agent-facing tools.

pub mod analysis;
pub mod export;
pub mod graph;
pub mod workspace;
