//! Markdown export implementation.
//!
//! Renders the analysis result as a report for documentation and
//! agent-facing summaries.

use super::Exporter;
use crate::analysis::{AnalysisResult, AnalysisWarning};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> io::Result<()> {
        // Title
        writeln!(writer, "# Dependency Analysis Report")?;
        writeln!(writer)?;

        if result.cancelled {
            writeln!(writer, "> Analysis was cancelled; results are partial.")?;
            writeln!(writer)?;
        }

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Value |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Nodes | {} |", result.info.node_count)?;
        writeln!(writer, "| Edges | {} |", result.info.edge_count)?;
        writeln!(
            writer,
            "| Connected Components | {} |",
            result.info.connected_components
        )?;
        writeln!(
            writer,
            "| Max Dependency Depth | {} |",
            result.info.max_dependency_depth
        )?;
        writeln!(
            writer,
            "| Avg Outgoing Dependencies | {:.2} |",
            result.metrics.average_outgoing_dependencies
        )?;
        writeln!(
            writer,
            "| Circular Dependencies | {} |",
            result.cycles.len()
        )?;
        writeln!(writer)?;

        for (kind, count) in &result.info.nodes_by_kind {
            writeln!(writer, "- {} nodes: {}", kind, count)?;
        }
        for (kind, count) in &result.info.edges_by_kind {
            writeln!(writer, "- {} edges: {}", kind, count)?;
        }
        writeln!(writer)?;

        // Most coupled nodes
        if !result.metrics.node_metrics.is_empty() {
            writeln!(writer, "## Most Coupled Nodes")?;
            writeln!(writer)?;
            writeln!(writer, "| Node | Ca | Ce | Instability |")?;
            writeln!(writer, "|------|----|----|-------------|")?;
            for metric in result.metrics.node_metrics.iter().take(10) {
                writeln!(
                    writer,
                    "| {} | {} | {} | {:.2} |",
                    metric.id, metric.afferent, metric.efferent, metric.instability
                )?;
            }
            writeln!(writer)?;
        }

        // Issues section
        let has_issues = !result.cycles.is_empty()
            || !result.metrics.hub_nodes.is_empty()
            || !result.metrics.god_nodes.is_empty();
        if has_issues {
            writeln!(writer, "## Issues")?;
            writeln!(writer)?;
        }

        if !result.cycles.is_empty() {
            writeln!(writer, "### Circular Dependencies")?;
            writeln!(writer)?;
            for (i, cycle) in result.cycles.iter().enumerate() {
                writeln!(writer, "{}. [{}] `{}`", i + 1, cycle.severity, cycle.path())?;
            }
            writeln!(writer)?;
        }

        if !result.metrics.hub_nodes.is_empty() {
            writeln!(writer, "### Hub Nodes")?;
            writeln!(writer)?;
            for id in &result.metrics.hub_nodes {
                writeln!(writer, "- `{}`", id)?;
            }
            writeln!(writer)?;
        }

        if !result.metrics.god_nodes.is_empty() {
            writeln!(writer, "### God Nodes")?;
            writeln!(writer)?;
            for id in &result.metrics.god_nodes {
                writeln!(writer, "- `{}`", id)?;
            }
            writeln!(writer)?;
        }

        // Warnings
        if !result.warnings.is_empty() {
            writeln!(writer, "## Warnings")?;
            writeln!(writer)?;
            for warning in &result.warnings {
                match warning {
                    AnalysisWarning::CompilationUnavailable { project } => {
                        writeln!(writer, "- compilation unavailable for `{}`; skipped", project)?;
                    }
                }
            }
            writeln!(writer)?;
        }

        // Truncation note
        if result.window.truncated {
            writeln!(
                writer,
                "> Graph truncated: showing {} of {} nodes.",
                result.window.returned_nodes, result.window.total_nodes
            )?;
            writeln!(writer)?;
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by Depscope*")?;

        Ok(())
    }
}
