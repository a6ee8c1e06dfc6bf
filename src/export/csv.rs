//! CSV export implementation.
//!
//! Exports per-node coupling metrics in CSV format for spreadsheet use.

use super::Exporter;
use crate::analysis::AnalysisResult;
use std::io::{self, Write};

/// CSV exporter implementation.
pub struct CsvExporter;

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or newlines.
    fn escape_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> io::Result<()> {
        // Write header
        writeln!(writer, "id,name,afferent,efferent,instability,in_cycle,hub,god")?;

        // Build a set of nodes in cycles for quick lookup
        let cycle_nodes: std::collections::HashSet<&str> = result
            .cycles
            .iter()
            .flat_map(|c| c.nodes.iter().map(|s| s.as_str()))
            .collect();

        // Write each node metric as a row
        for metric in &result.metrics.node_metrics {
            let in_cycle = cycle_nodes.contains(metric.id.as_str());

            writeln!(
                writer,
                "{},{},{},{},{:.4},{},{},{}",
                Self::escape_field(&metric.id),
                Self::escape_field(&metric.name),
                metric.afferent,
                metric.efferent,
                metric.instability,
                in_cycle,
                metric.hub,
                metric.god
            )?;
        }

        Ok(())
    }
}
