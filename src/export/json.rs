//! JSON export implementation.
//!
//! Serializes the full analysis result for machine-readable output.
//! Edges reference node ids only, so the document is always acyclic.

use super::Exporter;
use crate::analysis::AnalysisResult;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> io::Result<()> {
        let json = serde_json::to_string_pretty(result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{}", json)
    }
}
