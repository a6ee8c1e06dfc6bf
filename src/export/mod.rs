//! Export functionality for dependency analysis results.
//!
//! This module provides exporters for outputting analysis results in
//! various formats: JSON, Markdown, and CSV.

pub mod csv;
pub mod json;
pub mod markdown;

use crate::analysis::AnalysisResult;
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    Json,
    /// Markdown format - documentation/reporting
    Markdown,
    /// CSV format - node metrics, spreadsheet-friendly
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, markdown, csv",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the analysis result to the given writer.
    fn export<W: Write>(&self, result: &AnalysisResult, writer: &mut W) -> io::Result<()>;
}

/// Export a result in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    result: &AnalysisResult,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(result, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(result, writer),
        ExportFormat::Csv => csv::CsvExporter.export(result, writer),
    }
}

/// Export a result to a string.
pub fn export_to_string(format: ExportFormat, result: &AnalysisResult) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, result, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
