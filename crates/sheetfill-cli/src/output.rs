//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::pipeline::ConversionSummary;
use colored::*;
use sheetfill_domain::NormalizedRecord;
use sheetfill_template::RehydrationReport;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a normalized record.
    pub fn format_record(&self, record: &NormalizedRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Table => Ok(self.format_record_table(record)),
        }
    }

    fn format_record_table(&self, record: &NormalizedRecord) -> String {
        if record.is_empty() {
            return self.colorize("No rows found.", "yellow");
        }

        let columns = record.column_names();
        let mut builder = Builder::default();
        builder.push_record(std::iter::once("Row".to_string()).chain(columns.iter().cloned()));

        for (name, values) in record.iter() {
            let cells = columns.iter().map(|col| match values.get(col) {
                Some(Some(value)) => value.to_string(),
                _ => String::new(),
            });
            builder.push_record(std::iter::once(name.to_string()).chain(cells));
        }

        self.styled(builder)
    }

    /// Format the result of a full conversion.
    pub fn format_summary(&self, summary: &ConversionSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "conversion_id": summary.conversion_id.to_string(),
                    "output": summary.output.display().to_string(),
                    "documents": summary.documents,
                    "rows": summary.record.len(),
                    "source": summary.source,
                    "cells_written": summary.report.cells_written,
                    "unmatched_rows": summary.report.unmatched_rows,
                    "unmatched_columns": summary.report.unmatched_columns,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["Conversion", &summary.conversion_id.to_string()]);
                builder.push_record(["Documents", &summary.documents.to_string()]);
                builder.push_record(["Rows", &summary.record.len().to_string()]);
                builder.push_record(["Source", &summary.source.to_string()]);
                push_report_rows(&mut builder, &summary.output, &summary.report);

                let mut out = self.styled(builder);
                if summary.source.fallback_reason().is_some() {
                    out.push('\n');
                    out.push_str(&self.warning("Values are placeholders, not extracted figures"));
                }
                Ok(out)
            }
        }
    }

    /// Format the result of writing a record into a template.
    pub fn format_report(&self, output: &Path, report: &RehydrationReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "output": output.display().to_string(),
                    "cells_written": report.cells_written,
                    "unmatched_rows": report.unmatched_rows,
                    "unmatched_columns": report.unmatched_columns,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                push_report_rows(&mut builder, output, report);
                Ok(self.styled(builder))
            }
        }
    }

    fn styled(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn push_report_rows(builder: &mut Builder, output: &Path, report: &RehydrationReport) {
    builder.push_record(["Output", &output.display().to_string()]);
    builder.push_record(["Cells written", &report.cells_written.to_string()]);
    if !report.unmatched_rows.is_empty() {
        builder.push_record(["Unmatched rows", &report.unmatched_rows.join(", ")]);
    }
    if !report.unmatched_columns.is_empty() {
        builder.push_record(["Unmatched columns", &report.unmatched_columns.join(", ")]);
    }
}
