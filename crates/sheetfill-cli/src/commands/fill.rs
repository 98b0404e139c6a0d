//! Fill command implementation.

use crate::cli::FillArgs;
use crate::config::Config;
use crate::documents::{load_documents, PdfTextExtractor};
use crate::error::Result;
use crate::output::Formatter;
use crate::pipeline::{build_extractor, run_conversion};
use sheetfill_domain::NormalizedRecord;
use std::fs;
use tracing::warn;

/// Execute the fill command.
pub async fn execute_fill(
    args: FillArgs,
    config: &Config,
    api_key: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let has_pdf = args
        .documents
        .iter()
        .any(|p| p.extension().is_some_and(|e| e.eq_ignore_ascii_case("pdf")));
    if has_pdf && !PdfTextExtractor::is_available() {
        warn!("pdftotext not found; PDF documents will be skipped");
    }

    let documents = load_documents(&args.documents);
    let extractor = build_extractor(config, api_key)?;
    let summary = run_conversion(&extractor, &args.template, &documents, &args.output).await?;

    if let Some(path) = &args.record_out {
        write_record(&summary.record, path)?;
    }

    println!("{}", formatter.format_summary(&summary)?);
    Ok(())
}

fn write_record(record: &NormalizedRecord, path: &std::path::Path) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(record)?)?;
    Ok(())
}
