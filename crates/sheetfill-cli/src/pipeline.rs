//! End-to-end template conversion.
//!
//! normalize template → extract (or fall back) → rehydrate → save

use crate::config::{Config, ProviderKind};
use crate::error::Result;
use sheetfill_domain::{NormalizedRecord, SourceDocument};
use sheetfill_extractor::{ExtractionSource, Extractor, FallbackReason};
use sheetfill_llm::{GeminiProvider, LlmError};
use sheetfill_template::{fill_template, load_record, RehydrationReport};
use std::path::{Path, PathBuf};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// What a conversion produced.
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    /// Identifier carried by every log line of the run
    pub conversion_id: Uuid,
    /// Saved workbook
    pub output: PathBuf,
    /// Number of source documents that were loaded
    pub documents: usize,
    /// The record written into the template
    pub record: NormalizedRecord,
    /// Where the values came from
    pub source: ExtractionSource,
    /// Cells written and anything that did not match
    pub report: RehydrationReport,
}

/// Build the extractor described by `config`.
///
/// A provider that cannot be constructed (missing key, bad client setup)
/// yields a placeholder-only extractor rather than an error.
pub fn build_extractor(config: &Config, api_key: Option<&str>) -> Result<Extractor<GeminiProvider>> {
    let extraction = config.extraction.clone();

    if config.model.provider == ProviderKind::None {
        info!("Model provider disabled in config");
        return Ok(Extractor::without_provider(
            FallbackReason::ProviderUnavailable,
            extraction,
        )?);
    }

    let key = config.resolve_api_key(api_key).unwrap_or_default();
    match GeminiProvider::with_timeout(key, &config.model.model, config.model.timeout()) {
        Ok(provider) => Ok(Extractor::new(
            provider.with_endpoint(&config.model.endpoint),
            extraction,
        )?),
        Err(e) => {
            warn!("Model provider unavailable: {}", e);
            let reason = match e {
                LlmError::MissingCredential(_) => FallbackReason::MissingCredential,
                _ => FallbackReason::ProviderUnavailable,
            };
            Ok(Extractor::without_provider(reason, extraction)?)
        }
    }
}

/// Run one conversion: `template` + `documents` → `output`.
pub async fn run_conversion<L>(
    extractor: &Extractor<L>,
    template: &Path,
    documents: &[SourceDocument],
    output: &Path,
) -> Result<ConversionSummary>
where
    L: sheetfill_domain::LlmProvider<Error = LlmError> + Send + Sync + 'static,
{
    let conversion_id = Uuid::now_v7();
    let span = info_span!("conversion", id = %conversion_id);

    async move {
        info!("Converting template {}", template.display());
        let template_record = load_record(template)?;
        info!(
            "Template has {} rows and {} columns",
            template_record.len(),
            template_record.column_names().len()
        );

        let outcome = extractor.extract(&template_record, documents).await?;
        let report = fill_template(template, &outcome.record, output)?;

        if !report.is_complete() {
            warn!(
                "{} rows and {} columns were not found in the template",
                report.unmatched_rows.len(),
                report.unmatched_columns.len()
            );
        }
        info!("Saved {}", output.display());

        Ok(ConversionSummary {
            conversion_id,
            output: output.to_path_buf(),
            documents: documents.len(),
            record: outcome.record,
            source: outcome.source,
            report,
        })
    }
    .instrument(span)
    .await
}
