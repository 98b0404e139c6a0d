//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::{parse_model_response, reconcile, ParseError};
use crate::placeholder::placeholder_fill;
use crate::prompt::PromptBuilder;
use crate::schema::ExtractionSchema;
use crate::types::{ExtractionOutcome, ExtractionSource, FallbackReason};
use sheetfill_domain::{LlmProvider, NormalizedRecord, SourceDocument};
use sheetfill_llm::LlmError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fills a template-derived record from source documents
///
/// Each call makes at most one model request. Anything that keeps the model
/// from producing a usable answer is reported through
/// [`ExtractionSource::Placeholder`] instead of an error.
pub struct Extractor<L>
where
    L: LlmProvider<Error = LlmError>,
{
    llm_provider: Option<Arc<L>>,
    unavailable: FallbackReason,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
{
    /// Create an Extractor backed by a model provider
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            llm_provider: Some(Arc::new(llm_provider)),
            unavailable: FallbackReason::ProviderUnavailable,
            config,
        })
    }

    /// Create an Extractor with no provider; every call uses placeholders
    pub fn without_provider(
        reason: FallbackReason,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            llm_provider: None,
            unavailable: reason,
            config,
        })
    }

    /// Fill `record` from `documents`
    ///
    /// The returned record has exactly the row identifiers of `record`.
    ///
    /// # Errors
    ///
    /// Only failures that are not one of the [`FallbackReason`] kinds are
    /// returned, such as a provider error of kind [`LlmError::Other`] or a
    /// panicked provider task.
    pub async fn extract(
        &self,
        record: &NormalizedRecord,
        documents: &[SourceDocument],
    ) -> Result<ExtractionOutcome, ExtractorError> {
        let Some(llm) = &self.llm_provider else {
            return Ok(self.fallback(record, self.unavailable));
        };
        if documents.is_empty() {
            return Ok(self.fallback(record, FallbackReason::NoDocuments));
        }

        info!(
            "Extracting {} rows from {} documents",
            record.len(),
            documents.len()
        );

        let schema = ExtractionSchema::synthesize(record).render();
        let prompt = PromptBuilder::new(
            record.row_names(),
            documents,
            self.config.max_context_chars,
        )
        .build();
        debug!("Prompt length: {} chars", prompt.len());

        let response = match self.call_llm(llm, prompt, schema).await? {
            Ok(response) => response,
            Err(reason) => return Ok(self.fallback(record, reason)),
        };
        debug!("Model response length: {} chars", response.len());

        match parse_model_response(&response) {
            Ok(rows) => {
                let filled = reconcile(record, rows);
                info!(
                    "Model filled {} cells across {} rows",
                    filled_cells(&filled),
                    filled.len()
                );
                Ok(ExtractionOutcome {
                    record: filled,
                    source: ExtractionSource::Model,
                })
            }
            Err(ParseError::Empty) => Ok(self.fallback(record, FallbackReason::EmptyResponse)),
            Err(ParseError::Schema(detail)) => {
                warn!("Unusable model response: {}", detail);
                Ok(self.fallback(record, FallbackReason::SchemaViolation))
            }
        }
    }

    /// Call the provider on a blocking worker
    ///
    /// The inner `Err` is a recoverable failure kind.
    async fn call_llm(
        &self,
        llm: &Arc<L>,
        prompt: String,
        schema: String,
    ) -> Result<Result<String, FallbackReason>, ExtractorError> {
        let llm = Arc::clone(llm);

        // LlmProvider is sync
        let result = tokio::task::spawn_blocking(move || llm.generate_structured(&prompt, &schema))
            .await
            .map_err(|e| ExtractorError::Task(e.to_string()))?;

        match result {
            Ok(response) => Ok(Ok(response)),
            Err(err) => match FallbackReason::from_llm_error(&err) {
                Some(reason) => {
                    warn!("Model call failed: {}", err);
                    Ok(Err(reason))
                }
                None => Err(ExtractorError::Llm(err.to_string())),
            },
        }
    }

    fn fallback(&self, record: &NormalizedRecord, reason: FallbackReason) -> ExtractionOutcome {
        warn!("Falling back to placeholder values: {}", reason);
        ExtractionOutcome {
            record: placeholder_fill(
                record,
                self.config.placeholder_min,
                self.config.placeholder_max,
            ),
            source: ExtractionSource::Placeholder(reason),
        }
    }
}

fn filled_cells(record: &NormalizedRecord) -> usize {
    record
        .iter()
        .map(|(_, row)| row.len() - row.null_count())
        .sum()
}
