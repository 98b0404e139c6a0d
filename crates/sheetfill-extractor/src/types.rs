//! Result types for extraction

use serde::Serialize;
use sheetfill_domain::NormalizedRecord;
use sheetfill_llm::LlmError;
use std::fmt;

/// Why an extraction was served by the placeholder generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No API key was configured
    MissingCredential,
    /// No provider could be constructed, or the model is not served
    ProviderUnavailable,
    /// No source documents were supplied
    NoDocuments,
    /// The request failed in transport or was rate limited
    Network,
    /// The model answered with an empty body
    EmptyResponse,
    /// The response did not match the requested shape
    SchemaViolation,
}

impl FallbackReason {
    /// Classify a provider error; `None` for errors that should propagate
    pub fn from_llm_error(err: &LlmError) -> Option<Self> {
        match err {
            LlmError::MissingCredential(_) => Some(FallbackReason::MissingCredential),
            LlmError::ModelNotAvailable(_) => Some(FallbackReason::ProviderUnavailable),
            LlmError::Communication(_) | LlmError::RateLimitExceeded => {
                Some(FallbackReason::Network)
            }
            LlmError::EmptyResponse => Some(FallbackReason::EmptyResponse),
            LlmError::InvalidResponse(_) => Some(FallbackReason::SchemaViolation),
            LlmError::Other(_) => None,
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FallbackReason::MissingCredential => "no model credential configured",
            FallbackReason::ProviderUnavailable => "model provider unavailable",
            FallbackReason::NoDocuments => "no source documents",
            FallbackReason::Network => "model request failed",
            FallbackReason::EmptyResponse => "empty model response",
            FallbackReason::SchemaViolation => "model response did not match the schema",
        };
        f.write_str(text)
    }
}

/// Where the values of an extraction came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    /// Parsed from the model response
    Model,
    /// Generated by the placeholder fallback
    Placeholder(FallbackReason),
}

impl ExtractionSource {
    /// The fallback reason, if placeholders were used
    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            ExtractionSource::Model => None,
            ExtractionSource::Placeholder(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionSource::Model => f.write_str("model"),
            ExtractionSource::Placeholder(reason) => write!(f, "placeholder ({})", reason),
        }
    }
}

/// Result of an extraction
///
/// `record` always has exactly the row identifiers of the input record.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// The filled record
    pub record: NormalizedRecord,

    /// How the values were produced
    pub source: ExtractionSource,
}

impl ExtractionOutcome {
    /// Whether the values came from the model
    pub fn is_from_model(&self) -> bool {
        self.source == ExtractionSource::Model
    }
}
