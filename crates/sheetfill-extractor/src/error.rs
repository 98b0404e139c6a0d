//! Error types for the Extractor

use thiserror::Error;

/// Errors that abort an extraction instead of falling back to placeholders
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Provider failure outside the recoverable kinds
    #[error("LLM error: {0}")]
    Llm(String),

    /// The blocking provider task did not complete
    #[error("Provider task failed: {0}")]
    Task(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
