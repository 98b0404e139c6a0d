//! Sheetfill Model Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `sheetfill-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Google Generative Language API with schema-constrained
//!   JSON output
//!
//! # Examples
//!
//! ```
//! use sheetfill_llm::MockProvider;
//! use sheetfill_domain::LlmProvider;
//!
//! let provider = MockProvider::new(r#"{"financial_data": []}"#);
//! let result = provider.generate_structured("extract", "{}").unwrap();
//! assert_eq!(result, r#"{"financial_data": []}"#);
//! ```

#![warn(missing_docs)]

pub mod gemini;

use sheetfill_domain::LlmProvider as LlmProviderTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur during model operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The model answered with no content
    #[error("Empty response from model")]
    EmptyResponse,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// No API key was configured for the provider
    #[error("Missing credential for {0}")]
    MissingCredential(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(LlmError),
}

impl MockReply {
    fn resolve(&self) -> Result<String, LlmError> {
        match self {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail(err) => Err(err.clone()),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<String, MockReply>,
    call_count: usize,
    last_schema: Option<String>,
}

/// Mock model provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. Clones
/// share state, so a test can keep a handle to inspect calls made through a
/// clone handed to the code under test.
///
/// # Examples
///
/// ```
/// use sheetfill_llm::{LlmError, MockProvider};
/// use sheetfill_domain::LlmProvider;
///
/// let mut provider = MockProvider::new("fixed");
/// provider.add_response("prompt1", "response1");
/// provider.add_error("prompt2", LlmError::RateLimitExceeded);
///
/// assert_eq!(provider.generate_structured("anything", "{}").unwrap(), "fixed");
/// assert_eq!(provider.generate_structured("prompt1", "{}").unwrap(), "response1");
/// assert!(provider.generate_structured("prompt2", "{}").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_reply: MockReply::Text(response.into()),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Create a provider that fails every call with `error`
    pub fn failing(error: LlmError) -> Self {
        Self {
            default_reply: MockReply::Fail(error),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.state()
            .responses
            .insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>, error: LlmError) {
        self.state()
            .responses
            .insert(prompt.into(), MockReply::Fail(error));
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        self.state().call_count
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.state().call_count = 0;
    }

    /// Schema passed to the most recent structured call
    pub fn last_schema(&self) -> Option<String> {
        self.state().last_schema.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        let mut state = self.state();
        state.call_count += 1;
        state.last_schema = Some(schema.to_string());
        match state.responses.get(prompt) {
            Some(reply) => reply.resolve(),
            None => self.default_reply.resolve(),
        }
    }
}
