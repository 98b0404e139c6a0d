//! Gemini Provider Implementation
//!
//! Talks to the Google Generative Language API. Structured calls send the
//! response schema along with the prompt so the model answers with JSON that
//! already has the requested shape.
//!
//! A call is a single round trip. Failures are reported to the caller rather
//! than retried; the extractor decides what to do with them.
//!
//! # Examples
//!
//! ```no_run
//! use sheetfill_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new("my-api-key", "gemini-2.5-flash").unwrap();
//!
//! // The async methods need a runtime; the LlmProvider trait offers a
//! // blocking wrapper.
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use sheetfill_domain::LlmProvider as LlmProviderTrait;
use std::time::Duration;
use tracing::debug;

/// Default Generative Language API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default timeout for model requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini API provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider against the public endpoint
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingCredential`] when `api_key` is blank, or
    /// [`LlmError::Other`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(api_key, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider with a custom request timeout
    pub fn with_timeout(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingCredential("gemini".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key,
            client,
        })
    }

    /// Point the provider at another API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Model this provider calls
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Generate JSON constrained by `schema`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The schema is not valid JSON
    /// - The API is unreachable or answers with a failure status
    /// - The response carries no text
    pub async fn generate_structured(
        &self,
        prompt: &str,
        schema: &str,
    ) -> Result<String, LlmError> {
        let response_schema: serde_json::Value = serde_json::from_str(schema)
            .map_err(|e| LlmError::Other(format!("Invalid response schema: {}", e)))?;
        let config = GenerationConfig {
            response_mime_type: "application/json",
            response_schema,
        };
        self.send(prompt, config).await
    }

    async fn send(
        &self,
        prompt: &str,
        generation_config: GenerationConfig,
    ) -> Result<String, LlmError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config,
        };

        debug!("Sending {} prompt chars to {}", prompt.len(), self.model);
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
        extract_text(parsed)
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: GenerateResponse) -> Result<String, LlmError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(LlmError::EmptyResponse)
    } else {
        Ok(text)
    }
}

impl GeminiProvider {
    fn block_on<F>(&self, fut: F) -> Result<String, LlmError>
    where
        F: std::future::Future<Output = Result<String, LlmError>>,
    {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
            .block_on(fut)
    }
}

impl LlmProviderTrait for GeminiProvider {
    type Error = LlmError;

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        self.block_on(GeminiProvider::generate_structured(self, prompt, schema))
    }
}
