//! Ollama Provider Implementation
//!
//! Runs extraction against a local Ollama instance, which keeps book text
//! on the machine.
//!
//! # Features
//!
//! - Async HTTP communication with the Ollama `/api/generate` endpoint
//! - JSON mode via `format: "json"`
//! - Configurable endpoint, default model and timeout
//!
//! Ollama has no safety filter settings, so `GenerationRequest::safety` is
//! ignored here.
//!
//! # Examples
//!
//! ```no_run
//! use fourthwall_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.1").unwrap();
//! ```

use crate::{LlmError, DEFAULT_TIMEOUT_SECS};
use async_trait::async_trait;
use fourthwall_domain::{Generation, GenerationRequest, LanguageModel, ResponseFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Ollama API provider for local LLM inference
#[derive(Debug)]
pub struct OllamaProvider {
    endpoint: String,
    default_model: String,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model used when a request does not name one
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider with a custom HTTP timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            default_model: model.into(),
            client,
        })
    }

    /// Create a provider against `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    fn model_for<'a>(&'a self, request: &'a GenerationRequest) -> &'a str {
        if request.model.trim().is_empty() {
            &self.default_model
        } else {
            &request.model
        }
    }

    fn request_body<'a>(&'a self, request: &'a GenerationRequest) -> OllamaGenerateRequest<'a> {
        OllamaGenerateRequest {
            model: self.model_for(request),
            prompt: &request.prompt,
            stream: false,
            format: match request.response_format {
                ResponseFormat::Json => Some("json"),
                ResponseFormat::Text => None,
            },
        }
    }
}

#[async_trait]
impl LanguageModel for OllamaProvider {
    type Error = LlmError;

    /// One POST to `/api/generate`, no retries
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Response format is invalid
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, Self::Error> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = self.request_body(request);
        debug!(model = body.model, "Sending Ollama request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(body.model.to_string()));
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

        let parsed = response
            .json::<OllamaGenerateResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(Generation::new(parsed.response))
    }
}
