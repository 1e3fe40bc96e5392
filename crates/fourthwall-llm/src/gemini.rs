//! Gemini Provider Implementation
//!
//! Calls the Generative Language API `generateContent` endpoint.
//!
//! # Features
//!
//! - JSON mode via `generationConfig.responseMimeType`
//! - Per-category safety thresholds from the request's `SafetySettings`
//! - Blocked or empty candidates come back as an empty `Generation`, not an
//!   error, so callers can tell a refusal apart from a transport failure
//!
//! # Examples
//!
//! ```no_run
//! use fourthwall_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new("my-api-key").unwrap();
//! ```

use crate::{LlmError, DEFAULT_TIMEOUT_SECS};
use async_trait::async_trait;
use fourthwall_domain::traits::{BlockThreshold, HarmCategory};
use fourthwall_domain::{Generation, GenerationRequest, LanguageModel, ResponseFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Generative Language API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini API provider
pub struct GeminiProvider {
    endpoint: String,
    api_key: String,
    default_model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("endpoint", &self.endpoint)
            .field("default_model", &self.default_model)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<GeminiSafetySetting>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: String,
}

#[derive(Serialize)]
struct GeminiSafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    prompt_feedback: Option<GeminiPromptFeedback>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GeminiError {
    message: String,
}

impl GeminiProvider {
    /// Create a provider with the default endpoint, model and timeout
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider with a custom HTTP timeout
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Configuration("Gemini API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            default_model: DEFAULT_MODEL.to_string(),
            client,
        })
    }

    /// Point at a different endpoint (proxies, test servers)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Model used when a request does not name one
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    fn model_for<'a>(&'a self, request: &'a GenerationRequest) -> &'a str {
        if request.model.trim().is_empty() {
            &self.default_model
        } else {
            &request.model
        }
    }
}

fn category_name(category: HarmCategory) -> &'static str {
    match category {
        HarmCategory::HateSpeech => "HARM_CATEGORY_HATE_SPEECH",
        HarmCategory::Harassment => "HARM_CATEGORY_HARASSMENT",
        HarmCategory::SexuallyExplicit => "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        HarmCategory::DangerousContent => "HARM_CATEGORY_DANGEROUS_CONTENT",
    }
}

fn threshold_name(threshold: BlockThreshold) -> &'static str {
    match threshold {
        BlockThreshold::BlockNone => "BLOCK_NONE",
        BlockThreshold::ProviderDefault => "HARM_BLOCK_THRESHOLD_UNSPECIFIED",
    }
}

fn build_request_body(request: &GenerationRequest) -> GeminiRequest {
    let generation_config = match request.response_format {
        ResponseFormat::Json => Some(GeminiGenerationConfig {
            response_mime_type: "application/json".to_string(),
        }),
        ResponseFormat::Text => None,
    };

    let safety_settings = request
        .safety
        .thresholds
        .iter()
        .map(|(category, threshold)| GeminiSafetySetting {
            category: category_name(*category),
            threshold: threshold_name(*threshold),
        })
        .collect();

    GeminiRequest {
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: request.prompt.clone(),
            }],
        }],
        generation_config,
        safety_settings,
    }
}

/// Turn a decoded response body into a generation
///
/// A prompt-level block, a missing candidate, or a candidate without text
/// all map to an empty generation.
fn interpret_response(response: GeminiResponse) -> Result<Generation, LlmError> {
    if let Some(err) = response.error {
        return Err(LlmError::Communication(format!(
            "Gemini API returned error: {}",
            err.message
        )));
    }

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        warn!("Gemini blocked the prompt: {}", reason);
        return Ok(Generation::empty());
    }

    let Some(first) = response.candidates.and_then(|c| c.into_iter().next()) else {
        warn!("Gemini returned no candidates");
        return Ok(Generation::empty());
    };

    let text: String = first
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = first.finish_reason.as_deref().unwrap_or("UNKNOWN");
        warn!("Gemini candidate has no text. Finish reason: {}", reason);
        return Ok(Generation::empty());
    }

    Ok(Generation::new(text))
}

#[async_trait]
impl LanguageModel for GeminiProvider {
    type Error = LlmError;

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, Self::Error> {
        let model = self.model_for(request);
        let url = format!("{}/v1beta/models/{}:generateContent", self.endpoint, model);
        let body = build_request_body(request);

        debug!(model, prompt_chars = request.prompt.len(), "Sending Gemini request");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = resp.status();
        let response_text = resp
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read body: {}", e)))?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(model.to_string()));
        }
        if !status.is_success() {
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, response_text
            )));
        }

        let result: GeminiResponse = serde_json::from_str(&response_text).map_err(|e| {
            LlmError::InvalidResponse(format!(
                "Failed to parse Gemini response: {}. Body: {}",
                e, response_text
            ))
        })?;

        interpret_response(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fourthwall_domain::SafetySettings;

    fn parse(json: &str) -> GeminiResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_body_json_and_relaxed_safety() {
        let request = GenerationRequest::json("gemini-2.0-flash", "Analyze this");
        let body = serde_json::to_value(build_request_body(&request)).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "Analyze this");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");

        let settings = body["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 4);
        assert!(settings.iter().all(|s| s["threshold"] == "BLOCK_NONE"));
        assert!(settings
            .iter()
            .any(|s| s["category"] == "HARM_CATEGORY_DANGEROUS_CONTENT"));
    }

    #[test]
    fn test_request_body_text_with_default_safety() {
        let request = GenerationRequest {
            model: "m".to_string(),
            prompt: "p".to_string(),
            response_format: ResponseFormat::Text,
            safety: SafetySettings::provider_default(),
        };
        let body = serde_json::to_value(build_request_body(&request)).unwrap();

        assert!(body.get("generationConfig").is_none());
        assert!(body.get("safetySettings").is_none());
    }

    #[test]
    fn test_response_success() {
        let response = parse(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "{\"characters\": "}, {"text": "[]}"}], "role": "model"},
                    "finishReason": "STOP",
                    "index": 0
                }]
            }"#,
        );
        let generation = interpret_response(response).unwrap();
        assert_eq!(generation.text, r#"{"characters": []}"#);
    }

    #[test]
    fn test_response_safety_finish_is_empty() {
        let response = parse(r#"{"candidates": [{"finishReason": "SAFETY", "index": 0}]}"#);
        assert!(interpret_response(response).unwrap().is_empty());
    }

    #[test]
    fn test_response_prompt_block_is_empty() {
        let response = parse(r#"{"promptFeedback": {"blockReason": "OTHER"}}"#);
        assert!(interpret_response(response).unwrap().is_empty());
    }

    #[test]
    fn test_response_parts_missing_is_empty() {
        let response = parse(
            r#"{"candidates": [{"content": {"role": "model"}, "finishReason": "STOP"}]}"#,
        );
        assert!(interpret_response(response).unwrap().is_empty());
    }

    #[test]
    fn test_response_api_error() {
        let response = parse(r#"{"error": {"code": 400, "message": "API key not valid"}}"#);
        let err = interpret_response(response).unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(matches!(
            GeminiProvider::new("  "),
            Err(LlmError::Configuration(_))
        ));
    }

    #[test]
    fn test_model_fallback() {
        let provider = GeminiProvider::new("key")
            .unwrap()
            .with_default_model("gemini-2.5-flash");
        let named = GenerationRequest::json("gemini-2.0-flash", "p");
        let unnamed = GenerationRequest::json("", "p");

        assert_eq!(provider.model_for(&named), "gemini-2.0-flash");
        assert_eq!(provider.model_for(&unnamed), "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_communication_error() {
        let provider = GeminiProvider::with_timeout("key", Duration::from_secs(2))
            .unwrap()
            .with_endpoint("http://127.0.0.1:9");

        let result = provider
            .generate(&GenerationRequest::json("gemini-2.0-flash", "test"))
            .await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
