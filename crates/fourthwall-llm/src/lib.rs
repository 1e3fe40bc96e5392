//! Fourth Wall LLM Provider Layer
//!
//! Pluggable implementations of the `LanguageModel` trait from
//! `fourthwall-domain`.
//!
//! # Providers
//!
//! - `GeminiProvider`: Google Generative Language API (`generateContent`)
//! - `OllamaProvider`: Local Ollama API integration
//! - `MockProvider`: Scripted responses for testing
//!
//! Providers make exactly one request per `generate` call. Retrying is the
//! caller's decision.
//!
//! # Examples
//!
//! ```
//! use fourthwall_domain::{GenerationRequest, LanguageModel};
//! use fourthwall_llm::MockProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let request = GenerationRequest::json("mock", "test prompt");
//! let result = provider.generate(&request).await.unwrap();
//! assert_eq!(result.text, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod gemini;
pub mod ollama;

use async_trait::async_trait;
use fourthwall_domain::{Generation, GenerationRequest, LanguageModel};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

/// Default timeout for LLM requests (seconds)
///
/// Extraction prompts carry a large text sample, so this is generous.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider could not be constructed
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// One scripted reply
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(String),
}

/// Mock LLM provider for deterministic testing
///
/// Replies are taken from a queue in order; once the queue is drained every
/// call gets the fallback reply. Clones share the queue, the call counter and
/// the prompt log, so a clone handed to an extractor can be inspected from
/// the test afterwards.
///
/// # Examples
///
/// ```
/// use fourthwall_llm::MockProvider;
///
/// let provider = MockProvider::new("{}");
/// provider.push_response("first");
/// provider.push_error("network down");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    fallback: MockReply,
    script: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_fallback(MockReply::Text(response.into()))
    }

    /// A provider that fails every call
    ///
    /// Useful to prove a code path never reaches the model.
    pub fn failing() -> Self {
        Self::with_fallback(MockReply::Error(
            "MockProvider::failing() was called".to_string(),
        ))
    }

    /// A provider that answers every call with empty text (a safety block)
    pub fn blocked() -> Self {
        Self::new("")
    }

    fn with_fallback(fallback: MockReply) -> Self {
        Self {
            fallback,
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response for the next unanswered call
    pub fn push_response(&self, response: impl Into<String>) -> &Self {
        lock(&self.script).push_back(MockReply::Text(response.into()));
        self
    }

    /// Queue a transport-style error for the next unanswered call
    pub fn push_error(&self, message: impl Into<String>) -> &Self {
        lock(&self.script).push_back(MockReply::Error(message.into()));
        self
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Every request seen so far, in call order
    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        lock(&self.requests).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl LanguageModel for MockProvider {
    type Error = LlmError;

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, Self::Error> {
        lock(&self.requests).push(request.clone());

        let reply = lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            MockReply::Text(text) => Ok(Generation::new(text)),
            MockReply::Error(message) => Err(LlmError::Communication(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest::json("mock", prompt)
    }

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate(&request("any prompt")).await;
        assert_eq!(result.unwrap().text, "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_script_then_fallback() {
        let provider = MockProvider::new("fallback");
        provider.push_response("one").push_response("two");

        assert_eq!(provider.generate(&request("a")).await.unwrap().text, "one");
        assert_eq!(provider.generate(&request("b")).await.unwrap().text, "two");
        assert_eq!(provider.generate(&request("c")).await.unwrap().text, "fallback");
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate(&request("prompt1")).await.unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.generate(&request("prompt2")).await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.requests()[1].prompt, "prompt2");

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let provider = MockProvider::default();
        provider.push_error("bad prompt");

        let result = provider.generate(&request("x")).await;
        assert!(matches!(result.unwrap_err(), LlmError::Communication(_)));
    }

    #[tokio::test]
    async fn test_failing_and_blocked() {
        assert!(MockProvider::failing().generate(&request("x")).await.is_err());
        assert!(MockProvider::blocked()
            .generate(&request("x"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate(&request("test")).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
