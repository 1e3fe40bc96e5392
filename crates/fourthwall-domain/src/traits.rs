//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A stored document: a JSON object
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Trait for a flat key -> document store
///
/// Implemented by the infrastructure layer (fourthwall-store).
/// A single `set` is treated as atomic; there are no transactions and no
/// queries beyond point lookup and a full-collection listing.
pub trait DocumentStore: Send + Sync {
    /// Error type for store operations
    type Error;

    /// Read one document; `Ok(None)` if the key is absent
    fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, Self::Error>;

    /// Write or overwrite one document
    fn set(&self, collection: &str, key: &str, value: Document) -> Result<(), Self::Error>;

    /// Every document in a collection, with its key
    fn list(&self, collection: &str) -> Result<Vec<(String, Document)>, Self::Error>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    type Error = T::Error;

    fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, Self::Error> {
        (**self).get(collection, key)
    }

    fn set(&self, collection: &str, key: &str, value: Document) -> Result<(), Self::Error> {
        (**self).set(collection, key, value)
    }

    fn list(&self, collection: &str) -> Result<Vec<(String, Document)>, Self::Error> {
        (**self).list(collection)
    }
}

/// Output format requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Free text
    #[default]
    Text,
    /// JSON-typed output
    Json,
}

/// Harm categories a provider may filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmCategory {
    /// Hate speech
    HateSpeech,
    /// Harassment
    Harassment,
    /// Sexually explicit content
    SexuallyExplicit,
    /// Dangerous content
    DangerousContent,
}

impl HarmCategory {
    /// All categories, in a stable order
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::HateSpeech,
        HarmCategory::Harassment,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];
}

/// How aggressively a category is filtered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockThreshold {
    /// Never block
    BlockNone,
    /// Provider default
    ProviderDefault,
}

/// Safety configuration sent with a generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySettings {
    /// Per-category thresholds; categories not listed use the provider default
    pub thresholds: Vec<(HarmCategory, BlockThreshold)>,
}

impl SafetySettings {
    /// All categories relaxed to `BlockNone`
    ///
    /// Fiction routinely carries violence and rough language; with default
    /// filtering a large share of novels come back blocked.
    pub fn relaxed() -> Self {
        Self {
            thresholds: HarmCategory::ALL
                .iter()
                .map(|c| (*c, BlockThreshold::BlockNone))
                .collect(),
        }
    }

    /// Leave every category at the provider default
    pub fn provider_default() -> Self {
        Self { thresholds: Vec::new() }
    }

    /// Whether every category is relaxed
    pub fn is_relaxed(&self) -> bool {
        HarmCategory::ALL.iter().all(|c| {
            self.thresholds
                .iter()
                .any(|(cat, t)| cat == c && *t == BlockThreshold::BlockNone)
        })
    }
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self::provider_default()
    }
}

/// A single model invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Provider model id, e.g. "gemini-2.0-flash"
    pub model: String,

    /// Full prompt text
    pub prompt: String,

    /// Requested output format
    pub response_format: ResponseFormat,

    /// Safety filtering configuration
    pub safety: SafetySettings,
}

impl GenerationRequest {
    /// A JSON request with relaxed safety filtering
    pub fn json(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            response_format: ResponseFormat::Json,
            safety: SafetySettings::relaxed(),
        }
    }
}

/// What a model returned
///
/// An empty `text` means the provider produced no content, which callers
/// treat as a safety block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Generation {
    /// Generated text (possibly empty)
    pub text: String,
}

impl Generation {
    /// Wrap generated text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// No content (blocked or empty candidate)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether there is no usable text
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Trait for language model operations
///
/// Implemented by the infrastructure layer (fourthwall-llm)
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Error type for LLM operations
    type Error;

    /// Run one generation
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, Self::Error>;
}
