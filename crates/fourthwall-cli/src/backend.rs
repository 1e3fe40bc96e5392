//! Provider and store selection.
//!
//! The extractor is generic over its model and store; the CLI picks both at
//! runtime, so each choice is wrapped in an enum that forwards to the
//! selected implementation.

use crate::config::{Config, ProviderKind, StoreKind};
use crate::error::{CliError, Result};
use async_trait::async_trait;
use fourthwall_domain::{
    Document, DocumentStore, Generation, GenerationRequest, LanguageModel, VoiceRoster,
};
use fourthwall_extractor::Extractor;
use fourthwall_llm::{GeminiProvider, LlmError, MockProvider, OllamaProvider};
use fourthwall_store::{FileStore, MemoryStore, SqliteStore, StoreError};
use std::fs;
use std::time::Duration;
use tracing::debug;

/// Environment variable checked when `GEMINI_API_KEY` is unset
pub const FALLBACK_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// The extractor as wired up by the CLI
pub type AppExtractor = Extractor<Model, Store>;

/// The model provider chosen for this run
pub enum Model {
    /// Google Gemini
    Gemini(GeminiProvider),
    /// Local Ollama
    Ollama(OllamaProvider),
    /// Canned responses
    Mock(MockProvider),
}

#[async_trait]
impl LanguageModel for Model {
    type Error = LlmError;

    async fn generate(&self, request: &GenerationRequest) -> std::result::Result<Generation, LlmError> {
        match self {
            Model::Gemini(p) => p.generate(request).await,
            Model::Ollama(p) => p.generate(request).await,
            Model::Mock(p) => p.generate(request).await,
        }
    }
}

/// The document store chosen for this run
pub enum Store {
    /// In-process map
    Memory(MemoryStore),
    /// SQLite file
    Sqlite(SqliteStore),
    /// JSON files
    Files(FileStore),
}

impl DocumentStore for Store {
    type Error = StoreError;

    fn get(&self, collection: &str, key: &str) -> std::result::Result<Option<Document>, StoreError> {
        match self {
            Store::Memory(s) => s.get(collection, key),
            Store::Sqlite(s) => s.get(collection, key),
            Store::Files(s) => s.get(collection, key),
        }
    }

    fn set(&self, collection: &str, key: &str, value: Document) -> std::result::Result<(), StoreError> {
        match self {
            Store::Memory(s) => s.set(collection, key, value),
            Store::Sqlite(s) => s.set(collection, key, value),
            Store::Files(s) => s.set(collection, key, value),
        }
    }

    fn list(&self, collection: &str) -> std::result::Result<Vec<(String, Document)>, StoreError> {
        match self {
            Store::Memory(s) => s.list(collection),
            Store::Sqlite(s) => s.list(collection),
            Store::Files(s) => s.list(collection),
        }
    }
}

/// Open the configured document store.
pub fn open_store(config: &Config) -> Result<Store> {
    let store = match config.store.backend {
        StoreKind::Memory => Store::Memory(MemoryStore::new()),
        StoreKind::Sqlite => {
            let path = config.store_path()?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            debug!(path = %path.display(), "Opening SQLite store");
            Store::Sqlite(SqliteStore::new(&path)?)
        }
        StoreKind::Files => {
            let path = config.store_path()?;
            debug!(path = %path.display(), "Opening file store");
            Store::Files(FileStore::new(&path)?)
        }
    };
    Ok(store)
}

/// Build the configured model provider.
///
/// `api_key` comes from the command line or `GEMINI_API_KEY`; the config
/// file and `GOOGLE_API_KEY` are consulted after it.
pub fn build_model(config: &Config, api_key: Option<String>, roster: &VoiceRoster) -> Result<Model> {
    let llm = &config.llm;
    let timeout = Duration::from_secs(llm.request_timeout_secs);

    let model = match llm.provider {
        ProviderKind::Gemini => {
            let key = api_key
                .or_else(|| std::env::var(FALLBACK_API_KEY_ENV).ok())
                .or_else(|| llm.api_key.clone())
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| {
                    CliError::Config(
                        "No Gemini API key. Set GEMINI_API_KEY or pass --api-key".to_string(),
                    )
                })?;

            let mut provider = GeminiProvider::with_timeout(key, timeout)?
                .with_default_model(config.extractor.model_id.clone());
            if let Some(endpoint) = &llm.endpoint {
                provider = provider.with_endpoint(endpoint.clone());
            }
            Model::Gemini(provider)
        }
        ProviderKind::Ollama => {
            let endpoint = llm
                .endpoint
                .clone()
                .unwrap_or_else(|| fourthwall_llm::ollama::DEFAULT_ENDPOINT.to_string());
            Model::Ollama(OllamaProvider::with_timeout(
                endpoint,
                config.extractor.model_id.clone(),
                timeout,
            )?)
        }
        ProviderKind::Mock => {
            let response = llm
                .mock_response
                .clone()
                .unwrap_or_else(|| demo_response(roster));
            Model::Mock(MockProvider::new(response))
        }
    };
    Ok(model)
}

/// A one-character reply voiced by the first roster entry.
fn demo_response(roster: &VoiceRoster) -> String {
    let voice = roster.iter().next().map(|v| v.id.as_str()).unwrap_or_default();
    serde_json::json!({
        "book_title": "Untitled",
        "characters": [{
            "name": "Narrator",
            "description": "Offline placeholder produced by the mock provider",
            "system_prompt": "You are the narrator. You speak plainly.",
            "assigned_voice_id": voice,
        }]
    })
    .to_string()
}
