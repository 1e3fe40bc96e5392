//! Fourth Wall Extractor
//!
//! Turns book text into a cached list of characters, each bound to a voice
//! from a fixed roster.
//!
//! # Architecture
//!
//! ```text
//! caller → CacheGateway (read) ─hit─→ caller
//!                 │ miss
//!                 ▼
//!          PromptBuilder → LanguageModel ⟲ retry/backoff → parser → validation
//!                                                                   │
//! caller ←──────────────── CacheGateway (write) ←───────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Cache first**: a stored record is returned without calling the model
//! - **Bounded retries**: unparseable or empty responses are retried with
//!   exponential backoff; a safety block or a transport fault is not
//! - **Voice validation**: every stored voice id is a roster id
//! - **Single-flight**: concurrent requests for one book share one model call
//!
//! # Example Usage
//!
//! ```no_run
//! use fourthwall_domain::VoiceRoster;
//! use fourthwall_extractor::{Extractor, ExtractorConfig};
//! use fourthwall_llm::MockProvider;
//! use fourthwall_store::MemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"book_title": "Emma", "characters": []}"#);
//! let extractor = Extractor::new(
//!     llm,
//!     MemoryStore::new(),
//!     VoiceRoster::default(),
//!     ExtractorConfig::default(),
//! );
//!
//! let record = extractor.extract("emma.txt", "Emma Woodhouse, handsome...").await?;
//! for character in &record.characters {
//!     println!("{} -> {}", character.name, character.assigned_voice_id);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod flight;
mod gateway;
mod parser;
mod prompt;
mod retry;
mod types;


pub use config::{ExtractorConfig, DEFAULT_MODEL_ID};
pub use error::{ErrorKind, ExtractionError};
pub use extractor::Extractor;
pub use gateway::{CacheGateway, BOOKS_COLLECTION};
pub use parser::strip_code_fence;
pub use prompt::PromptBuilder;
pub use retry::RetryPolicy;
pub use types::ExtractionOutcome;
