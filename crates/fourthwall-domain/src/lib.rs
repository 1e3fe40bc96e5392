//! Fourth Wall Domain Layer
//!
//! This crate contains the data model for character extraction and the trait
//! interfaces that the infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Voice roster**: the fixed catalog of synthesizable voices
//! - **Character**: a named fictional character bound to one roster voice
//! - **Book identifier**: normalized filename stem used as the cache key
//! - **Book record**: the cached character list for one book
//!
//! ## Architecture
//!
//! - Pure data and validation only; no I/O
//! - `LanguageModel` and `DocumentStore` describe the two collaborators of the
//!   extraction engine; implementations live in `fourthwall-llm` and
//!   `fourthwall-store`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod book;
pub mod character;
pub mod traits;
pub mod voice;

// Re-exports for convenience
pub use book::{BookId, BookRecord};
pub use character::Character;
pub use traits::{
    Document, DocumentStore, Generation, GenerationRequest, LanguageModel, ResponseFormat,
    SafetySettings,
};
pub use voice::{VoiceProfile, VoiceRoster};
