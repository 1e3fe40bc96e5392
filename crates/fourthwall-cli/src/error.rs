//! Error types for the CLI application.

use fourthwall_extractor::ExtractionError;
use fourthwall_llm::LlmError;
use fourthwall_store::StoreError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction pipeline error
    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    /// Model provider could not be set up
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Document store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No cached record for the requested book
    #[error("Book not found: {0}")]
    BookNotFound(String),
}
