//! Error types for the Extractor

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The model returned no content (provider safety filter)
    #[error("Content blocked by safety filters")]
    SafetyBlocked,

    /// Every attempt produced unparseable output or no characters
    #[error("Failed to get a valid response after {attempts} attempts: {reason}")]
    MalformedOrEmptyResponse {
        /// Attempts made before giving up
        attempts: u32,
        /// Why the last attempt was rejected
        reason: String,
    },

    /// The model call itself failed (network, HTTP status, decoding)
    #[error("Model call failed: {0}")]
    TransportFault(String),

    /// Document store read or write failed
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Book identifier is empty after normalization
    #[error("Invalid book id: {0}")]
    InvalidBookId(String),

    /// Uncached book with no text to sample
    #[error("Book text is empty: {0}")]
    EmptyText(String),
}

impl ExtractionError {
    /// Machine-readable category of the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::SafetyBlocked => ErrorKind::SafetyBlocked,
            ExtractionError::MalformedOrEmptyResponse { .. } => {
                ErrorKind::MalformedOrEmptyResponse
            }
            ExtractionError::TransportFault(_) => ErrorKind::TransportFault,
            ExtractionError::CacheUnavailable(_) => ErrorKind::CacheUnavailable,
            ExtractionError::InvalidBookId(_) => ErrorKind::InvalidBookId,
            ExtractionError::EmptyText(_) => ErrorKind::EmptyText,
        }
    }
}

/// Tag for an [`ExtractionError`], serialized in snake_case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`ExtractionError::SafetyBlocked`]
    SafetyBlocked,
    /// See [`ExtractionError::MalformedOrEmptyResponse`]
    MalformedOrEmptyResponse,
    /// See [`ExtractionError::TransportFault`]
    TransportFault,
    /// See [`ExtractionError::CacheUnavailable`]
    CacheUnavailable,
    /// See [`ExtractionError::InvalidBookId`]
    InvalidBookId,
    /// See [`ExtractionError::EmptyText`]
    EmptyText,
}

impl ErrorKind {
    /// The snake_case tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SafetyBlocked => "safety_blocked",
            ErrorKind::MalformedOrEmptyResponse => "malformed_or_empty_response",
            ErrorKind::TransportFault => "transport_fault",
            ErrorKind::CacheUnavailable => "cache_unavailable",
            ErrorKind::InvalidBookId => "invalid_book_id",
            ErrorKind::EmptyText => "empty_text",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
