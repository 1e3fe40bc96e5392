//! Fourth Wall Storage Layer
//!
//! Implements the `DocumentStore` trait over three backends:
//!
//! - [`MemoryStore`]: process-local map, for tests and one-shot runs
//! - [`SqliteStore`]: SQLite table of JSON bodies keyed by (collection, key)
//! - [`FileStore`]: one pretty-printed JSON file per document on disk
//!
//! # Examples
//!
//! ```no_run
//! use fourthwall_domain::DocumentStore;
//! use fourthwall_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! assert!(store.get("books", "emma").unwrap().is_none());
//! ```

#![warn(missing_docs)]

mod files;
mod memory;
mod sqlite;

pub use files::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use fourthwall_domain::Document;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored body is not a JSON object
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Collection or key cannot be used as a storage name
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A lock guarding the backend was poisoned
    #[error("Store lock error: {0}")]
    Lock(String),
}

/// Reject names that would escape a directory or collide with one
pub(crate) fn check_name(kind: &str, name: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::InvalidKey(format!("{} cannot be empty", kind)));
    }
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(StoreError::InvalidKey(format!("{} '{}' is not a plain name", kind, name)));
    }
    Ok(())
}

/// Decode a stored JSON body into a document
pub(crate) fn decode_document(body: &str) -> Result<Document, StoreError> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::InvalidData(format!(
            "Expected a JSON object, found {}",
            json_type_name(&other)
        ))),
        Err(e) => Err(StoreError::InvalidData(format!("JSON parse error: {}", e))),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_name() {
        assert!(check_name("key", "emma").is_ok());
        assert!(check_name("key", "emma_0192").is_ok());
        assert!(check_name("key", "").is_err());
        assert!(check_name("key", "..").is_err());
        assert!(check_name("key", "a/b").is_err());
        assert!(check_name("key", "a\\b").is_err());
    }

    #[test]
    fn test_decode_document() {
        let doc = decode_document(r#"{"book_id": "emma"}"#).unwrap();
        assert_eq!(doc["book_id"], "emma");

        assert!(matches!(decode_document("[1, 2]"), Err(StoreError::InvalidData(_))));
        assert!(matches!(decode_document("not json"), Err(StoreError::InvalidData(_))));
    }
}
