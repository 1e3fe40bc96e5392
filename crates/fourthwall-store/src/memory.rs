//! In-memory document store

use crate::{check_name, StoreError};
use fourthwall_domain::{Document, DocumentStore};
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local `DocumentStore`
///
/// Nothing survives the process. Used by tests and by the CLI's `memory`
/// backend for dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<(String, String), Document>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of documents across all collections
    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryStore {
    type Error = StoreError;

    fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, Self::Error> {
        check_name("collection", collection)?;
        check_name("key", key)?;

        let docs = self
            .documents
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(docs.get(&(collection.to_string(), key.to_string())).cloned())
    }

    fn set(&self, collection: &str, key: &str, value: Document) -> Result<(), Self::Error> {
        check_name("collection", collection)?;
        check_name("key", key)?;

        let mut docs = self
            .documents
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        docs.insert((collection.to_string(), key.to_string()), value);
        Ok(())
    }

    fn list(&self, collection: &str) -> Result<Vec<(String, Document)>, Self::Error> {
        check_name("collection", collection)?;

        let docs = self
            .documents
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        let mut entries: Vec<_> = docs
            .iter()
            .filter(|((c, _), _)| c == collection)
            .map(|((_, k), v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}
