//! Cache Gateway: the only path between the extractor and the document store

use crate::error::ExtractionError;
use fourthwall_domain::{BookId, BookRecord, Character, Document, DocumentStore};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;
use tracing::{debug, warn};

/// Collection holding one document per book
pub const BOOKS_COLLECTION: &str = "books";

/// Stored shape of a book document
///
/// A stored `book_id` field is ignored: the record is always keyed by the
/// store key it was read from.
#[derive(Deserialize)]
struct StoredBook {
    #[serde(default)]
    book_title: Option<String>,
    #[serde(default)]
    characters: Vec<Character>,
}

impl StoredBook {
    fn decode(doc: Document) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(doc))
    }

    fn into_record(self, book_id: BookId) -> BookRecord {
        BookRecord::new(book_id, self.book_title, self.characters)
    }
}

/// Reads and writes book records in a [`DocumentStore`]
pub struct CacheGateway<S> {
    store: S,
}

impl<S> CacheGateway<S>
where
    S: DocumentStore,
    S::Error: Display,
{
    /// Wrap a document store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store
    pub fn document_store(&self) -> &S {
        &self.store
    }

    /// Cached record for a book, if one is usable
    ///
    /// A missing document, a document without characters, and a document
    /// that does not decode are all misses.
    ///
    /// # Errors
    /// Returns `CacheUnavailable` if the store read fails
    pub fn lookup(&self, book_id: &BookId) -> Result<Option<BookRecord>, ExtractionError> {
        let doc = self
            .store
            .get(BOOKS_COLLECTION, book_id.as_str())
            .map_err(|e| ExtractionError::CacheUnavailable(e.to_string()))?;

        let Some(doc) = doc else {
            debug!(book_id = %book_id, "Cache miss");
            return Ok(None);
        };

        let stored = match StoredBook::decode(doc) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(book_id = %book_id, "Ignoring corrupt cached document: {}", e);
                return Ok(None);
            }
        };

        if stored.characters.is_empty() {
            debug!(book_id = %book_id, "Cached document has no characters");
            return Ok(None);
        }

        debug!(book_id = %book_id, characters = stored.characters.len(), "Cache hit");
        Ok(Some(stored.into_record(book_id.clone())))
    }

    /// Write or overwrite the record for a book
    ///
    /// # Errors
    /// Returns `MalformedOrEmptyResponse` for an empty character list (nothing
    /// is written) and `CacheUnavailable` if the store write fails
    pub fn store(
        &self,
        book_id: &BookId,
        book_title: Option<String>,
        characters: Vec<Character>,
    ) -> Result<BookRecord, ExtractionError> {
        if characters.is_empty() {
            return Err(ExtractionError::MalformedOrEmptyResponse {
                attempts: 0,
                reason: "Refusing to cache an empty character list".to_string(),
            });
        }

        let record = BookRecord::new(book_id.clone(), book_title, characters);
        let doc = match serde_json::to_value(&record) {
            Ok(Value::Object(doc)) => doc,
            Ok(_) => {
                return Err(ExtractionError::CacheUnavailable(
                    "Book record did not serialize to an object".to_string(),
                ))
            }
            Err(e) => return Err(ExtractionError::CacheUnavailable(e.to_string())),
        };

        self.store
            .set(BOOKS_COLLECTION, book_id.as_str(), doc)
            .map_err(|e| ExtractionError::CacheUnavailable(e.to_string()))?;

        debug!(book_id = %book_id, characters = record.characters.len(), "Cached book record");
        Ok(record)
    }

    /// Every usable cached record, sorted by book id
    ///
    /// Documents that do not decode or have no characters are skipped.
    ///
    /// # Errors
    /// Returns `CacheUnavailable` if the store listing fails
    pub fn list_books(&self) -> Result<Vec<BookRecord>, ExtractionError> {
        let docs = self
            .store
            .list(BOOKS_COLLECTION)
            .map_err(|e| ExtractionError::CacheUnavailable(e.to_string()))?;

        let mut records: Vec<BookRecord> = docs
            .into_iter()
            .filter_map(|(key, doc)| {
                let book_id = BookId::from_key(&key).ok()?;
                match StoredBook::decode(doc) {
                    Ok(stored) if !stored.characters.is_empty() => {
                        Some(stored.into_record(book_id))
                    }
                    Ok(_) => None,
                    Err(e) => {
                        warn!(key = %key, "Skipping corrupt cached document: {}", e);
                        None
                    }
                }
            })
            .collect();

        records.sort_by(|a, b| a.book_id.cmp(&b.book_id));
        Ok(records)
    }
}
