//! SQLite-backed document store

use crate::{check_name, decode_document, StoreError};
use fourthwall_domain::{Document, DocumentStore};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// SQLite-based implementation of DocumentStore
///
/// Documents are stored as JSON text in a single `documents` table keyed by
/// `(collection, key)`. A `set` is one UPSERT statement, so a document write
/// is atomic.
///
/// # Thread Safety
///
/// The connection sits behind a mutex; concurrent callers are serialized.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fourthwall_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("fourthwall.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn()?.execute_batch(schema)?;
        Ok(())
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

impl DocumentStore for SqliteStore {
    type Error = StoreError;

    fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, Self::Error> {
        check_name("collection", collection)?;
        check_name("key", key)?;

        let body: Option<String> = self
            .conn()?
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
                params![collection, key],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|b| decode_document(&b)).transpose()
    }

    fn set(&self, collection: &str, key: &str, value: Document) -> Result<(), Self::Error> {
        check_name("collection", collection)?;
        check_name("key", key)?;

        let body = serde_json::Value::Object(value).to_string();
        self.conn()?.execute(
            "INSERT INTO documents (collection, key, body, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(collection, key) DO UPDATE SET
             body = excluded.body, updated_at = excluded.updated_at",
            params![collection, key, body, Self::now()],
        )?;

        Ok(())
    }

    fn list(&self, collection: &str) -> Result<Vec<(String, Document)>, Self::Error> {
        check_name("collection", collection)?;

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT key, body FROM documents WHERE collection = ?1 ORDER BY key",
        )?;

        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(key, body)| decode_document(&body).map(|doc| (key, doc)))
            .collect()
    }
}
