//! JSON-file document store
//!
//! Layout: `<root>/<collection>/<key>.json`, one pretty-printed document per
//! file. Writes go to a sibling temp file that is renamed into place, so a
//! reader never sees a half-written document.

use crate::{check_name, decode_document, StoreError};
use fourthwall_domain::{Document, DocumentStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

const EXTENSION: &str = "json";

/// Directory-backed implementation of DocumentStore
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn document_path(&self, collection: &str, key: &str) -> PathBuf {
        self.root
            .join(collection)
            .join(format!("{}.{}", key, EXTENSION))
    }
}

impl DocumentStore for FileStore {
    type Error = StoreError;

    fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, Self::Error> {
        check_name("collection", collection)?;
        check_name("key", key)?;

        match fs::read_to_string(self.document_path(collection, key)) {
            Ok(body) => decode_document(&body).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, collection: &str, key: &str, value: Document) -> Result<(), Self::Error> {
        check_name("collection", collection)?;
        check_name("key", key)?;

        let path = self.document_path(collection, key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let body = serde_json::to_string_pretty(&serde_json::Value::Object(value))
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;

        let tmp = path.with_extension(format!("{}.tmp", EXTENSION));
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Lists every `*.json` file in the collection directory
    ///
    /// Files that do not hold a JSON object are skipped with a warning rather
    /// than failing the whole listing.
    fn list(&self, collection: &str) -> Result<Vec<(String, Document)>, Self::Error> {
        check_name("collection", collection)?;

        let dir = self.root.join(collection);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut documents = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let body = fs::read_to_string(&path)?;
            match decode_document(&body) {
                Ok(doc) => documents.push((key.to_string(), doc)),
                Err(e) => warn!(path = %path.display(), "Skipping unreadable document: {}", e),
            }
        }

        documents.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.set("books", "emma", doc(json!({"book_id": "emma"}))).unwrap();

        assert!(dir.path().join("books").join("emma.json").exists());
        let got = store.get("books", "emma").unwrap().unwrap();
        assert_eq!(got["book_id"], "emma");
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store.set("books", "emma", doc(json!({}))).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path().join("books"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["emma.json"]);
    }

    #[test]
    fn test_missing_collection_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(store.list("books").unwrap().is_empty());
        assert!(store.get("books", "emma").unwrap().is_none());
    }

    #[test]
    fn test_list_skips_stray_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store.set("books", "emma", doc(json!({"v": 1}))).unwrap();

        fs::write(dir.path().join("books").join("notes.txt"), "hello").unwrap();
        fs::write(dir.path().join("books").join("broken.json"), "{").unwrap();

        let listed = store.list("books").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, "emma");
    }
}
