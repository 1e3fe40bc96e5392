//! Book identifiers and the cached per-book record

use crate::character::Character;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized key under which a book's characters are cached
///
/// Derived from an upload filename: directory components and the file
/// extension are dropped, so `data/books/emma.txt` and `emma.txt` share the
/// key `emma`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Normalize a filename (or an already-normalized id) into a BookId
    ///
    /// # Errors
    /// Returns error if nothing is left after normalization
    ///
    /// # Examples
    ///
    /// ```
    /// use fourthwall_domain::BookId;
    ///
    /// let id = BookId::from_filename("data/books/pride_and_prejudice.txt").unwrap();
    /// assert_eq!(id.as_str(), "pride_and_prejudice");
    /// ```
    pub fn from_filename(raw: &str) -> Result<Self, String> {
        let name = raw
            .trim()
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();

        // A leading dot is a hidden file, not an extension
        let stem = match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        };

        let stem = stem.trim();
        if stem.is_empty() || stem.chars().all(|c| c == '.') {
            return Err(format!("Book identifier '{}' is empty after normalization", raw));
        }

        Ok(Self(stem.to_string()))
    }

    /// Accept an already-normalized key verbatim
    ///
    /// Unlike [`BookId::from_filename`] nothing after a dot is dropped, so
    /// `"mr.smith"` stays `"mr.smith"`. Used for keys read back from a store.
    ///
    /// # Errors
    /// Returns error if the key is blank, all dots, or holds a path separator
    pub fn from_key(key: &str) -> Result<Self, String> {
        let key = key.trim();
        if key.is_empty() || key.chars().all(|c| c == '.') || key.contains(['/', '\\']) {
            return Err(format!("'{}' is not a valid book key", key));
        }
        Ok(Self(key.to_string()))
    }

    /// Normalize and append a time-ordered uniqueness token
    ///
    /// Two uploads of `emma.txt` get distinct keys (`emma_<uuidv7>`), and
    /// keys of the same stem sort by upload time.
    pub fn unique(raw: &str) -> Result<Self, String> {
        let base = Self::from_filename(raw)?;
        Ok(Self(format!("{}_{}", base.0, uuid::Uuid::now_v7().simple())))
    }

    /// Get the identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for BookId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_filename(s)
    }
}

/// The cached result of one successful extraction
///
/// Created on the first successful extraction of a book and replaced
/// wholesale by any later one; never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Key of the record
    pub book_id: BookId,

    /// Title the model detected, if it reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_title: Option<String>,

    /// Extracted characters, in the order the model listed them
    pub characters: Vec<Character>,
}

impl BookRecord {
    /// Create a new record
    pub fn new(book_id: BookId, book_title: Option<String>, characters: Vec<Character>) -> Self {
        Self {
            book_id,
            book_title,
            characters,
        }
    }

    /// Find a character by name (case-insensitive)
    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_extension_and_directories() {
        assert_eq!(BookId::from_filename("emma.txt").unwrap().as_str(), "emma");
        assert_eq!(BookId::from_filename("data/books/emma.txt").unwrap().as_str(), "emma");
        assert_eq!(BookId::from_filename("C:\\books\\emma.txt").unwrap().as_str(), "emma");
        assert_eq!(BookId::from_filename("  emma.txt ").unwrap().as_str(), "emma");
    }

    #[test]
    fn test_only_last_extension_is_stripped() {
        assert_eq!(BookId::from_filename("archive.tar.gz").unwrap().as_str(), "archive.tar");
    }

    #[test]
    fn test_already_normalized_id_is_unchanged() {
        assert_eq!(BookId::from_filename("emma").unwrap().as_str(), "emma");
    }

    #[test]
    fn test_hidden_file_keeps_name() {
        assert_eq!(BookId::from_filename(".emma").unwrap().as_str(), ".emma");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(BookId::from_filename("").is_err());
        assert!(BookId::from_filename("   ").is_err());
        assert!(BookId::from_filename("books/").is_err());
        assert!(BookId::from_filename("..").is_err());
    }

    #[test]
    fn test_from_key_keeps_dots() {
        assert_eq!(BookId::from_key("mr.smith").unwrap().as_str(), "mr.smith");
        assert!(BookId::from_key("a/b").is_err());
        assert!(BookId::from_key(" ").is_err());
    }

    #[test]
    fn test_unique_ids_differ_and_keep_stem() {
        let a = BookId::unique("emma.txt").unwrap();
        let b = BookId::unique("emma.txt").unwrap();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("emma_"));
        // uuid simple format: 32 hex digits
        assert_eq!(a.as_str().len(), "emma_".len() + 32);
    }

    #[test]
    fn test_record_serializes_without_missing_title() {
        let record = BookRecord::new(
            BookId::from_filename("emma").unwrap(),
            None,
            vec![Character::new("Emma Woodhouse", "Heroine", "You are Emma.", "v1")],
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["book_id"], "emma");
        assert!(json.get("book_title").is_none());
        assert_eq!(json["characters"][0]["assigned_voice_id"], "v1");
    }

    #[test]
    fn test_character_lookup_by_name() {
        let record = BookRecord::new(
            BookId::from_filename("emma").unwrap(),
            Some("Emma".to_string()),
            vec![Character::new("Mr. Knightley", "Neighbour", "You are Knightley.", "v2")],
        );
        assert!(record.character("mr. knightley").is_some());
        assert!(record.character("Harriet").is_none());
    }
}
