//! Request outcome types for extraction

use crate::error::{ErrorKind, ExtractionError};
use fourthwall_domain::BookRecord;
use serde::Serialize;
use serde_json::Value;

/// Uniform result of [`Extractor::run`](crate::Extractor::run)
///
/// Serializes as the book record on success and as
/// `{"error": "...", "kind": "..."}` on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtractionOutcome {
    /// Characters extracted or served from cache
    Success(BookRecord),

    /// Extraction failed; nothing was persisted
    Failed {
        /// Human-readable message
        error: String,
        /// Machine-readable category
        kind: ErrorKind,
    },
}

impl ExtractionOutcome {
    /// Whether the outcome carries a record
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Success(_))
    }

    /// The record, if any
    pub fn record(&self) -> Option<&BookRecord> {
        match self {
            ExtractionOutcome::Success(record) => Some(record),
            ExtractionOutcome::Failed { .. } => None,
        }
    }

    /// The error kind, if any
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ExtractionOutcome::Success(_) => None,
            ExtractionOutcome::Failed { kind, .. } => Some(*kind),
        }
    }
}

impl From<Result<BookRecord, ExtractionError>> for ExtractionOutcome {
    fn from(result: Result<BookRecord, ExtractionError>) -> Self {
        match result {
            Ok(record) => ExtractionOutcome::Success(record),
            Err(e) => ExtractionOutcome::Failed {
                error: e.to_string(),
                kind: e.kind(),
            },
        }
    }
}

/// Model output after parsing, before character validation
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawResponse {
    pub book_title: Option<String>,
    pub characters: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fourthwall_domain::{BookId, Character};
    use serde_json::json;

    #[test]
    fn test_success_serializes_as_record() {
        let record = BookRecord::new(
            BookId::from_filename("emma.txt").unwrap(),
            Some("Emma".to_string()),
            vec![Character::new("Emma Woodhouse", "", "", "rfkTsdZrVWEVhDycUYn9")],
        );
        let outcome = ExtractionOutcome::from(Ok(record));

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["book_id"], "emma");
        assert_eq!(value["characters"][0]["name"], "Emma Woodhouse");
        assert!(outcome.is_success());
    }

    #[test]
    fn test_failure_serializes_as_error_object() {
        let outcome = ExtractionOutcome::from(Err(ExtractionError::SafetyBlocked));

        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": "Content blocked by safety filters", "kind": "safety_blocked"})
        );
        assert_eq!(outcome.kind(), Some(ErrorKind::SafetyBlocked));
        assert!(outcome.record().is_none());
    }
}
