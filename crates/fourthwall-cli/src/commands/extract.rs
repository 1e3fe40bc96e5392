//! Extract command implementation.

use crate::backend::AppExtractor;
use crate::cli::ExtractArgs;
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use fourthwall_domain::BookId;
use fourthwall_extractor::ExtractionOutcome;
use std::fs;

/// Execute the extract command.
pub async fn execute_extract(
    args: ExtractArgs,
    extractor: &AppExtractor,
    formatter: &Formatter,
) -> Result<()> {
    let text = fs::read_to_string(&args.file)?;
    let book_id = resolve_book_id(&args)?;

    let result = extractor.extract_book(&book_id, &text).await;

    // JSON callers get the uniform error object on stdout as well
    if formatter.format() == OutputFormat::Json {
        if let Err(e) = &result {
            let outcome = ExtractionOutcome::from(Err(e.clone()));
            println!("{}", formatter.format_outcome(&outcome)?);
        }
    }

    let record = result?;
    println!("{}", formatter.format_record(&record, extractor.roster())?);
    if formatter.format() == OutputFormat::Table {
        println!(
            "{}",
            formatter.success(&format!(
                "{} character(s) cached as {}",
                record.characters.len(),
                record.book_id
            ))
        );
    }
    Ok(())
}

/// The cache key for this upload: `--book-id` or the file name, optionally
/// made unique.
pub(crate) fn resolve_book_id(args: &ExtractArgs) -> Result<BookId> {
    let raw = match &args.book_id {
        Some(id) => id.clone(),
        None => args.file.to_string_lossy().into_owned(),
    };

    let id = if args.unique {
        BookId::unique(&raw)
    } else {
        BookId::from_filename(&raw)
    };
    id.map_err(CliError::InvalidInput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Model, Store};
    use fourthwall_domain::VoiceRoster;
    use fourthwall_extractor::{ExtractorConfig, Extractor};
    use fourthwall_llm::MockProvider;
    use fourthwall_store::MemoryStore;
    use std::path::PathBuf;

    const REPLY: &str = r#"{"book_title": "Emma", "characters": [
        {"name": "Emma Woodhouse", "description": "Clever", "system_prompt": "You are Emma.", "assigned_voice_id": "Female Voice 1"}
    ]}"#;

    fn args(file: PathBuf) -> ExtractArgs {
        ExtractArgs {
            file,
            book_id: None,
            unique: false,
        }
    }

    fn extractor(mock: MockProvider) -> AppExtractor {
        Extractor::new(
            Model::Mock(mock),
            Store::Memory(MemoryStore::new()),
            VoiceRoster::default(),
            ExtractorConfig::default(),
        )
    }

    #[test]
    fn test_book_id_from_file_name() {
        let id = resolve_book_id(&args(PathBuf::from("library/emma.txt"))).unwrap();
        assert_eq!(id.as_str(), "emma");
    }

    #[test]
    fn test_book_id_override_and_unique() {
        let mut a = args(PathBuf::from("library/emma.txt"));
        a.book_id = Some("jane".to_string());
        a.unique = true;

        let id = resolve_book_id(&a).unwrap();
        assert!(id.as_str().starts_with("jane_"));
        assert_ne!(resolve_book_id(&a).unwrap(), id);
    }

    #[test]
    fn test_blank_book_id_rejected() {
        let mut a = args(PathBuf::from("emma.txt"));
        a.book_id = Some("  ".to_string());
        assert!(matches!(resolve_book_id(&a), Err(CliError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_extract_persists_record() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("emma.txt");
        fs::write(&file, "Emma Woodhouse, handsome, clever, and rich...").unwrap();

        let mock = MockProvider::new(REPLY);
        let extractor = extractor(mock.clone());
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        execute_extract(args(file), &extractor, &formatter).await.unwrap();

        let record = extractor
            .gateway()
            .lookup(&BookId::from_filename("emma").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(record.book_title.as_deref(), Some("Emma"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_file_is_rejected_before_model_call() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("emma.txt");
        fs::write(&file, "\n  \n").unwrap();

        let mock = MockProvider::new(REPLY);
        let extractor = extractor(mock.clone());
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = execute_extract(args(file), &extractor, &formatter).await;
        assert!(matches!(
            result,
            Err(CliError::Extraction(fourthwall_extractor::ExtractionError::EmptyText(_)))
        ));
        assert_eq!(mock.call_count(), 0);
        assert!(extractor.gateway().list_books().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let extractor = extractor(MockProvider::new(REPLY));
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = execute_extract(
            args(PathBuf::from("/nonexistent/emma.txt")),
            &extractor,
            &formatter,
        )
        .await;
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[tokio::test]
    async fn test_safety_block_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("emma.txt");
        fs::write(&file, "text").unwrap();

        let extractor = extractor(MockProvider::blocked());
        let formatter = Formatter::new(OutputFormat::Json, false);

        let result = execute_extract(args(file), &extractor, &formatter).await;
        assert!(matches!(
            result,
            Err(CliError::Extraction(fourthwall_extractor::ExtractionError::SafetyBlocked))
        ));
    }
}
