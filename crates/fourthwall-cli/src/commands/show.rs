//! Show command implementation.

use crate::backend::Store;
use crate::cli::ShowArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use fourthwall_domain::{BookId, BookRecord, VoiceRoster};
use fourthwall_extractor::CacheGateway;

/// Execute the show command.
pub fn execute_show(
    args: ShowArgs,
    gateway: &CacheGateway<Store>,
    roster: &VoiceRoster,
    formatter: &Formatter,
) -> Result<()> {
    let record = find_book(&args.book_id, gateway)?;
    println!("{}", formatter.format_record(&record, roster)?);
    Ok(())
}

fn find_book(raw: &str, gateway: &CacheGateway<Store>) -> Result<BookRecord> {
    // Keys printed by `list` are tried verbatim before file-name normalization
    if let Ok(key) = BookId::from_key(raw) {
        if let Some(record) = gateway.lookup(&key)? {
            return Ok(record);
        }
    }

    let book_id = BookId::from_filename(raw).map_err(CliError::InvalidInput)?;
    gateway
        .lookup(&book_id)?
        .ok_or_else(|| CliError::BookNotFound(book_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use fourthwall_domain::Character;
    use fourthwall_store::MemoryStore;

    fn gateway() -> CacheGateway<Store> {
        CacheGateway::new(Store::Memory(MemoryStore::new()))
    }

    fn seed(gateway: &CacheGateway<Store>, key: &str) {
        gateway
            .store(
                &BookId::from_key(key).unwrap(),
                None,
                vec![Character::new("Emma", "", "", "6sFKzaJr574YWVu4UuJF")],
            )
            .unwrap();
    }

    #[test]
    fn test_show_by_file_name() {
        let gateway = gateway();
        seed(&gateway, "emma");

        let record = find_book("books/emma.txt", &gateway).unwrap();
        assert_eq!(record.book_id.as_str(), "emma");
    }

    #[test]
    fn test_show_dotted_key() {
        let gateway = gateway();
        seed(&gateway, "mr.smith");

        let record = find_book("mr.smith", &gateway).unwrap();
        assert_eq!(record.book_id.as_str(), "mr.smith");
    }

    #[test]
    fn test_show_missing() {
        let gateway = gateway();
        let result = find_book("emma", &gateway);
        assert!(matches!(result, Err(CliError::BookNotFound(ref id)) if id == "emma"));

        let formatter = Formatter::new(OutputFormat::Table, false);
        let err = execute_show(
            ShowArgs {
                book_id: "emma".to_string(),
            },
            &gateway,
            &VoiceRoster::default(),
            &formatter,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Book not found: emma");
    }
}
