//! List command implementation.

use crate::backend::Store;
use crate::error::Result;
use crate::output::Formatter;
use fourthwall_extractor::CacheGateway;

/// Execute the list command.
pub fn execute_list(gateway: &CacheGateway<Store>, formatter: &Formatter) -> Result<()> {
    let books = gateway.list_books()?;
    println!("{}", formatter.format_books(&books)?);
    Ok(())
}
