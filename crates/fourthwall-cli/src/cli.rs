//! CLI command definitions and argument parsing.

use crate::config::{ProviderKind, StoreKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fourth Wall CLI - Extract voiced characters from books.
#[derive(Debug, Parser)]
#[command(name = "fourthwall")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Document store backend (overrides the config file)
    #[arg(long, value_enum, global = true)]
    pub store: Option<StoreKind>,

    /// Model provider (overrides the config file)
    #[arg(long, value_enum, global = true)]
    pub provider: Option<ProviderKind>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (names and ids only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract characters from a book text file
    Extract(ExtractArgs),

    /// Show the cached characters of a book
    Show(ShowArgs),

    /// List every cached book
    List,

    /// Show the voice roster
    Voices,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// UTF-8 text file holding the book
    pub file: PathBuf,

    /// Cache key to use instead of the file name
    #[arg(short, long)]
    pub book_id: Option<String>,

    /// Append a time-ordered suffix so this upload never hits an older cache entry
    #[arg(short, long)]
    pub unique: bool,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Book id (a file name is normalized the same way as on extract)
    pub book_id: String,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
