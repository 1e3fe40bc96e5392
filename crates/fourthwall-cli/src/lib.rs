//! Fourth Wall CLI library.
//!
//! Configuration loading, provider and store selection, command execution
//! and output formatting for the `fourthwall` binary.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use backend::{build_model, open_store, AppExtractor, Model, Store};
pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
