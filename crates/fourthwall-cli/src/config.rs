//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use fourthwall_domain::{VoiceProfile, VoiceRoster};
use fourthwall_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the home directory holding config and cache
pub const APP_DIR: &str = ".fourthwall";

/// CLI configuration.
///
/// Loaded from `~/.fourthwall/config.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where book records are cached
    #[serde(default)]
    pub store: StoreSettings,

    /// Which model provider to call
    #[serde(default)]
    pub llm: LlmSettings,

    /// Extraction tuning
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Replaces the built-in voice roster when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voices: Option<Vec<VoiceProfile>>,
}

/// Document store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// In-process map; nothing survives the run
    Memory,
    /// SQLite database file
    Sqlite,
    /// One JSON file per book
    Files,
}

/// Model provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini API
    Gemini,
    /// Local Ollama server
    Ollama,
    /// Canned offline responses
    Mock,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Backend to use
    #[serde(default = "default_store_kind")]
    pub backend: StoreKind,

    /// Database file or directory; defaults under `~/.fourthwall`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// `[llm]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Provider to use
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,

    /// Override the provider endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Gemini API key (the environment takes precedence)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// HTTP timeout for a single model call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Reply used by the mock provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_response: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the config file and default data files.
    pub fn app_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(APP_DIR))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::app_dir()?.join("config.toml"))
    }

    /// Load configuration from `path`, or the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)?;
        self.roster()?;
        if self.llm.request_timeout_secs == 0 {
            return Err(CliError::Config(
                "llm.request_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// The voice roster: the `[[voices]]` override or the built-in troupe.
    pub fn roster(&self) -> Result<VoiceRoster> {
        match &self.voices {
            Some(voices) => VoiceRoster::new(voices.clone()).map_err(CliError::Config),
            None => Ok(VoiceRoster::default()),
        }
    }

    /// Store location, falling back to a default under the app directory.
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store.path {
            return Ok(path.clone());
        }
        let name = match self.store.backend {
            StoreKind::Files => "books",
            StoreKind::Sqlite | StoreKind::Memory => "fourthwall.db",
        };
        Ok(Self::app_dir()?.join(name))
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: default_store_kind(),
            path: None,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: None,
            api_key: None,
            request_timeout_secs: default_request_timeout(),
            mock_response: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_store_kind() -> StoreKind {
    StoreKind::Sqlite
}

fn default_provider() -> ProviderKind {
    ProviderKind::Gemini
}

fn default_request_timeout() -> u64 {
    fourthwall_llm::DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
