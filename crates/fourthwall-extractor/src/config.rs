//! Configuration for the Extractor

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model used when none is configured
pub const DEFAULT_MODEL_ID: &str = "gemini-2.0-flash";

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Provider model id passed with every request
    pub model_id: String,

    /// Leading characters of the book sent to the model
    pub sample_chars: usize,

    /// Model calls per extraction before giving up
    pub max_attempts: u32,

    /// First backoff delay (seconds); doubles after each failed attempt
    pub backoff_base_secs: u64,

    /// Fewest characters the model is asked for
    pub min_characters: usize,

    /// Most characters the model is asked for; longer lists are truncated
    pub max_characters: usize,

    /// Serialize concurrent extractions of the same book
    pub single_flight: bool,
}

impl ExtractorConfig {
    /// Get the backoff base as a Duration
    pub fn backoff_base(&self) -> Duration {
        Duration::from_secs(self.backoff_base_secs)
    }

    /// Retry policy derived from this configuration
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.backoff_base())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model_id.trim().is_empty() {
            return Err("model_id must not be empty".to_string());
        }
        if self.sample_chars == 0 {
            return Err("sample_chars must be greater than 0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.min_characters == 0 {
            return Err("min_characters must be greater than 0".to_string());
        }
        if self.min_characters > self.max_characters {
            return Err("min_characters cannot exceed max_characters".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            sample_chars: 15_000,
            max_attempts: 4,
            backoff_base_secs: 2,
            min_characters: 4,
            max_characters: 8,
            single_flight: true,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: fewer attempts and a shorter sample for faster turnaround
    pub fn aggressive() -> Self {
        Self {
            sample_chars: 8_000,
            max_attempts: 2,
            backoff_base_secs: 1,
            min_characters: 2,
            max_characters: 6,
            ..Self::default()
        }
    }

    /// Lenient preset: more attempts and a larger sample for better recall
    pub fn lenient() -> Self {
        Self {
            sample_chars: 30_000,
            max_attempts: 6,
            backoff_base_secs: 2,
            min_characters: 4,
            max_characters: 12,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    ///
    /// Missing keys take their default values.
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
