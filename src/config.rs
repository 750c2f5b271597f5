//! Session configuration.

use crate::games::xiangqi::Camp;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Tunables for a [`crate::GameSession`].
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionConfig {
    /// First-move preference recorded when a player readies without one.
    #[serde(default = "default_first_camp")]
    default_first_camp: Camp,

    /// Seed for the first-mover coin flip; random when absent.
    #[serde(default)]
    coin_seed: Option<u64>,
}

fn default_first_camp() -> Camp {
    Camp::Red
}

impl SessionConfig {
    /// Creates a configuration.
    pub fn new(default_first_camp: Camp, coin_seed: Option<u64>) -> Self {
        Self {
            default_first_camp,
            coin_seed,
        }
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(
            default_first_camp = %config.default_first_camp,
            seeded = config.coin_seed.is_some(),
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(text))]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(default_first_camp(), None)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_fields_parse() {
        let config =
            SessionConfig::from_toml_str("default_first_camp = \"black\"\ncoin_seed = 7\n").unwrap();
        assert_eq!(*config.default_first_camp(), Camp::Black);
        assert_eq!(*config.coin_seed(), Some(7));
    }

    #[test]
    fn test_bad_camp_rejected() {
        let err = SessionConfig::from_toml_str("default_first_camp = \"green\"").unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
        assert!(err.file.ends_with("config.rs"));
    }
}
