//! TOML-based engine configuration.
//!
//! Every field has a default, so an empty document (or a missing file) yields
//! the stock behavior: write-through persistence under `habit-tracker-data`
//! and a 60-day streak window.

use crate::export::calendar::DEFAULT_PROD_ID;
use crate::service::streak::DEFAULT_STREAK_WINDOW_DAYS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Storage key of the single persisted record.
pub const DEFAULT_STORAGE_KEY: &str = "habit-tracker-data";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// When mutations reach the persistence adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistMode {
    /// Every mutation writes the full state before returning.
    #[default]
    WriteThrough,
    /// Mutations mark the store dirty; `StateStore::flush` writes.
    ///
    /// Callers must flush before dropping the store. Dropping a dirty store
    /// discards its pending mutations and logs `event=state_drop`.
    Deferred,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_streak_window_days")]
    pub streak_window_days: u32,
    #[serde(default)]
    pub persist_mode: PersistMode,
    /// `PRODID` written into calendar feeds.
    #[serde(default = "default_calendar_prod_id")]
    pub calendar_prod_id: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.into()
}
fn default_streak_window_days() -> u32 {
    DEFAULT_STREAK_WINDOW_DAYS
}
fn default_calendar_prod_id() -> String {
    DEFAULT_PROD_ID.into()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            streak_window_days: default_streak_window_days(),
            persist_mode: PersistMode::default(),
            calendar_prod_id: default_calendar_prod_id(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads config from `path`; a missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage_key",
                message: "must not be blank".to_string(),
            });
        }
        if self.streak_window_days == 0 {
            return Err(ConfigError::Invalid {
                field: "streak_window_days",
                message: "must be at least 1".to_string(),
            });
        }
        if self.calendar_prod_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "calendar_prod_id",
                message: "must not be blank".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig, PersistMode};

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.storage_key, "habit-tracker-data");
        assert_eq!(config.streak_window_days, 60);
        assert_eq!(config.persist_mode, PersistMode::WriteThrough);
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = EngineConfig::from_toml_str("streak_window_days = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "streak_window_days",
                ..
            }
        ));
    }
}
