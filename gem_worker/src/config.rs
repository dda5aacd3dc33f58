//! Worker configuration

use std::path::{Path, PathBuf};

use chrono::Duration;
use gem_core::config::{load_toml, parse_toml};
use gem_core::ConfigError;
use serde::{Deserialize, Serialize};

/// Tunables for the calculator worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Queued commands before callers wait
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Lifetime of cached results
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: i64,
    /// History entries returned when no limit is given
    #[serde(default = "default_history_limit")]
    pub default_history_limit: usize,
    /// Directory for the file store; in-memory when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Extra gem definitions layered over the built-in catalog
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            channel_capacity: default_channel_capacity(),
            cache_ttl_hours: default_cache_ttl_hours(),
            default_history_limit: default_history_limit(),
            data_dir: None,
            catalog_path: None,
        }
    }
}

fn default_channel_capacity() -> usize {
    32
}
fn default_cache_ttl_hours() -> i64 {
    24
}
fn default_history_limit() -> usize {
    10
}

impl WorkerConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_toml::<Self>(path)?.validated()
    }

    /// Load from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        parse_toml::<Self>(content)?.validated()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::hours(self.cache_ttl_hours)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        if self.cache_ttl_hours < 0 {
            return Err(ConfigError::ValidationError(
                "cache_ttl_hours must not be negative".to_string(),
            ));
        }
        Ok(self)
    }
}
