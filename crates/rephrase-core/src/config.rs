//! Client configuration

use crate::validation::WORD_LIMIT;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("word_limit must be greater than zero")]
    ZeroWordLimit,

    #[error("{0} must not be empty")]
    EmptyPath(&'static str),
}

/// Settings for the web controller. Every field has a default, so an
/// empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Maximum word count for non-research actions
    #[serde(default = "default_word_limit")]
    pub word_limit: usize,

    /// Fixed delay before reopening a closed stats channel
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u32,

    #[serde(default = "default_process_endpoint")]
    pub process_endpoint: String,

    #[serde(default = "default_stats_path")]
    pub stats_path: String,
}

fn default_word_limit() -> usize {
    WORD_LIMIT
}

fn default_reconnect_delay_ms() -> u32 {
    3000
}

fn default_process_endpoint() -> String {
    "/api/process".to_string()
}

fn default_stats_path() -> String {
    "/ws".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            word_limit: default_word_limit(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            process_endpoint: default_process_endpoint(),
            stats_path: default_stats_path(),
        }
    }
}

impl ClientConfig {
    /// Parse an optional JSON config, falling back to defaults when absent.
    pub fn from_json(json: Option<&str>) -> Result<Self, ConfigError> {
        let config: Self = match json.map(str::trim) {
            None | Some("") => Self::default(),
            Some(json) => serde_json::from_str(json)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.word_limit == 0 {
            return Err(ConfigError::ZeroWordLimit);
        }
        if self.process_endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyPath("process_endpoint"));
        }
        if self.stats_path.trim().is_empty() {
            return Err(ConfigError::EmptyPath("stats_path"));
        }
        Ok(())
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.reconnect_delay_ms))
    }
}
