//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::fetch::FetcherConfig;
use crate::models::StatScope;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Stats API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root URL of the stats API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("matchup-trends/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Client settings for [`crate::fetch::HttpStatsSource`].
    pub fn fetcher_config(&self) -> Result<FetcherConfig, ConfigError> {
        let base_url = Url::parse(&self.base_url).map_err(|e| {
            ConfigError::ValidationError(format!("invalid base_url {:?}: {}", self.base_url, e))
        })?;
        Ok(FetcherConfig {
            base_url,
            timeout: Duration::from_secs(self.timeout_seconds),
            user_agent: self.user_agent.clone(),
        })
    }
}

/// Matchup view configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupConfig {
    /// Season stats and trends are requested for
    #[serde(default = "default_season")]
    pub season: i32,

    /// Game types sent with every stats request ("REG", "POST", "REG,POST")
    #[serde(default = "default_game_types")]
    pub game_types: String,

    /// First season of the schedule history used for trends
    #[serde(default = "default_history_start_year")]
    pub history_start_year: i32,
}

fn default_season() -> i32 {
    2025
}

fn default_game_types() -> String {
    "REG".to_string()
}

fn default_history_start_year() -> i32 {
    2000
}

impl Default for MatchupConfig {
    fn default() -> Self {
        Self {
            season: default_season(),
            game_types: default_game_types(),
            history_start_year: default_history_start_year(),
        }
    }
}

impl MatchupConfig {
    pub fn scope(&self) -> StatScope {
        StatScope::new(self.season, self.game_types.clone())
    }

    /// Seasons fetched for the trends history, oldest first.
    pub fn history_seasons(&self) -> std::ops::RangeInclusive<i32> {
        self.history_start_year..=self.season
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub matchup: MatchupConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api: ApiConfig::default(),
            matchup: MatchupConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        self.api.fetcher_config()?;

        if self.matchup.history_start_year > self.matchup.season {
            return Err(ConfigError::ValidationError(format!(
                "history_start_year {} is after season {}",
                self.matchup.history_start_year, self.matchup.season
            )));
        }

        if self.matchup.game_types.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "game_types must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
