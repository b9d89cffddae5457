//! # Configuration Management
//!
//! Handles configuration directories and the API configuration file
//! (`config.toml`), including XDG base directory support and environment
//! variable overrides.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::consts::{
  APP_NAME, APP_ORGANIZATION, CONFIG_FILE_NAME, DEFAULT_API_URL, ENV_API_URL, ENV_TIMEOUT_SECS,
};

/// Represents the configuration directory for octocheck
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs =
      ProjectDirs::from(APP_ORGANIZATION, "", APP_NAME).context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Get the config directory
  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  /// Get the path to the API configuration file
  pub fn config_path(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE_NAME)
  }

  /// Load the API configuration from file, falling back to defaults
  pub fn load_api_config(&self) -> Result<ApiConfig> {
    let config_path = self.config_path();

    if !config_path.exists() {
      return Ok(ApiConfig::default());
    }

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", config_path.display()))
  }

  /// Save the API configuration to file
  pub fn save_api_config(&self, config: &ApiConfig) -> Result<()> {
    let config_path = self.config_path();

    if let Some(parent) = config_path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))
  }
}

/// Connection settings for the GitHub REST API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
  /// Base URL of the REST API (GitHub Enterprise uses `https://host/api/v3`)
  pub base_url: String,

  /// Per-request timeout; `None` leaves the transport default in place
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timeout_secs: Option<u64>,

  /// Custom User-Agent header value
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_agent: Option<String>,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_API_URL.to_string(),
      timeout_secs: None,
      user_agent: None,
    }
  }
}

impl ApiConfig {
  /// Apply `OCTOCHECK_API_URL` and `OCTOCHECK_TIMEOUT_SECS` overrides
  pub fn with_env_overrides(mut self) -> Result<Self> {
    if let Ok(url) = std::env::var(ENV_API_URL)
      && !url.trim().is_empty()
    {
      self.base_url = url.trim().to_string();
    }

    if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
      let secs = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"))?;
      self.timeout_secs = Some(secs);
    }

    Ok(self)
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}
