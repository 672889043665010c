//! Application settings and their loaders

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::LoggingConfig;
use super::defaults::{DATA_DIR, DEFAULT_USER_AGENT, ENTRIES_FILE};
use crate::error::{ScrapeFlowError, ScrapeResult};

/// Settings for the scrape tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the JSON entry store lives; `~/.scrape/entries.json` when unset
    pub store_path: Option<PathBuf>,
    /// User-Agent header sent with every fetch
    pub user_agent: String,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Resolved entry store location
    pub fn entries_path(&self) -> PathBuf {
        match &self.store_path {
            Some(path) => path.clone(),
            None => dirs::home_dir()
                .unwrap_or_default()
                .join(DATA_DIR)
                .join(ENTRIES_FILE),
        }
    }
}

/// Load configuration from a file
///
/// Supports JSON and TOML formats based on file extension.
/// Returns default config if file doesn't exist.
pub fn load_from_file(path: &Path) -> ScrapeResult<AppConfig> {
    if !path.exists() {
        debug!("Config file {} not found, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ScrapeFlowError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            ScrapeFlowError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            ScrapeFlowError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(config)
}

/// Apply `SCRAPE_*` environment overrides to a configuration
pub fn load_from_env(config: AppConfig) -> AppConfig {
    apply_overrides(config, |key| env::var(key).ok())
}

fn apply_overrides(mut config: AppConfig, lookup: impl Fn(&str) -> Option<String>) -> AppConfig {
    if let Some(path) = lookup("SCRAPE_STORE_PATH").filter(|p| !p.is_empty()) {
        config.store_path = Some(PathBuf::from(path));
    }
    if let Some(agent) = lookup("SCRAPE_USER_AGENT").filter(|a| !a.is_empty()) {
        config.user_agent = agent;
    }
    if let Some(level) = lookup("SCRAPE_LOG_LEVEL") {
        config.logging.merge(LoggingConfig {
            level,
            format: String::new(),
        });
    }
    if let Some(format) = lookup("SCRAPE_LOG_FORMAT") {
        config.logging.merge(LoggingConfig {
            level: String::new(),
            format,
        });
    }
    config
}

/// Load configuration from an optional file, then the environment
pub fn load_config(path: Option<&Path>) -> ScrapeResult<AppConfig> {
    let base = match path {
        Some(path) => load_from_file(path)?,
        None => AppConfig::default(),
    };
    Ok(load_from_env(base))
}
