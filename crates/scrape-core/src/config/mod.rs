//! Application configuration
//!
//! Settings are read from a JSON or TOML file and then overridden by
//! `SCRAPE_*` environment variables.

mod app_config;
pub mod defaults;
mod logging_config;

pub use app_config::{AppConfig, load_config, load_from_env, load_from_file};
pub use logging_config::LoggingConfig;
