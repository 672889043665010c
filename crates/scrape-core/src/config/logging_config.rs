//! Logging configuration

use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Merge with another logging config
    pub fn merge(&mut self, other: LoggingConfig) {
        if !other.level.is_empty() {
            self.level = other.level;
        }
        if !other.format.is_empty() {
            self.format = other.format;
        }
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, "pretty");
        assert!(!config.is_json());
    }

    #[test]
    fn test_logging_config_merge() {
        let mut config = LoggingConfig::default();
        config.merge(LoggingConfig {
            level: "debug".to_string(),
            format: String::new(),
        });
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, "pretty");

        config.merge(LoggingConfig {
            level: String::new(),
            format: "JSON".to_string(),
        });
        assert_eq!(config.level, "debug");
        assert!(config.is_json());
    }
}
