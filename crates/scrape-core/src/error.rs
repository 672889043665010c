//! Error types for Scrape Flow

use thiserror::Error;

use crate::fetch::FetchError;
use crate::flow::FlowError;
use crate::sensor::ScrapeError;
use crate::store::StoreError;

/// Result type alias for Scrape Flow operations
pub type ScrapeResult<T> = Result<T, ScrapeFlowError>;

/// Main error type for Scrape Flow
#[derive(Error, Debug, Clone)]
pub enum ScrapeFlowError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Setup or options flow misuse
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    /// Entry store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Fetching a resource failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Extracting a sensor value failed
    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ScrapeFlowError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new configuration error with the operation that failed
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config(format!("{} ({})", message.into(), context.into()))
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<std::io::Error> for ScrapeFlowError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for ScrapeFlowError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ScrapeFlowError::config("missing store path");
        assert_eq!(err.to_string(), "Configuration error: missing store path");
    }

    #[test]
    fn test_config_with_context() {
        let err = ScrapeFlowError::config_with_context("bad value", "reading SCRAPE_LOG_LEVEL");
        assert!(err.to_string().contains("bad value"));
        assert!(err.to_string().contains("SCRAPE_LOG_LEVEL"));
    }

    #[test]
    fn test_from_store_error() {
        let err: ScrapeFlowError = StoreError::NotFound("abc".to_string()).into();
        assert!(matches!(err, ScrapeFlowError::Store(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ScrapeFlowError = io.into();
        assert!(matches!(err, ScrapeFlowError::Io(_)));
    }
}
