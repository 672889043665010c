//! Fetching scraped resources
//!
//! The flows and the sensor runtime only see the [`Fetcher`] trait, so they
//! can run against a canned document in tests and against [`HttpFetcher`]
//! everywhere else.

mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::ConnectionParameters;

pub use http::HttpFetcher;

/// Why a fetch failed
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("Invalid resource URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP status {status} from {resource}")]
    Status { status: u16, resource: String },

    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: f64 },

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Retrieves the document behind a resource
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the resource once and return its body
    async fn fetch(&self, params: &ConnectionParameters) -> Result<String, FetchError>;
}
