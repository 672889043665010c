//! Resource validation for the connection step
//!
//! A submission is checked for shape first, then probed with a single fetch.
//! Every fetch failure collapses into one user-facing code, `resource_error`;
//! the underlying cause only goes to the log.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::result::{BASE_ERROR_KEY, FormErrors};
use crate::config::defaults::MAX_TIMEOUT_SECS;
use crate::fetch::Fetcher;
use crate::model::{ConnectionParameters, EntityDefinition};
use crate::sensor::{self, ScrapeError};

/// Why connection parameters were rejected
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// The probe failed; the message is for logs only
    #[error("Resource could not be fetched: {0}")]
    Resource(String),

    #[error("Invalid resource URL: {0}")]
    InvalidUrl(String),

    #[error("Timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f64),

    #[error("A password was given without a username")]
    MissingUsername,
}

impl ValidationError {
    /// Form field the error is reported on
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Resource(_) => BASE_ERROR_KEY,
            ValidationError::InvalidUrl(_) => "resource",
            ValidationError::InvalidTimeout(_) => "timeout",
            ValidationError::MissingUsername => "username",
        }
    }

    /// Error code shown to the user
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Resource(_) => "resource_error",
            ValidationError::InvalidUrl(_) => "invalid_url",
            ValidationError::InvalidTimeout(_) => "invalid_timeout",
            ValidationError::MissingUsername => "username_required",
        }
    }

    pub fn to_form_errors(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        errors.insert(self.field().to_string(), self.code().to_string());
        errors
    }
}

/// Shape checks that need no network access
pub fn check_connection(params: &ConnectionParameters) -> Result<(), ValidationError> {
    let url = Url::parse(&params.resource)
        .map_err(|e| ValidationError::InvalidUrl(format!("{}: {}", params.resource, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ValidationError::InvalidUrl(params.resource.clone()));
    }

    if !params.timeout.is_finite() || params.timeout <= 0.0 || params.timeout > MAX_TIMEOUT_SECS {
        return Err(ValidationError::InvalidTimeout(params.timeout));
    }

    let has_password = params.password.as_deref().is_some_and(|p| !p.is_empty());
    if has_password && !params.has_credentials() {
        return Err(ValidationError::MissingUsername);
    }

    Ok(())
}

/// A successful probe: the parameters that worked and the document they returned
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeHandle {
    params: ConnectionParameters,
    document: String,
}

impl ProbeHandle {
    pub fn new(params: ConnectionParameters, document: impl Into<String>) -> Self {
        Self {
            params,
            document: document.into(),
        }
    }

    pub fn params(&self) -> &ConnectionParameters {
        &self.params
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    /// Value a sensor definition would read from the probed document
    pub fn preview(&self, definition: &EntityDefinition) -> Result<String, ScrapeError> {
        sensor::extract_value(&self.document, definition)
    }

    pub fn into_params(self) -> ConnectionParameters {
        self.params
    }
}

/// Probes connection parameters against the live resource
#[derive(Clone)]
pub struct ResourceValidator {
    fetcher: Arc<dyn Fetcher>,
}

impl ResourceValidator {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> Arc<dyn Fetcher> {
        Arc::clone(&self.fetcher)
    }

    /// Check the parameters and fetch the resource once
    ///
    /// Surrounding whitespace is stripped from the resource before anything
    /// else, so the handle carries the URL that was actually fetched.
    pub async fn validate(&self, mut params: ConnectionParameters) -> Result<ProbeHandle, ValidationError> {
        params.resource = params.resource.trim().to_string();
        check_connection(&params)?;

        match self.fetcher.fetch(&params).await {
            Ok(document) => {
                debug!(
                    resource = %params.resource,
                    bytes = document.len(),
                    "Resource probe succeeded"
                );
                Ok(ProbeHandle::new(params, document))
            }
            Err(e) => {
                warn!(resource = %params.resource, error = %e, "Resource probe failed");
                Err(ValidationError::Resource(e.to_string()))
            }
        }
    }
}

impl std::fmt::Debug for ResourceValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceValidator").finish_non_exhaustive()
    }
}
