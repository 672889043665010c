//! Connection parameters for a scraped resource

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// HTTP method used to fetch the resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }

    pub fn all() -> &'static [HttpMethod] {
        &[HttpMethod::Get, HttpMethod::Post]
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            other => Err(format!("Unsupported HTTP method: {}", other)),
        }
    }
}

/// Everything needed to fetch the resource a sensor scrapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionParameters {
    /// Resource URL
    pub resource: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Extra request headers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Request body, sent with POST
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

fn default_verify_ssl() -> bool {
    defaults::DEFAULT_VERIFY_SSL
}

fn default_timeout() -> f64 {
    defaults::DEFAULT_TIMEOUT_SECS
}

impl ConnectionParameters {
    /// Create parameters for a resource with default HTTP options
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            method: defaults::DEFAULT_METHOD,
            verify_ssl: defaults::DEFAULT_VERIFY_SSL,
            timeout: defaults::DEFAULT_TIMEOUT_SECS,
            username: None,
            password: None,
            headers: BTreeMap::new(),
            payload: None,
        }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    pub fn with_timeout(mut self, timeout: f64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Timeout as a Duration; values a Duration cannot hold fall back to the default
    pub fn timeout_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f64(defaults::DEFAULT_TIMEOUT_SECS))
    }

    /// Whether basic auth credentials are configured
    pub fn has_credentials(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_minimal_json() {
        let params: ConnectionParameters =
            serde_json::from_value(json!({"resource": "https://example.org"})).unwrap();
        assert_eq!(params.method, HttpMethod::Get);
        assert!(params.verify_ssl);
        assert_eq!(params.timeout, 10.0);
        assert!(params.username.is_none());
        assert_eq!(params, ConnectionParameters::new("https://example.org"));
    }

    #[test]
    fn test_serializes_without_empty_optionals() {
        let params = ConnectionParameters::new("https://example.org");
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            json!({
                "resource": "https://example.org",
                "method": "GET",
                "verify_ssl": true,
                "timeout": 10.0,
            })
        );
    }

    #[test]
    fn test_serializes_credentials_when_present() {
        let params = ConnectionParameters::new("https://example.org")
            .with_credentials("secret_username", "secret_password");
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["username"], "secret_username");
        assert_eq!(value["password"], "secret_password");
        assert!(params.has_credentials());
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("POST".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert!("DELETE".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }

    #[test]
    fn test_timeout_duration_fallback() {
        let params = ConnectionParameters::new("https://example.org").with_timeout(2.5);
        assert_eq!(params.timeout_duration(), Duration::from_millis(2500));

        for timeout in [-1.0, 0.0, f64::NAN, f64::INFINITY, 1e20] {
            let params = params.clone().with_timeout(timeout);
            assert_eq!(params.timeout_duration(), Duration::from_secs(10));
        }
    }
}
