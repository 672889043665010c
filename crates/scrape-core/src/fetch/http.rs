//! reqwest-backed fetcher

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::debug;

use super::{FetchError, Fetcher};
use crate::config::defaults::DEFAULT_USER_AGENT;
use crate::model::{ConnectionParameters, HttpMethod};

/// Fetches resources over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    user_agent: String,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT)
    }
}

impl HttpFetcher {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    /// Create HTTP client for one set of connection options
    fn create_client(&self, verify_ssl: bool, request_timeout: Duration) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .danger_accept_invalid_certs(!verify_ssl)
            .timeout(request_timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::Request(format!("Failed to create HTTP client: {}", e)))
    }
}

/// Convert HTTP method to reqwest method
fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
    }
}

/// Build the request for a resource: method, credentials, headers and body
fn build_request(client: &reqwest::Client, params: &ConnectionParameters, url: reqwest::Url) -> reqwest::RequestBuilder {
    let mut request = client.request(to_reqwest_method(params.method), url);

    if params.has_credentials() {
        request = request.basic_auth(
            params.username.as_deref().unwrap_or_default(),
            params.password.as_deref(),
        );
    }

    for (key, value) in &params.headers {
        request = request.header(key, value);
    }

    if let Some(payload) = &params.payload {
        request = request.body(payload.clone());
    }

    request
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, params: &ConnectionParameters) -> Result<String, FetchError> {
        let url = reqwest::Url::parse(&params.resource)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", params.resource, e)))?;
        let request_timeout = params.timeout_duration();
        let client = self.create_client(params.verify_ssl, request_timeout)?;
        let request = build_request(&client, params, url);

        debug!("Fetching {} {}", params.method, params.resource);

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| FetchError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    resource: params.resource.clone(),
                });
            }

            response.text().await.map_err(|e| FetchError::Body(e.to_string()))
        };

        match timeout(request_timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                seconds: request_timeout.as_secs_f64(),
            }),
        }
    }
}
