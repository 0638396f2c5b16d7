//! Authenticated GET transport.
//!
//! Every call opens its own connection and releases it when the response has
//! been read or dropped; nothing is pooled between polls.

use super::auth::{authorization_header, DEFAULT_PASSWORD};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Controller host, optionally with `:port` (e.g. `192.168.1.50`)
    pub host: String,
    /// Password for the `admin` account
    pub password: String,
    /// Request timeout; `None` leaves the HTTP client default
    pub timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            timeout: None,
        }
    }
}

/// Raw response of one request. Not retained after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Response body as text
    pub body: String,
}

impl EndpointResponse {
    /// Whether the controller answered 200.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }
}

/// Access to the controller's web server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue an authenticated GET of `path` with an optional literal query string.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] on DNS, connect, timeout, or body
    /// read failures. HTTP error statuses are not errors.
    async fn fetch(&self, path: &str, query: Option<&str>)
        -> Result<EndpointResponse, TransportError>;

    /// Host this transport talks to. It is the device's identity.
    fn host(&self) -> &str;
}

/// reqwest-backed [`Transport`].
pub struct HttpTransport {
    client: Client,
    base_url: String,
    host: String,
    authorization: String,
}

impl HttpTransport {
    /// Create a transport for the configured controller.
    ///
    /// # Errors
    ///
    /// Returns error if the host does not form a valid URL or the HTTP client
    /// cannot be created.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let base_url = validate_host(&config.host)?;

        // No idle connections survive a request
        let mut builder = Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::ClientInit(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            host: config.host.clone(),
            authorization: authorization_header(&config.password),
        })
    }

    fn url(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(query) => format!("{}{path}?{query}", self.base_url),
            None => format!("{}{path}", self.base_url),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<EndpointResponse, TransportError> {
        let url = self.url(path, query);

        tracing::debug!(host = %self.host, url, "GET device page");

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.authorization)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        tracing::trace!(url, status_code, body_len = body.len(), "Device response");

        Ok(EndpointResponse { status_code, body })
    }

    fn host(&self) -> &str {
        &self.host
    }
}

/// Check that `host` is a bare authority and return the base URL without trailing slash.
fn validate_host(host: &str) -> Result<String, TransportError> {
    if host.trim().is_empty() {
        return Err(TransportError::InvalidHost(format!("{host:?}: empty")));
    }

    let url = Url::parse(&format!("http://{host}/"))
        .map_err(|e| TransportError::InvalidHost(format!("{host}: {e}")))?;

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(TransportError::InvalidHost(format!(
            "{host}: expected a host name or address, optionally with a port"
        )));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(TransportError::InvalidHost(format!(
            "{host}: credentials belong in the password setting"
        )));
    }

    Ok(format!("http://{host}"))
}

/// Errors that can occur with the transport.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Host does not form a valid URL
    #[error("invalid host: {0}")]
    InvalidHost(String),
    /// Client initialization failed
    #[error("client init error: {0}")]
    ClientInit(String),
    /// Network-level failure (DNS, connect, timeout, body read)
    #[error("request failed: {0}")]
    Request(String),
}
