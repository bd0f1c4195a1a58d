//! HTTP transport client implementation
//!
//! Implements the Transport trait for a single HTTP exchange over reqwest.

use crate::error::{Result, TransportError};
use crate::http::classify::classify_reqwest_error;
use crate::traits::{HttpResponse, RequestOptions, Transport};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// HTTP transport implementation
///
/// Handles one request per call with:
/// - Request and connect timeouts
/// - Per-request timeout overrides
/// - Structured network errors for connect-phase classification
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<ReqwestClient>,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new HTTP transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(Default::default())
    }

    /// Create a new HTTP transport with custom configuration
    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            timeout: config.timeout,
        })
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: ReqwestClient) -> Self {
        Self {
            client: Arc::new(client),
            timeout: HttpTransportConfig::default().timeout,
        }
    }

    /// Get a reference to the underlying reqwest client
    pub fn reqwest_client(&self) -> Arc<ReqwestClient> {
        self.client.clone()
    }

    /// The default request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Transport for HttpTransport {
    type Response = HttpResponse;
    type Error = TransportError;

    async fn fetch(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse> {
        let method = parse_method(options.method_or_default())?;
        let target = Url::parse(url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", url, e)))?;

        let mut req = self.client.request(method, target);

        // Add headers
        for (key, value) in &options.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        // Add body if present
        if let Some(body) = &options.body {
            req = req.body(body.clone());
        }

        if let Some(timeout) = options.timeout {
            req = req.timeout(timeout);
        }

        trace!(method = options.method_or_default(), url, "sending request");

        // Send request
        let response = req.send().await.map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let mut headers = HashMap::new();

        // Collect headers
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string(), v.to_string());
            }
        }

        // Collect body
        let body = response
            .bytes()
            .await
            .map_err(classify_reqwest_error)?
            .to_vec();

        debug!(url, status, body_size = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn parse_method(method: &str) -> Result<reqwest::Method> {
    let method_upper = method.to_uppercase();
    match method_upper.as_str() {
        "GET" => Ok(reqwest::Method::GET),
        "POST" => Ok(reqwest::Method::POST),
        "PUT" => Ok(reqwest::Method::PUT),
        "DELETE" => Ok(reqwest::Method::DELETE),
        "PATCH" => Ok(reqwest::Method::PATCH),
        "HEAD" => Ok(reqwest::Method::HEAD),
        "OPTIONS" => Ok(reqwest::Method::OPTIONS),
        _ => Err(TransportError::Http(format!(
            "Unsupported HTTP method: {}",
            method
        ))),
    }
}

/// HTTP transport configuration
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// `User-Agent` header sent with every request
    pub user_agent: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(600),
            connect_timeout: Duration::from_secs(30),
            user_agent: Some(concat!("refetch/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}
