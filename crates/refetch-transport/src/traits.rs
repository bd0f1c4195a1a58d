//! Transport trait and request/response types
//!
//! Defines the generic Transport trait that the retry engine drives, and the
//! request options and response values that flow through it.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// HTTP method assumed when a request does not specify one.
pub const DEFAULT_METHOD: &str = "GET";

/// Options for a single request
///
/// The same options value is handed to the transport on every attempt of a
/// retried call; the retry layer never modifies it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// HTTP method (GET, POST, etc.). `None` means [`DEFAULT_METHOD`].
    pub method: Option<String>,

    /// Request headers
    pub headers: HashMap<String, String>,

    /// Request body (optional)
    pub body: Option<Vec<u8>>,

    /// Per-request timeout, overriding the transport default
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Create options for a `GET` request with no headers or body
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// The HTTP method, falling back to [`DEFAULT_METHOD`]
    pub fn method_or_default(&self) -> &str {
        self.method.as_deref().unwrap_or(DEFAULT_METHOD)
    }

    /// Add a header to the request
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the request body from string
    pub fn with_text_body(mut self, text: impl Into<String>) -> Self {
        self.body = Some(text.into().into_bytes());
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Minimal view of a response needed to judge success
pub trait ResponseLike {
    /// HTTP status code
    fn status(&self) -> u16;

    /// Whether the exchange succeeded at the network level (2xx for HTTP)
    fn ok(&self) -> bool;
}

impl<R: ResponseLike + ?Sized> ResponseLike for Arc<R> {
    fn status(&self) -> u16 {
        self.as_ref().status()
    }

    fn ok(&self) -> bool {
        self.as_ref().ok()
    }
}

/// HTTP response
///
/// Represents an HTTP response received from the server.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new HTTP response
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if response is an error (4xx or 5xx)
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Get the response body as a string
    pub fn text(&self) -> std::result::Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    /// Parse response body as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the response body cannot be parsed as valid JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Get a header value by name (case-insensitive)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl ResponseLike for HttpResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn ok(&self) -> bool {
        self.is_success()
    }
}

/// A single-attempt request primitive
///
/// Implementations perform exactly one exchange per call and report its
/// outcome. Retrying, waiting and giving up are the caller's business.
///
/// `url` and `options` are borrowed so a retrying caller passes the very same
/// values on every attempt.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Successful outcome of an exchange (which may still carry an error status)
    type Response: ResponseLike + Send + Sync;

    /// Failed outcome of an exchange
    type Error: Send + Sync;

    /// Perform one request
    async fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> std::result::Result<Self::Response, Self::Error>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    type Response = T::Response;
    type Error = T::Error;

    async fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> std::result::Result<Self::Response, Self::Error> {
        self.as_ref().fetch(url, options).await
    }
}
