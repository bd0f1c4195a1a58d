//! Retrying fetch factory
//!
//! A [`FetchRetried`] is built once from a [`RetryConfig`] and then called any
//! number of times, concurrently or not. Each call starts its own retry
//! sequence at attempt zero.

use crate::config::RetryConfig;
use crate::error::Result;
use crate::executor::Executor;
use refetch_core::sleep::Sleeper;
use refetch_transport::{HttpResponse, HttpTransport, RequestOptions, Transport, TransportError};
use std::fmt;
use std::sync::Arc;

/// A fetch function with retries.
///
/// Cloning is cheap; clones share the transport and configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use refetch::{FetchRetried, RetryConfig};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetch = FetchRetried::new(
///     RetryConfig::builder()
///         .delay(Duration::from_millis(100))
///         .retries(3)
///         .build(),
/// )?;
///
/// let response = fetch.get("https://example.com/health").await?;
/// println!("status: {}", response.status);
/// # Ok(())
/// # }
/// ```
pub struct FetchRetried<T: Transport = HttpTransport> {
    executor: Executor<T>,
}

impl FetchRetried<HttpTransport> {
    /// Create a retrying fetch over the default HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: RetryConfig<HttpResponse, TransportError>) -> Result<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> FetchRetried<T> {
    /// Create a retrying fetch over a custom transport
    pub fn with_transport(transport: T, config: RetryConfig<T::Response, T::Error>) -> Self {
        Self {
            executor: Executor::new(transport, config),
        }
    }

    /// Replace the sleep capability used between attempts
    pub fn with_sleeper(self, sleeper: impl Sleeper + 'static) -> Self {
        Self {
            executor: self.executor.with_sleeper(sleeper),
        }
    }

    /// Perform a request, retrying as configured.
    ///
    /// Returns the last response, even one that failed the success test, or
    /// the last error exactly as the transport produced it.
    pub async fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> std::result::Result<T::Response, T::Error> {
        self.executor.execute(url, options).await
    }

    /// Perform a `GET` request, retrying as configured
    pub async fn get(&self, url: &str) -> std::result::Result<T::Response, T::Error> {
        self.fetch(url, &RequestOptions::new()).await
    }

    /// The configuration in effect
    pub fn config(&self) -> &RetryConfig<T::Response, T::Error> {
        self.executor.config()
    }

    /// The wrapped transport
    pub fn transport(&self) -> &T {
        self.executor.transport()
    }
}

impl<T: Transport> Clone for FetchRetried<T> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
        }
    }
}

impl<T: Transport> fmt::Debug for FetchRetried<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRetried")
            .field("config", self.config())
            .finish_non_exhaustive()
    }
}

/// Build a retrying fetch over the default HTTP transport.
///
/// Shorthand for [`FetchRetried::new`].
pub fn fetch_retried(
    config: RetryConfig<HttpResponse, TransportError>,
) -> Result<FetchRetried<HttpTransport>> {
    FetchRetried::new(config)
}

/// Build a retrying fetch over a shared transport.
pub fn fetch_retried_with<T: Transport>(
    transport: Arc<T>,
    config: RetryConfig<T::Response, T::Error>,
) -> FetchRetried<Arc<T>> {
    FetchRetried::with_transport(transport, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_http_transport() {
        let fetch = FetchRetried::new(RetryConfig::default()).expect("transport builds");

        assert_eq!(fetch.config().retries, 5);
        assert!(format!("{:?}", fetch).starts_with("FetchRetried { config: RetryConfig"));
    }

    #[test]
    fn test_fetch_retried_shorthand() {
        let fetch = fetch_retried(RetryConfig::builder().retries(1).build()).expect("transport builds");
        let clone = fetch.clone();

        assert_eq!(clone.config().retries, 1);
    }
}
