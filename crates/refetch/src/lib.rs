//! # refetch
//!
//! Retries for a single-attempt fetch primitive:
//! - Pluggable backoff (quadratic, binary exponential, or any delay function)
//! - Idempotency-aware retry decisions with a hard retry budget
//! - Legacy status/error tests or a fully custom retry predicate
//! - Per-call retry state, safe to share across concurrent calls
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use refetch::{FetchRetried, RetryConfig};
//! use refetch_transport::RequestOptions;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetch = FetchRetried::new(
//!         RetryConfig::builder()
//!             .delay(Duration::from_millis(200))
//!             .retries(3)
//!             .build(),
//!     )?;
//!
//!     let response = fetch
//!         .fetch("https://example.com/items", &RequestOptions::new().method("PUT"))
//!         .await?;
//!
//!     println!("{}", response.status);
//!     Ok(())
//! }
//! ```
//!
//! A response that still fails after the last retry is returned as a
//! response, not converted into an error. Errors are returned exactly as the
//! transport produced them.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use config::{
    BackoffKind, DEFAULT_RETRIES, IsOk, RetryConfig, RetryConfigBuilder, RetryPredicate,
    RetrySettings, ShouldRetry, ShouldRetryError, default_is_ok,
};
pub use error::{ConfigError, Error, Result};
pub use executor::Executor;
pub use fetch::{FetchRetried, fetch_retried, fetch_retried_with};
pub use methods::{DEFAULT_METHOD, IDEMPOTENT_HTTP_METHODS, is_retryable_method};
pub use predicate::{
    Outcome, RetryContext, default_should_retry, has_retries_left, retry_gate, should_retry,
};

// Module declarations
pub mod config;
pub mod error;
pub mod executor;
pub mod fetch;
pub mod methods;
pub mod predicate;

// Re-export the strategy constructors and connect classification
pub use refetch_core::retry::{
    BackoffStrategy, BinaryExponential, Delay, Quadratic, binary_exponential, quadratic,
};
#[allow(deprecated)]
pub use refetch_core::retry::exponential;
pub use refetch_transport::{ErrorDetails, is_connect_error};

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use refetch::prelude::*;
/// ```
pub mod prelude {

    pub use crate::{
        BackoffStrategy, Delay, Error, FetchRetried, Result, RetryConfig, RetryContext,
        RetrySettings, binary_exponential, is_connect_error, is_retryable_method, quadratic,
    };
    pub use refetch_transport::{HttpResponse, RequestOptions, ResponseLike, Transport};
}

/// Crate version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
