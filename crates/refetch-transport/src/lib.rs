//! Transport abstraction layer for refetch
//!
//! Provides the single-attempt request primitive that the retry engine wraps,
//! together with the error taxonomy needed to decide whether a failure is
//! safe to repeat.
//!
//! # Architecture
//!
//! - **Transport trait**: `(url, options) -> response | error`, one attempt per call
//! - **HTTP transport**: default implementation via reqwest

#![deny(unsafe_code)]
#![warn(missing_docs)]
//! - **Error handling**: structured network errors with code, syscall and trace
//! - **Connect classification**: detects failures that happened before any
//!   request bytes reached the server
//!
//! # Usage
//!
//! ```ignore
//! use refetch_transport::{HttpTransport, RequestOptions, Transport};
//!
//! let transport = HttpTransport::new()?;
//! let options = RequestOptions::new().method("GET");
//! let response = transport.fetch("https://example.com/health", &options).await?;
//! ```

pub mod connect;
pub mod error;
pub mod http;
pub mod traits;

// Re-export commonly used types
pub use connect::{EARLY_STAGE_NET_ERRORS, ErrorDetails, is_connect_error};
pub use error::{NetworkError, Result, TransportError};
pub use http::{HttpTransport, HttpTransportConfig};
pub use traits::{DEFAULT_METHOD, HttpResponse, RequestOptions, ResponseLike, Transport};
