//! Transport error types

use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur in transport operations
#[derive(Debug, Error)]
pub enum TransportError {
    /// Socket-level failure with structured details
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Several attempts failed together (e.g. every resolved address was refused)
    #[error("{} errors occurred", .0.len())]
    Aggregate(Vec<TransportError>),

    /// Timeout error
    #[error("Timeout")]
    Timeout,

    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(String),

    /// The URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic transport error
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Whether the failure happened before any request bytes were sent.
    ///
    /// See [`is_connect_error`](crate::connect::is_connect_error).
    pub fn is_connect_error(&self) -> bool {
        crate::connect::is_connect_error(self)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Details of a socket-level failure
///
/// Mirrors the information operating systems and TLS stacks attach to
/// failed connections: an error code such as `ECONNREFUSED`, the system call
/// that failed, and a textual trace of where it happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NetworkError {
    /// Human-readable description
    pub message: String,

    /// Error code (`ECONNREFUSED`, `ERR_TLS_CERT_ALTNAME_INVALID`, ...)
    pub code: Option<String>,

    /// System call that failed (`connect`, `read`, ...)
    pub syscall: Option<String>,

    /// Trace of the failure site, one frame per line
    pub trace: Option<String>,

    /// Underlying failure
    #[source]
    pub cause: Option<Box<NetworkError>>,
}

impl NetworkError {
    /// Create a network error with a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Set the error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the failed system call
    pub fn with_syscall(mut self, syscall: impl Into<String>) -> Self {
        self.syscall = Some(syscall.into());
        self
    }

    /// Set the trace text
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Set the underlying failure
    pub fn with_cause(mut self, cause: NetworkError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}
