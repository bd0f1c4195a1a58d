//! Connect-phase error classification
//!
//! A request that failed while the connection was still being set up never
//! reached the server, so repeating it is safe even for non-idempotent
//! methods. [`is_connect_error`] recognises such failures from the structured
//! details transports attach to their errors.

use crate::error::{NetworkError, TransportError};
use regex::Regex;
use std::sync::LazyLock;

/// Error codes raised while a connection is being established.
///
/// - `ECONNREFUSED`: the target machine actively refused the connection
/// - `ENOTFOUND`: DNS lookup failed
pub const EARLY_STAGE_NET_ERRORS: [&str; 2] = ["ECONNREFUSED", "ENOTFOUND"];

/// Prefix shared by TLS certificate validation error codes.
pub const TLS_CERT_CODE_PREFIX: &str = "ERR_TLS_CERT_";

/// Matches a trace frame inside an `onConnect*` handler.
static ON_CONNECT_FRAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*at\s+onConnect[A-Z]").expect("valid regex"));

/// Structured details a classifier can read from an error.
///
/// Every accessor defaults to "unknown", so an implementation only overrides
/// what its error type actually carries.
pub trait ErrorDetails {
    /// Error code such as `ECONNREFUSED`
    fn code(&self) -> Option<&str> {
        None
    }

    /// System call that failed
    fn syscall(&self) -> Option<&str> {
        None
    }

    /// Trace text of the failure site
    fn trace(&self) -> Option<&str> {
        None
    }

    /// Underlying failure
    fn cause(&self) -> Option<&dyn ErrorDetails> {
        None
    }

    /// Sub-errors, when this error aggregates several failures
    fn errors(&self) -> Option<Vec<&dyn ErrorDetails>> {
        None
    }
}

impl ErrorDetails for NetworkError {
    fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    fn syscall(&self) -> Option<&str> {
        self.syscall.as_deref()
    }

    fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    fn cause(&self) -> Option<&dyn ErrorDetails> {
        self.cause.as_deref().map(|cause| cause as &dyn ErrorDetails)
    }
}

impl ErrorDetails for TransportError {
    fn code(&self) -> Option<&str> {
        match self {
            Self::Network(err) => err.code(),
            _ => None,
        }
    }

    fn syscall(&self) -> Option<&str> {
        match self {
            Self::Network(err) => err.syscall(),
            _ => None,
        }
    }

    fn trace(&self) -> Option<&str> {
        match self {
            Self::Network(err) => err.trace(),
            _ => None,
        }
    }

    fn cause(&self) -> Option<&dyn ErrorDetails> {
        match self {
            Self::Network(err) => err.cause(),
            _ => None,
        }
    }

    fn errors(&self) -> Option<Vec<&dyn ErrorDetails>> {
        match self {
            Self::Aggregate(errors) => Some(
                errors
                    .iter()
                    .map(|err| err as &dyn ErrorDetails)
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// Whether `err` occurred before any request bytes were transmitted.
///
/// Checks, in order:
/// 1. Aggregates: every sub-error must itself be a connect error
/// 2. The failed system call is `connect`
/// 3. The code is in [`EARLY_STAGE_NET_ERRORS`]
/// 4. The code is a TLS certificate validation code (`ERR_TLS_CERT_*`)
/// 5. The trace of the error or its cause has an `onConnect*` frame
///
/// The last check is a best-effort heuristic for transports that report no
/// structured code. It is never authoritative and only runs when every
/// structured check has failed.
///
/// # Examples
///
/// ```rust
/// use refetch_transport::{NetworkError, TransportError, is_connect_error};
///
/// let refused = TransportError::from(NetworkError::new("refused").with_code("ECONNREFUSED"));
/// let reset = TransportError::from(NetworkError::new("reset").with_code("ECONNRESET"));
///
/// assert!(is_connect_error(&refused));
/// assert!(!is_connect_error(&reset));
/// ```
pub fn is_connect_error<E: ErrorDetails + ?Sized>(err: &E) -> bool {
    if let Some(errors) = err.errors() {
        return errors.into_iter().all(|sub| is_connect_error(sub));
    }

    if err.syscall() == Some("connect") {
        return true;
    }

    if let Some(code) = err.code()
        && (EARLY_STAGE_NET_ERRORS.iter().any(|known| *known == code)
            || code.starts_with(TLS_CERT_CODE_PREFIX))
    {
        return true;
    }

    occurred_during_connect(err)
}

fn occurred_during_connect<E: ErrorDetails + ?Sized>(err: &E) -> bool {
    [err.trace(), err.cause().and_then(|cause| cause.trace())]
        .into_iter()
        .flatten()
        .any(|trace| ON_CONNECT_FRAME.is_match(trace))
}
