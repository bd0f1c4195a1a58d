//! Mapping of reqwest failures onto [`TransportError`]
//!
//! reqwest reports connect-phase problems through opaque error chains. The
//! functions here walk those chains and recover the structured details
//! (`code`, `syscall`, `trace`) that connect classification relies on.

use crate::error::{NetworkError, TransportError};
use std::error::Error as StdError;
use std::io;

/// Convert a reqwest error into a [`TransportError`].
///
/// - Connect failures become [`TransportError::Network`] with syscall
///   `connect`, including connect timeouts (code `ETIMEDOUT`)
/// - Other timeouts become [`TransportError::Timeout`]
/// - Other send/body failures become [`TransportError::Network`] carrying
///   whatever code the source chain reveals
/// - Builder errors (bad URL, bad header) become [`TransportError::InvalidUrl`]
///   or [`TransportError::Http`]
pub fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        return match err.url() {
            Some(url) => TransportError::Http(format!("{} ({})", err, url)),
            None => TransportError::InvalidUrl(err.to_string()),
        };
    }

    let phase = Phase {
        connect: err.is_connect(),
        timeout: err.is_timeout(),
        send: err.is_request() || err.is_body(),
    };

    classify_failure(err.to_string(), phase, &err)
}

/// Where a failed request stopped, as reported by the client
#[derive(Debug, Clone, Copy, Default)]
struct Phase {
    connect: bool,
    timeout: bool,
    send: bool,
}

fn classify_failure(
    message: String,
    phase: Phase,
    err: &(dyn StdError + 'static),
) -> TransportError {
    // Connect wins over timeout: a connect timeout never sent a byte
    if phase.connect {
        let code = if phase.timeout {
            Some("ETIMEDOUT")
        } else {
            code_from_chain(err)
        };
        return network_error(message, code, Some("connect"), err).into();
    }

    if phase.timeout {
        return TransportError::Timeout;
    }

    if phase.send {
        return network_error(message, code_from_chain(err), None, err).into();
    }

    TransportError::Http(message)
}

fn network_error(
    message: String,
    code: Option<&str>,
    syscall: Option<&str>,
    err: &(dyn StdError + 'static),
) -> NetworkError {
    let mut network = NetworkError::new(message);

    if let Some(code) = code {
        network = network.with_code(code);
    }

    if let Some(syscall) = syscall {
        network = network.with_syscall(syscall);
    }

    if let Some(trace) = render_chain(err) {
        network = network.with_trace(trace);
    }

    network
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        classify_reqwest_error(err)
    }
}

/// Find the most specific error code in an error's source chain.
///
/// DNS and certificate failures are recognised from their descriptions since
/// resolvers and TLS stacks do not expose a typed kind through reqwest.
pub(crate) fn code_from_chain(err: &(dyn StdError + 'static)) -> Option<&'static str> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    let mut fallback = None;

    while let Some(err) = current {
        let text = err.to_string().to_lowercase();

        if text.contains("dns error") || text.contains("failed to lookup address") {
            return Some("ENOTFOUND");
        }

        if text.contains("invalid peer certificate") || text.contains("certificate verify failed")
        {
            return Some(certificate_code(&text));
        }

        if fallback.is_none()
            && let Some(io_err) = err.downcast_ref::<io::Error>()
        {
            fallback = code_for_io_kind(io_err.kind());
        }

        current = err.source();
    }

    fallback
}

/// Errno-style code for an I/O error kind
pub(crate) fn code_for_io_kind(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::ConnectionRefused => Some("ECONNREFUSED"),
        io::ErrorKind::ConnectionReset => Some("ECONNRESET"),
        io::ErrorKind::ConnectionAborted => Some("ECONNABORTED"),
        io::ErrorKind::NotConnected => Some("ENOTCONN"),
        io::ErrorKind::AddrNotAvailable => Some("EADDRNOTAVAIL"),
        io::ErrorKind::BrokenPipe => Some("EPIPE"),
        io::ErrorKind::TimedOut => Some("ETIMEDOUT"),
        _ => None,
    }
}

fn certificate_code(text: &str) -> &'static str {
    if text.contains("notvalidforname") || text.contains("hostname mismatch") {
        "ERR_TLS_CERT_ALTNAME_INVALID"
    } else if text.contains("expired") {
        "ERR_TLS_CERT_EXPIRED"
    } else if text.contains("unknownissuer") || text.contains("unknown issuer") {
        "ERR_TLS_CERT_UNKNOWN_ISSUER"
    } else {
        "ERR_TLS_CERT_INVALID"
    }
}

/// Render the source chain below `err`, one cause per line.
pub(crate) fn render_chain(err: &(dyn StdError + 'static)) -> Option<String> {
    let mut lines = Vec::new();
    let mut current = err.source();

    while let Some(cause) = current {
        lines.push(format!("    caused by: {}", cause));
        current = cause.source();
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
