//! HTTP transport implementation
//!
//! Provides the default reqwest-backed transport. It performs exactly one
//! request per call; retries belong to the layer above.

pub mod classify;
pub mod client;

pub use classify::classify_reqwest_error;
pub use client::{HttpTransport, HttpTransportConfig};
