#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core primitives for the refetch retry layer.
//!
//! This crate provides the pieces of the retry engine that have no knowledge
//! of HTTP:
//!
//! - **Backoff strategies** via the [`BackoffStrategy`](retry::BackoffStrategy) trait
//!   - Quadratic backoff (`attempt² × unit`)
//!   - Binary exponential backoff (`(2^attempt − 1) × unit`)
//!   - Any `Fn(u32) -> Duration` closure
//! - **Delay selection** via [`Delay`](retry::Delay), the tagged
//!   "unit or full strategy" configuration value
//! - **Sleep capability** via the [`Sleeper`](sleep::Sleeper) trait, with a
//!   tokio-backed implementation that skips sub-millisecond timers
//!
//! # Examples
//!
//! ```rust
//! use refetch_core::prelude::*;
//! use std::time::Duration;
//!
//! let backoff = Quadratic::new(Duration::from_millis(100));
//! assert_eq!(backoff.delay_for(0), Duration::ZERO);
//! assert_eq!(backoff.delay_for(3), Duration::from_millis(900));
//!
//! let custom = Delay::from_fn(|attempt| Duration::from_secs(attempt.into()));
//! assert_eq!(custom.into_strategy().delay_for(2), Duration::from_secs(2));
//! ```

pub mod retry;
pub mod sleep;

/// Convenient re-exports of commonly used items.
///
/// Import all core abstractions with:
///
/// ```rust
/// use refetch_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::retry::{
        BackoffStrategy, BinaryExponential, Delay, Quadratic, binary_exponential, quadratic,
    };
    pub use crate::sleep::{Sleeper, TokioSleeper};
}
