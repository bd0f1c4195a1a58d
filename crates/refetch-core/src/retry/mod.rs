//! Backoff strategies and delay selection.
//!
//! A backoff strategy maps the zero-based number of attempts already made to
//! the time to wait before the next one. Every built-in strategy is pure and
//! returns [`Duration::ZERO`](std::time::Duration::ZERO) for attempt 0, so
//! the first request is never delayed.
//!
//! # Key Types
//!
//! - [`BackoffStrategy`] - Core trait for delay strategies
//! - [`Quadratic`] - `attempt² × unit`
//! - [`BinaryExponential`] - `(2^attempt − 1) × unit`
//! - [`Delay`] - A time unit for the default strategy, or a full strategy
//!
//! # Examples
//!
//! ```rust
//! use refetch_core::retry::{BackoffStrategy, binary_exponential};
//! use std::time::Duration;
//!
//! let backoff = binary_exponential(Duration::from_secs(1));
//! assert_eq!(backoff.delay_for(3), Duration::from_secs(7));
//! ```

mod binary_exponential;
mod delay;
mod quadratic;
mod strategy;

pub use binary_exponential::{BinaryExponential, binary_exponential};
pub use delay::{DEFAULT_DELAY_UNIT, Delay, millis_saturating};
#[allow(deprecated)]
pub use quadratic::exponential;
pub use quadratic::{Quadratic, quadratic};
pub use strategy::BackoffStrategy;
