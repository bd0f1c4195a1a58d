//! Quadratic backoff.

use super::strategy::BackoffStrategy;
use std::time::Duration;

/// Quadratic backoff: the delay grows with the square of the attempt count.
///
/// This is the strategy used when a retry configuration supplies a plain time
/// unit instead of a delay function.
///
/// # Mathematical Formula
///
/// ```text
/// delay(attempt) = attempt² × unit
/// ```
///
/// | attempt | delay (unit = 100ms) |
/// |---------|----------------------|
/// | 0       | 0ms                  |
/// | 1       | 100ms                |
/// | 2       | 400ms                |
/// | 3       | 900ms                |
///
/// # Examples
///
/// ```rust
/// use refetch_core::retry::{BackoffStrategy, Quadratic};
/// use std::time::Duration;
///
/// let backoff = Quadratic::new(Duration::from_secs(1));
/// assert_eq!(backoff.delay_for(4), Duration::from_secs(16));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quadratic {
    unit: Duration,
}

impl Quadratic {
    /// Create a quadratic backoff with the given time unit.
    pub fn new(unit: Duration) -> Self {
        Self { unit }
    }

    /// The time unit multiplied by `attempt²`.
    pub fn unit(&self) -> Duration {
        self.unit
    }
}

impl BackoffStrategy for Quadratic {
    fn delay_for(&self, attempt: u32) -> Duration {
        self.unit.saturating_mul(attempt.saturating_mul(attempt))
    }
}

/// Build a [`Quadratic`] backoff with the given time unit.
pub fn quadratic(unit: Duration) -> Quadratic {
    Quadratic::new(unit)
}

/// Build a [`Quadratic`] backoff.
///
/// Older releases exposed the quadratic strategy under this name.
#[deprecated(note = "the strategy grows quadratically; use `quadratic` instead")]
pub fn exponential(unit: Duration) -> Quadratic {
    Quadratic::new(unit)
}
