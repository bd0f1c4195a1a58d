//! The backoff strategy trait.

use std::time::Duration;

/// A strategy for spacing out retry attempts.
///
/// Implementations compute how long to wait before the next attempt from the
/// number of attempts already made. They hold no mutable state: the same
/// input always yields the same delay, which lets a single strategy be shared
/// by any number of concurrent calls.
///
/// Any `Fn(u32) -> Duration + Send + Sync` closure is a strategy, which is how
/// callers supply a custom delay function.
///
/// # Examples
///
/// ```rust
/// use refetch_core::retry::BackoffStrategy;
/// use std::time::Duration;
///
/// struct Linear(Duration);
///
/// impl BackoffStrategy for Linear {
///     fn delay_for(&self, attempt: u32) -> Duration {
///         self.0.saturating_mul(attempt)
///     }
/// }
///
/// let linear = Linear(Duration::from_millis(250));
/// assert_eq!(linear.delay_for(4), Duration::from_secs(1));
///
/// let fixed = |_attempt: u32| Duration::from_millis(10);
/// assert_eq!(fixed.delay_for(7), Duration::from_millis(10));
/// ```
pub trait BackoffStrategy: Send + Sync {
    /// Calculate the wait before the next attempt.
    ///
    /// # Parameters
    /// - `attempt`: Attempts already made (0 before the first request,
    ///   N before the (N+1)-th)
    ///
    /// # Notes
    ///
    /// Inputs are not validated. Built-in strategies saturate at
    /// [`Duration::MAX`] instead of overflowing.
    fn delay_for(&self, attempt: u32) -> Duration;
}

impl<F> BackoffStrategy for F
where
    F: Fn(u32) -> Duration + Send + Sync,
{
    fn delay_for(&self, attempt: u32) -> Duration {
        self(attempt)
    }
}
