//! Sleep capability consumed by the retry loop.
//!
//! The retry loop never touches a timer directly; it asks a [`Sleeper`] to
//! suspend it. [`TokioSleeper`] is the production implementation, and tests
//! or alternative runtimes can substitute their own.

use async_trait::async_trait;
use std::time::Duration;

/// Waits shorter than this resolve immediately without registering a timer.
pub const MIN_TIMER_RESOLUTION: Duration = Duration::from_millis(1);

/// Suspends the current task for a duration.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Resolve after `duration` has elapsed.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        sleep(duration).await;
    }
}

/// Sleep for `duration` on the tokio timer.
///
/// Durations under [`MIN_TIMER_RESOLUTION`] return without yielding to the
/// scheduler, so a zero backoff costs nothing.
pub async fn sleep(duration: Duration) {
    if duration < MIN_TIMER_RESOLUTION {
        return;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        delay_ms = crate::retry::millis_saturating(duration),
        "sleeping before retry"
    );

    tokio::time::sleep(duration).await;
}
