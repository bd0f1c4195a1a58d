//! Delay configuration: a time unit or a full strategy.

use super::quadratic::Quadratic;
use super::strategy::BackoffStrategy;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Time unit used when a configuration does not specify a delay.
pub const DEFAULT_DELAY_UNIT: Duration = Duration::from_secs(30);

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub fn millis_saturating(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// How the wait between attempts is configured.
///
/// A retry configuration accepts either a plain time unit, which selects the
/// default [`Quadratic`] strategy with that unit, or a complete strategy which
/// is then used verbatim. The two cases are distinct variants so that the
/// choice is explicit rather than inferred from the value's shape.
///
/// # Examples
///
/// ```rust
/// use refetch_core::retry::{BackoffStrategy, BinaryExponential, Delay};
/// use std::time::Duration;
///
/// // A unit selects quadratic backoff
/// let unit: Delay = Duration::from_millis(10).into();
/// assert_eq!(unit.into_strategy().delay_for(3), Duration::from_millis(90));
///
/// // A strategy is used as-is
/// let strategy = Delay::strategy(BinaryExponential::new(Duration::from_millis(10)));
/// assert_eq!(strategy.into_strategy().delay_for(3), Duration::from_millis(70));
/// ```
#[derive(Clone)]
pub enum Delay {
    /// Time unit for quadratic backoff.
    Unit(Duration),

    /// A complete backoff strategy.
    Strategy(Arc<dyn BackoffStrategy>),
}

impl Delay {
    /// Use the given strategy verbatim.
    pub fn strategy(strategy: impl BackoffStrategy + 'static) -> Self {
        Self::Strategy(Arc::new(strategy))
    }

    /// Use a delay function verbatim.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Self::Strategy(Arc::new(f))
    }

    /// Whether this delay carries a full strategy rather than a unit.
    pub fn is_strategy(&self) -> bool {
        matches!(self, Self::Strategy(_))
    }

    /// Resolve into the strategy the retry loop consults.
    pub fn into_strategy(self) -> Arc<dyn BackoffStrategy> {
        match self {
            Self::Unit(unit) => Arc::new(Quadratic::new(unit)),
            Self::Strategy(strategy) => strategy,
        }
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::Unit(DEFAULT_DELAY_UNIT)
    }
}

impl From<Duration> for Delay {
    fn from(unit: Duration) -> Self {
        Self::Unit(unit)
    }
}

impl fmt::Debug for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit(unit) => f.debug_tuple("Unit").field(unit).finish(),
            Self::Strategy(_) => f.write_str("Strategy(..)"),
        }
    }
}
