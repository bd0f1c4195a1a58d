//! Binary exponential backoff.

use super::strategy::BackoffStrategy;
use std::time::Duration;

/// Binary exponential backoff: `(2^attempt − 1) × unit`.
///
/// The `− 1` keeps the first request immediate (`2^0 − 1 = 0`) while later
/// waits roughly double.
///
/// | attempt | delay (unit = 1s) |
/// |---------|-------------------|
/// | 0       | 0s                |
/// | 1       | 1s                |
/// | 2       | 3s                |
/// | 3       | 7s                |
///
/// The default unit is one millisecond.
///
/// # Examples
///
/// ```rust
/// use refetch_core::retry::{BackoffStrategy, BinaryExponential};
/// use std::time::Duration;
///
/// let backoff = BinaryExponential::default();
/// assert_eq!(backoff.delay_for(5), Duration::from_millis(31));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryExponential {
    unit: Duration,
}

impl BinaryExponential {
    /// Create a binary exponential backoff with the given time unit.
    pub fn new(unit: Duration) -> Self {
        Self { unit }
    }

    /// The time unit multiplied by `2^attempt − 1`.
    pub fn unit(&self) -> Duration {
        self.unit
    }
}

impl Default for BinaryExponential {
    fn default() -> Self {
        Self::new(Duration::from_millis(1))
    }
}

impl BackoffStrategy for BinaryExponential {
    fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).map_or(u32::MAX, |n| n - 1);
        self.unit.saturating_mul(factor)
    }
}

/// Build a [`BinaryExponential`] backoff with the given time unit.
pub fn binary_exponential(unit: Duration) -> BinaryExponential {
    BinaryExponential::new(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_unit() {
        let backoff = BinaryExponential::default();

        for attempt in 0..=5u32 {
            assert_eq!(
                backoff.delay_for(attempt),
                Duration::from_millis((1u64 << attempt) - 1),
                "unexpected delay after {} attempts",
                attempt
            );
        }
    }

    #[test]
    fn test_unit_one_second() {
        let backoff = binary_exponential(Duration::from_secs(1));

        assert_eq!(backoff.delay_for(0), Duration::ZERO);
        assert_eq!(backoff.delay_for(1), Duration::from_secs(1));
        assert_eq!(backoff.delay_for(2), Duration::from_secs(3));
        assert_eq!(backoff.delay_for(5), Duration::from_secs(31));
    }

    #[test]
    fn test_large_attempt_saturates() {
        let backoff = binary_exponential(Duration::from_secs(1));

        assert_eq!(backoff.delay_for(32), Duration::from_secs(u64::from(u32::MAX)));
        assert_eq!(backoff.delay_for(u32::MAX), Duration::from_secs(u64::from(u32::MAX)));
    }

    proptest! {
        /// Invariant: delay(attempt) = (2^attempt − 1) × unit
        #[test]
        fn prop_binary_exponential_formula(attempt in 0u32..20, unit_ms in 0u64..100_000) {
            let backoff = BinaryExponential::new(Duration::from_millis(unit_ms));
            let expected = Duration::from_millis(((1u64 << attempt) - 1) * unit_ms);

            prop_assert_eq!(backoff.delay_for(attempt), expected);
        }

        /// Invariant: the strategy never shrinks as attempts grow
        #[test]
        fn prop_binary_exponential_non_decreasing(attempt in 0u32..64, unit_ms in 0u64..10_000) {
            let backoff = BinaryExponential::new(Duration::from_millis(unit_ms));

            prop_assert!(backoff.delay_for(attempt) <= backoff.delay_for(attempt + 1));
        }
    }
}
