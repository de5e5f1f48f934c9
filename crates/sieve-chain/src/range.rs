use crate::{Error, Result};
use core::ops::RangeInclusive;

/// Smallest value the sieve accepts as a lower bound.
pub const MIN_LOW: u64 = 2;

/// Default upper bound, kept for output compatibility with the classic
/// `primes` exercise.
pub const DEFAULT_HIGH: u64 = 35;

/// An inclusive range of integers whose primes should be reported.
///
/// A range with `low > high` is valid and empty: running it discovers nothing
/// and the head stage exits without a base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateRange {
    low: u64,
    high: u64,
}

impl CandidateRange {
    /// Creates a range, rejecting lower bounds below [`MIN_LOW`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if `low < 2`. A value of 0 or 1 would
    /// become a stage base and filter incorrectly.
    pub fn new(low: u64, high: u64) -> Result<Self> {
        if low < MIN_LOW {
            return Err(Error::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    /// A range `[2, high]`.
    pub fn up_to(high: u64) -> Self {
        Self {
            low: MIN_LOW,
            high,
        }
    }

    pub const fn low(&self) -> u64 {
        self.low
    }

    pub const fn high(&self) -> u64 {
        self.high
    }

    pub const fn is_empty(&self) -> bool {
        self.low > self.high
    }

    /// The values fed into the first stage.
    ///
    /// Primes below `low` are still needed as filters, so the stream always
    /// starts at 2. When `low` is 2 this is exactly `low..=high`. An empty
    /// range produces an empty stream.
    pub fn seed(&self) -> RangeInclusive<u64> {
        if self.is_empty() {
            // `1..=0` is the canonical empty inclusive range.
            return 1..=0;
        }
        MIN_LOW..=self.high
    }

    /// Whether a discovered prime falls inside the reported window.
    pub const fn reports(&self, prime: u64) -> bool {
        prime >= self.low && prime <= self.high
    }
}

impl Default for CandidateRange {
    fn default() -> Self {
        Self::up_to(DEFAULT_HIGH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_low_below_two() {
        assert!(matches!(
            CandidateRange::new(1, 10),
            Err(Error::InvalidRange { low: 1, high: 10 })
        ));
        assert!(CandidateRange::new(0, 0).is_err());
    }

    #[test]
    fn default_is_two_to_thirty_five() {
        let range = CandidateRange::default();
        assert_eq!(range.low(), 2);
        assert_eq!(range.high(), 35);
        assert_eq!(range.seed().count(), 34);
    }

    #[test]
    fn inverted_range_seeds_nothing() {
        let range = CandidateRange::new(9, 3).unwrap();
        assert!(range.is_empty());
        assert_eq!(range.seed().count(), 0);
    }

    #[test]
    fn raised_floor_still_seeds_from_two() {
        let range = CandidateRange::new(10, 20).unwrap();
        assert_eq!(range.seed(), 2..=20);
        assert!(!range.reports(7));
        assert!(range.reports(11));
        assert!(!range.reports(23));
    }
}
