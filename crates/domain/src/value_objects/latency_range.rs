//! Latency window value object

use serde::Serialize;
use std::fmt;

use crate::errors::DomainError;

/// Inclusive `[start_ms, end_ms]` window the latency assault draws from
///
/// Milliseconds throughout. Negative bounds are unrepresentable by type;
/// `start_ms <= end_ms` is enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatencyRange {
    start_ms: u64,
    end_ms: u64,
}

impl LatencyRange {
    /// Create a latency window with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLatencyRange` when `start_ms > end_ms`.
    pub fn new(start_ms: u64, end_ms: u64) -> Result<Self, DomainError> {
        if start_ms > end_ms {
            return Err(DomainError::InvalidLatencyRange { start_ms, end_ms });
        }
        Ok(Self { start_ms, end_ms })
    }

    /// Lower inclusive bound in milliseconds
    #[must_use]
    pub const fn start_ms(self) -> u64 {
        self.start_ms
    }

    /// Upper inclusive bound in milliseconds
    #[must_use]
    pub const fn end_ms(self) -> u64 {
        self.end_ms
    }

    /// Whether `value_ms` lies within the inclusive window
    #[must_use]
    pub const fn contains(self, value_ms: u64) -> bool {
        value_ms >= self.start_ms && value_ms <= self.end_ms
    }
}

impl Default for LatencyRange {
    /// One to three seconds, the conventional shipping default
    fn default() -> Self {
        Self {
            start_ms: 1_000,
            end_ms: 3_000,
        }
    }
}

impl fmt::Display for LatencyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}ms", self.start_ms, self.end_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range() {
        let range = LatencyRange::new(10, 50).expect("valid range");
        assert_eq!(range.start_ms(), 10);
        assert_eq!(range.end_ms(), 50);
    }

    #[test]
    fn test_degenerate_range_is_valid() {
        let range = LatencyRange::new(100, 100).expect("valid range");
        assert!(range.contains(100));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        assert!(LatencyRange::new(50, 10).is_err());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = LatencyRange::new(10, 50).expect("valid range");
        assert!(range.contains(10));
        assert!(range.contains(50));
        assert!(range.contains(30));
        assert!(!range.contains(9));
        assert!(!range.contains(51));
    }

    #[test]
    fn test_default_is_one_to_three_seconds() {
        let range = LatencyRange::default();
        assert_eq!(range.start_ms(), 1_000);
        assert_eq!(range.end_ms(), 3_000);
    }

    #[test]
    fn test_display() {
        let range = LatencyRange::new(10, 50).expect("valid range");
        assert_eq!(format!("{range}"), "10..=50ms");
    }
}
