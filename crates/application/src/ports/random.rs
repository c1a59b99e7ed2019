//! Randomness port
//!
//! Every probabilistic choice the engine makes goes through this trait so
//! tests can pin the draws and the convergence properties stay checkable.

use domain::LatencyRange;
#[cfg(test)]
use mockall::automock;

/// Source of the engine's random draws
///
/// Adapters back this with a real generator; tests substitute fixed or
/// seeded sequences.
#[cfg_attr(test, automock)]
pub trait RandomSource: Send + Sync {
    /// Uniform draw in `[0.0, 1.0)`, compared against the level probability
    fn roll(&self) -> f64;

    /// Uniform index in `[0, bound)`; callers guarantee `bound >= 1`
    fn pick(&self, bound: usize) -> usize;

    /// Uniform delay drawn from the inclusive window, in milliseconds
    fn delay_ms(&self, range: LatencyRange) -> u64;
}
