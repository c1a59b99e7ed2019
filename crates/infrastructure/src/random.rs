//! Thread-local randomness adapter

use application::RandomSource;
use domain::LatencyRange;
use rand::Rng;

/// [`RandomSource`] backed by the thread-local generator
///
/// Each call draws from the calling thread's own generator, so concurrent
/// decisions never contend on shared state.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl ThreadRngSource {
    /// Create the adapter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RandomSource for ThreadRngSource {
    fn roll(&self) -> f64 {
        rand::rng().random::<f64>()
    }

    fn pick(&self, bound: usize) -> usize {
        rand::rng().random_range(0..bound)
    }

    fn delay_ms(&self, range: LatencyRange) -> u64 {
        rand::rng().random_range(range.start_ms()..=range.end_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_stays_in_the_unit_interval() {
        let source = ThreadRngSource::new();
        for _ in 0..1_000 {
            let roll = source.roll();
            assert!((0.0..1.0).contains(&roll));
        }
    }

    #[test]
    fn pick_respects_the_bound() {
        let source = ThreadRngSource::new();
        for bound in [1, 2, 7] {
            for _ in 0..200 {
                assert!(source.pick(bound) < bound);
            }
        }
    }

    #[test]
    fn pick_reaches_every_index_eventually() {
        let source = ThreadRngSource::new();
        let mut seen = [false; 4];
        for _ in 0..1_000 {
            seen[source.pick(4)] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn delay_lands_inside_the_range() {
        let source = ThreadRngSource::new();
        let range = LatencyRange::new(10, 50).expect("valid range");
        for _ in 0..1_000 {
            assert!(range.contains(source.delay_ms(range)));
        }
    }

    #[test]
    fn degenerate_range_yields_its_single_value() {
        let source = ThreadRngSource::new();
        let range = LatencyRange::new(25, 25).expect("valid range");
        assert_eq!(source.delay_ms(range), 25);
    }
}
