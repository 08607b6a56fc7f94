//! Sample ring buffer
//!
//! A fixed window of recent prices used as the baseline for the
//! percent-change alert. Capacity is a hard invariant: the window spans
//! `capacity * sample interval` of wall-clock time.

use crate::quote::is_plausible;

/// Default number of retained samples
pub const HISTORY_CAPACITY: usize = 60;

/// One recorded price
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PriceSample {
    pub price: f64,
    pub timestamp_ms: u64,
}

impl PriceSample {
    const EMPTY: Self = Self {
        price: 0.0,
        timestamp_ms: 0,
    };
}

/// Circular buffer of price samples
///
/// Slots `0..count` always hold the retained samples; `cursor` is the next
/// slot to overwrite.
#[derive(Debug, Clone)]
pub struct PriceHistory<const N: usize = HISTORY_CAPACITY> {
    samples: [PriceSample; N],
    cursor: usize,
    count: usize,
}

impl<const N: usize> Default for PriceHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PriceHistory<N> {
    pub const fn new() -> Self {
        Self {
            samples: [PriceSample::EMPTY; N],
            cursor: 0,
            count: 0,
        }
    }

    /// Record a price at `now_ms`
    ///
    /// Implausible prices are rejected and leave the buffer untouched.
    pub fn record(&mut self, price: f64, now_ms: u64) -> bool {
        if N == 0 || !is_plausible(price) {
            return false;
        }

        self.samples[self.cursor] = PriceSample {
            price,
            timestamp_ms: now_ms,
        };
        self.cursor = (self.cursor + 1) % N;
        if self.count < N {
            self.count += 1;
        }
        true
    }

    /// Price of the retained sample with the smallest timestamp
    ///
    /// Scans every retained slot instead of trusting the cursor, so a clock
    /// that stepped backwards still yields the true oldest sample.
    pub fn oldest(&self) -> Option<f64> {
        self.samples[..self.count]
            .iter()
            .min_by_key(|s| s.timestamp_ms)
            .map(|s| s.price)
    }

    /// Most recently written sample
    pub fn latest(&self) -> Option<PriceSample> {
        if self.count == 0 {
            return None;
        }
        Some(self.samples[(self.cursor + N - 1) % N])
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_history() {
        let history: PriceHistory<4> = PriceHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.oldest(), None);
        assert_eq!(history.latest(), None);
    }

    #[test]
    fn test_rejects_implausible() {
        let mut history: PriceHistory<4> = PriceHistory::new();
        assert!(!history.record(0.0, 0));
        assert!(!history.record(-1.0, 0));
        assert!(!history.record(10_000.0, 0));
        assert!(!history.record(f64::NAN, 0));
        assert!(history.is_empty());
    }

    #[test]
    fn test_wraps_and_tracks_oldest() {
        let mut history: PriceHistory<3> = PriceHistory::new();
        history.record(1.0, 100);
        history.record(2.0, 200);
        history.record(3.0, 300);
        assert_eq!(history.oldest(), Some(1.0));

        history.record(4.0, 400);
        assert_eq!(history.len(), 3);
        assert_eq!(history.oldest(), Some(2.0));
        assert_eq!(history.latest().map(|s| s.price), Some(4.0));
    }

    #[test]
    fn test_oldest_scans_for_min_timestamp() {
        let mut history: PriceHistory<3> = PriceHistory::new();
        history.record(1.0, 500);
        // Clock stepped backwards
        history.record(2.0, 100);
        history.record(3.0, 300);
        assert_eq!(history.oldest(), Some(2.0));
    }

    proptest! {
        #[test]
        fn prop_len_saturates_and_oldest_is_min_timestamp(
            samples in proptest::collection::vec((0.01f64..9_999.0, 0u64..1_000_000), 0..200)
        ) {
            const C: usize = 60;
            let mut history: PriceHistory<C> = PriceHistory::new();
            for (price, t) in &samples {
                prop_assert!(history.record(*price, *t));
            }

            prop_assert_eq!(history.len(), samples.len().min(C));

            let window = &samples[samples.len().saturating_sub(C)..];
            match window.iter().map(|(_, t)| *t).min() {
                None => prop_assert_eq!(history.oldest(), None),
                Some(min_t) => {
                    // Equal timestamps may resolve to either sample
                    let oldest = history.oldest();
                    prop_assert!(window
                        .iter()
                        .any(|(p, t)| *t == min_t && Some(*p) == oldest));
                }
            }
        }
    }
}
