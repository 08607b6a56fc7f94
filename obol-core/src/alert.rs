//! Percent-change alert latch
//!
//! Compares the current price against the oldest retained sample. Crossing
//! the threshold latches the alert for a fixed flash duration; the latch
//! clears on time alone, whatever the change does meanwhile.
//!
//! The latch re-arms only after the change drops below the threshold: a
//! change that stays at or above it after the flash clears raises nothing.

/// Latch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertState {
    #[default]
    Inactive,
    Active {
        since_ms: u64,
    },
}

/// Transitions reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertEvent {
    Raised,
    Cleared,
}

/// Percent change of `current` relative to `oldest`, 0 when no baseline
pub fn percent_change(current: f64, oldest: Option<f64>) -> f64 {
    match oldest {
        Some(base) if base > 0.0 => (current - base) / base * 100.0,
        _ => 0.0,
    }
}

#[derive(Debug, Clone)]
pub struct AlertLatch {
    threshold_pct: f64,
    flash_ms: u64,
    state: AlertState,
    percent_change: f64,
    /// Change has been under the threshold since the last activation
    armed: bool,
}

impl AlertLatch {
    pub fn new(threshold_pct: f64, flash_ms: u64) -> Self {
        Self {
            threshold_pct,
            flash_ms,
            state: AlertState::Inactive,
            percent_change: 0.0,
            armed: true,
        }
    }

    /// Evaluate a new price against the baseline
    ///
    /// Non-positive prices are ignored. The timeout is checked after the
    /// threshold test.
    pub fn check(&mut self, current: f64, oldest: Option<f64>, now_ms: u64) -> Option<AlertEvent> {
        let before = self.state;

        if current > 0.0 {
            self.percent_change = percent_change(current, oldest);
            let over = self.percent_change.abs() >= self.threshold_pct;

            match self.state {
                AlertState::Inactive if over && self.armed => {
                    self.state = AlertState::Active { since_ms: now_ms };
                    self.armed = false;
                }
                _ if !over => self.armed = true,
                _ => {}
            }
        }

        self.expire(now_ms);
        transition(before, self.state)
    }

    /// Clear the latch once the flash duration has elapsed
    pub fn expire(&mut self, now_ms: u64) -> Option<AlertEvent> {
        if let AlertState::Active { since_ms } = self.state {
            if now_ms.saturating_sub(since_ms) >= self.flash_ms {
                self.state = AlertState::Inactive;
                return Some(AlertEvent::Cleared);
            }
        }
        None
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, AlertState::Active { .. })
    }

    /// Change computed by the last `check`
    pub fn percent_change(&self) -> f64 {
        self.percent_change
    }
}

fn transition(before: AlertState, after: AlertState) -> Option<AlertEvent> {
    match (before, after) {
        (AlertState::Inactive, AlertState::Active { .. }) => Some(AlertEvent::Raised),
        (AlertState::Active { .. }, AlertState::Inactive) => Some(AlertEvent::Cleared),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_baseline_is_zero_change() {
        let mut latch = AlertLatch::new(1.0, 10_000);
        assert_eq!(latch.check(2.0, None, 0), None);
        assert_eq!(latch.percent_change(), 0.0);
        assert!(!latch.is_active());
    }

    #[test]
    fn test_activates_then_clears_after_flash() {
        let mut latch = AlertLatch::new(1.0, 10_000);

        assert_eq!(latch.check(2.021, Some(2.000), 1_000), Some(AlertEvent::Raised));
        assert!((latch.percent_change() - 1.05).abs() < 1e-9);
        assert!(latch.is_active());

        assert_eq!(latch.expire(10_999), None);
        assert!(latch.is_active());

        assert_eq!(latch.expire(11_000), Some(AlertEvent::Cleared));
        assert!(!latch.is_active());
        assert!((latch.percent_change() - 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_edge_triggered() {
        let mut latch = AlertLatch::new(1.0, 10_000);
        let mut raised = 0;

        // Step above the threshold and stay there
        for i in 0..10u64 {
            if latch.check(2.05, Some(2.0), i * 5_000) == Some(AlertEvent::Raised) {
                raised += 1;
            }
        }
        assert_eq!(raised, 1);
        assert!(!latch.is_active());

        // Dropping back under re-arms
        latch.check(2.001, Some(2.0), 60_000);
        assert_eq!(latch.check(1.9, Some(2.0), 65_000), Some(AlertEvent::Raised));
    }

    #[test]
    fn test_growing_change_does_not_extend_flash() {
        let mut latch = AlertLatch::new(1.0, 10_000);
        latch.check(2.03, Some(2.0), 0);
        latch.check(2.20, Some(2.0), 5_000);
        assert!(latch.is_active());
        assert_eq!(latch.check(2.40, Some(2.0), 10_000), Some(AlertEvent::Cleared));
    }

    #[test]
    fn test_negative_change_triggers() {
        let mut latch = AlertLatch::new(1.0, 10_000);
        assert_eq!(latch.check(1.97, Some(2.0), 0), Some(AlertEvent::Raised));
    }

    #[test]
    fn test_non_positive_price_ignored() {
        let mut latch = AlertLatch::new(1.0, 10_000);
        assert_eq!(latch.check(0.0, Some(2.0), 0), None);
        assert_eq!(latch.percent_change(), 0.0);
    }
}
