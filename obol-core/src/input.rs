//! Button debounce

/// Default time the level must be stable before a press counts
pub const DEBOUNCE_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Pressed,
}

/// Edge detection with a minimum stable duration
///
/// A press is reported once, on the first sample after the input has been
/// held for `stable_ms`. The button must be released before it can report
/// again.
#[derive(Debug, Clone)]
pub struct Debouncer {
    stable_ms: u64,
    level: bool,
    since_ms: u64,
    reported: bool,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_MS)
    }
}

impl Debouncer {
    pub fn new(stable_ms: u64) -> Self {
        Self {
            stable_ms,
            level: false,
            since_ms: 0,
            reported: false,
        }
    }

    /// Feed the current (active-high) button level
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> Option<ButtonEvent> {
        if pressed != self.level {
            self.level = pressed;
            self.since_ms = now_ms;
            if !pressed {
                self.reported = false;
            }
        }

        if self.level && !self.reported && now_ms.saturating_sub(self.since_ms) >= self.stable_ms {
            self.reported = true;
            return Some(ButtonEvent::Pressed);
        }
        None
    }
}
