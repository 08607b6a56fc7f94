//! Display mode and connection state

/// Which screen is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    #[default]
    Ticker,
    Portfolio,
}

impl DisplayMode {
    /// Next mode in the button cycle
    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::Ticker => DisplayMode::Portfolio,
            DisplayMode::Portfolio => DisplayMode::Ticker,
        }
    }
}

/// Transport state as seen by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    #[default]
    Connecting,
    Live,
}

impl LinkState {
    pub fn is_live(self) -> bool {
        self == LinkState::Live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cycles() {
        let mode = DisplayMode::default();
        assert_eq!(mode, DisplayMode::Ticker);
        assert_eq!(mode.toggle(), DisplayMode::Portfolio);
        assert_eq!(mode.toggle().toggle(), DisplayMode::Ticker);
    }
}
