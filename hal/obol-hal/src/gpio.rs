//! GPIO input abstractions
//!
//! The ticker only reads pins: a single mode button, usually wired to
//! ground with the internal pull-up enabled.

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Electrical level that means "asserted"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    ActiveHigh,
    /// Button to ground with pull-up (PRG/BOOTSEL style)
    #[default]
    ActiveLow,
}

/// Input pin paired with the level that counts as pressed
pub struct ActiveInput<P> {
    pin: P,
    polarity: Polarity,
}

impl<P: InputPin> ActiveInput<P> {
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }

    /// True while the input is at its asserted level
    pub fn is_active(&self) -> bool {
        match self.polarity {
            Polarity::ActiveHigh => self.pin.is_high(),
            Polarity::ActiveLow => self.pin.is_low(),
        }
    }
}
