//! GPIO wrappers
//!
//! `embassy_rp::gpio::Input` and `obol_hal::InputPin` are both foreign to
//! this crate, hence the newtype.

use embassy_rp::gpio::{Input, Pin, Pull};
use embassy_rp::Peri;

use obol_hal::{ActiveInput, InputPin, Polarity};

/// RP2040 input pin
pub struct RpInput<'d> {
    inner: Input<'d>,
}

impl<'d> RpInput<'d> {
    pub fn new(inner: Input<'d>) -> Self {
        Self { inner }
    }
}

impl InputPin for RpInput<'_> {
    fn is_high(&self) -> bool {
        self.inner.is_high()
    }

    fn is_low(&self) -> bool {
        self.inner.is_low()
    }
}

/// Configure a pin as an active-low button with the internal pull-up
pub fn button_input<'d>(pin: Peri<'d, impl Pin>) -> ActiveInput<RpInput<'d>> {
    let input = Input::new(pin, Pull::Up);
    ActiveInput::new(RpInput::new(input), Polarity::ActiveLow)
}
