//! Pico W board wiring
//!
//! Peripherals are claimed by type, so the pins are fixed here. The
//! `[pins]` section of ticker.toml documents the wiring and is checked
//! against it at boot.

use defmt::*;

use obol_core::config::PinConfig;

pub const BUTTON_PIN: u8 = 15;
pub const SDA_PIN: u8 = 4;
pub const SCL_PIN: u8 = 5;

/// Warn when ticker.toml disagrees with the wiring compiled in
pub fn check_pins(pins: &PinConfig) {
    let wired = [
        ("button", pins.button, BUTTON_PIN),
        ("sda", pins.sda, SDA_PIN),
        ("scl", pins.scl, SCL_PIN),
    ];
    for (name, configured, actual) in wired {
        if configured != actual {
            warn!(
                "[pins] {} = gpio{} but the board uses gpio{}",
                name, configured, actual
            );
        }
    }
}
