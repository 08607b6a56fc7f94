//! RP2040-specific HAL for the Obol ticker
//!
//! Implements the shared `obol-hal` traits on top of `embassy-rp`.

#![no_std]

pub mod gpio;

pub use gpio::{button_input, RpInput};
pub use obol_hal::{ActiveInput, InputPin, Polarity};
