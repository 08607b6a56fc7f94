//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the render collaborator
//! defined in obol-display:
//!
//! - `FrameBuffer`: 128x64 monochrome buffer, an `embedded-graphics`
//!   draw target and an obol-display `Canvas`
//! - `Ssd1306`: async I2C driver that pushes the buffer to the panel

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod display;

pub use display::{FrameBuffer, Ssd1306};
