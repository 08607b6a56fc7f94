//! Obol Hardware Abstraction Layer
//!
//! Traits that chip-specific HALs implement so the ticker logic and the
//! drivers never name a concrete GPIO type.
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  obol-drivers / obol-firmware       │
//! └─────────────────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────┐
//! │  obol-hal (this crate - traits)     │
//! └─────────────────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────┐
//! │  obol-hal-rp2040                    │
//! └─────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

pub use gpio::{ActiveInput, InputPin, Polarity};
