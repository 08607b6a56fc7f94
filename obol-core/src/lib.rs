//! Board-agnostic core logic for the Obol ticker
//!
//! Everything between "a text message arrived" and "this is what the screen
//! should show", with no knowledge of sockets, pixels or pins:
//!
//! - Sample ring buffer and the percent-change alert latch
//! - Request correlator (request id -> role)
//! - Quote and portfolio aggregators
//! - Button debounce and display mode
//! - The session that drives all of the above from a periodic tick
//! - Configuration types and the boot-time config parser

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod alert;
pub mod config;
pub mod correlator;
pub mod history;
pub mod input;
pub mod portfolio;
pub mod quote;
pub mod session;
pub mod state;
pub mod traits;

pub use alert::{AlertEvent, AlertLatch, AlertState};
pub use correlator::{Correlator, CorrelatorError, RequestRole};
pub use history::{PriceHistory, PriceSample, HISTORY_CAPACITY};
pub use input::{ButtonEvent, Debouncer};
pub use portfolio::{Portfolio, MAX_ACCOUNTS};
pub use quote::{QuoteBook, DROPS_PER_XRP, PRICE_CEILING};
pub use session::{Interval, LinkEvent, MessageOutcome, Session, Snapshot, TickReport};
pub use state::{DisplayMode, LinkState};
pub use traits::{Inbound, Inbox, LinkError, RequestSink};
