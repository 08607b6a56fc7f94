//! Ledger WebSocket protocol
//!
//! Everything the ticker exchanges with the public ledger server, from the
//! bytes on the socket up to typed responses:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ ledger  (JSON requests and   │
//! │          responses, serde)   │
//! ├──────────────────────────────┤
//! │ ws      (RFC 6455 frames,    │
//! │          upgrade handshake)  │
//! ├──────────────────────────────┤
//! │ TLS / TCP (firmware)         │
//! └──────────────────────────────┘
//! ```
//!
//! Every request carries a unique integer `id` that the server echoes back;
//! matching responses to requests is the caller's job.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod error;
pub mod ledger;
pub mod ws;

pub use error::ProtocolError;
pub use ledger::{
    parse_response, AccountData, Amount, IssuedAmount, IssuedCurrency, Offer, OfferQuote,
    Payload, Response, Side, Status,
};
pub use ws::{FrameError, FrameParser, Opcode, WsEvent, MAX_MESSAGE_SIZE};
