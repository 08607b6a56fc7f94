//! WebSocket client transport (RFC 6455)
//!
//! Only what a ticker client needs: masked outbound frames, an incremental
//! inbound parser that reassembles fragmented text messages, and the HTTP
//! upgrade handshake.

pub mod frame;
pub mod handshake;

pub use frame::{
    encode_frame, FrameError, FrameParser, Opcode, WsEvent, MAX_CONTROL_PAYLOAD,
    MAX_MESSAGE_SIZE,
};
pub use handshake::{check_response, write_request, HandshakeError};
