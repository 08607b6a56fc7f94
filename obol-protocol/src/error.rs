//! Protocol errors

use crate::ws::{FrameError, HandshakeError};

/// Errors raised while encoding or decoding ledger traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Text was not valid JSON or did not match the response schema
    Json,
    /// Response had no integer `id`
    MissingId,
    /// WebSocket framing error
    Frame(FrameError),
    /// Upgrade handshake failed
    Handshake(HandshakeError),
}

impl From<serde_json::Error> for ProtocolError {
    fn from(_: serde_json::Error) -> Self {
        ProtocolError::Json
    }
}

impl From<FrameError> for ProtocolError {
    fn from(e: FrameError) -> Self {
        ProtocolError::Frame(e)
    }
}

impl From<HandshakeError> for ProtocolError {
    fn from(e: HandshakeError) -> Self {
        ProtocolError::Handshake(e)
    }
}
