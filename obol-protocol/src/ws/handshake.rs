//! HTTP/1.1 upgrade handshake

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use core::fmt::Write;
use heapless::String;

/// Errors during the opening handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeError {
    /// Request did not fit the output buffer
    BufferTooSmall,
    /// Server answered with something other than 101 Switching Protocols
    BadStatus,
    /// Response headers were not valid HTTP
    Malformed,
}

/// Base64 of the 16-byte client nonce, used as `Sec-WebSocket-Key`
pub fn encode_key(nonce: &[u8; 16]) -> String<24> {
    let mut buf = [0u8; 24];
    let mut out = String::new();
    if let Ok(n) = STANDARD.encode_slice(nonce, &mut buf) {
        if let Ok(text) = core::str::from_utf8(&buf[..n]) {
            let _ = out.push_str(text);
        }
    }
    out
}

/// Write the upgrade request for `host:port` + `path` into `out`
pub fn write_request<const N: usize>(
    out: &mut String<N>,
    host: &str,
    port: u16,
    path: &str,
    nonce: &[u8; 16],
) -> Result<(), HandshakeError> {
    out.clear();
    let key = encode_key(nonce);
    let path = if path.is_empty() { "/" } else { path };

    write!(
        out,
        "GET {} HTTP/1.1\r\nHost: {}:{}\r\nUpgrade: websocket\r\nConnection: Upgrade\r\n\
         Sec-WebSocket-Key: {}\r\nSec-WebSocket-Version: 13\r\n\r\n",
        path, host, port, key
    )
    .map_err(|_| HandshakeError::BufferTooSmall)
}

/// Check the server's response
///
/// Returns `Ok(None)` until the blank line ending the headers has been
/// received, then `Ok(Some(len))` with the header length. Bytes past `len`
/// already belong to the frame stream.
pub fn check_response(buf: &[u8]) -> Result<Option<usize>, HandshakeError> {
    let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
        return Ok(None);
    };

    let status_line = buf[..end]
        .split(|&b| b == b'\n')
        .next()
        .ok_or(HandshakeError::Malformed)?;
    let status_line = core::str::from_utf8(status_line).map_err(|_| HandshakeError::Malformed)?;

    let mut parts = status_line.trim_end().split(' ');
    match (parts.next(), parts.next()) {
        (Some(version), Some(code)) if version.starts_with("HTTP/1.") => {
            if code == "101" {
                Ok(Some(end + 4))
            } else {
                Err(HandshakeError::BadStatus)
            }
        }
        _ => Err(HandshakeError::Malformed),
    }
}
