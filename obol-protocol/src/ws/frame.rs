//! Frame encoding and decoding for WebSocket connections.
//!
//! Frame format:
//! - byte 0: FIN bit, three reserved bits, 4-bit opcode
//! - byte 1: MASK bit, 7-bit payload length (126 = 16-bit extended length
//!   follows, 127 = 64-bit extended length follows)
//! - 0, 2 or 8 bytes of extended length (big endian)
//! - 4-byte masking key when MASK is set (always set by clients)
//! - payload

use alloc::string::String;
use heapless::Vec;

/// Largest reassembled text message accepted from the server
pub const MAX_MESSAGE_SIZE: usize = 4096;

/// Control frames (close, ping, pong) carry at most 125 payload bytes
pub const MAX_CONTROL_PAYLOAD: usize = 125;

const FIN_BIT: u8 = 0x80;
const RSV_BITS: u8 = 0x70;
const MASK_BIT: u8 = 0x80;
const LEN_16: u8 = 126;
const LEN_64: u8 = 127;

/// Frame opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Opcode {
    Continuation = 0x0,
    Text = 0x1,
    Binary = 0x2,
    Close = 0x8,
    Ping = 0x9,
    Pong = 0xA,
}

impl Opcode {
    /// Decode the low nibble of the first header byte
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x0F {
            0x0 => Some(Opcode::Continuation),
            0x1 => Some(Opcode::Text),
            0x2 => Some(Opcode::Binary),
            0x8 => Some(Opcode::Close),
            0x9 => Some(Opcode::Ping),
            0xA => Some(Opcode::Pong),
            _ => None,
        }
    }

    pub fn is_control(self) -> bool {
        matches!(self, Opcode::Close | Opcode::Ping | Opcode::Pong)
    }
}

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Message exceeds `MAX_MESSAGE_SIZE` (the frame was consumed, stream still in sync)
    PayloadTooLarge,
    /// Reserved bits, unknown opcode or oversized control frame
    InvalidFrame,
    /// Continuation frame with no message in progress
    UnexpectedContinuation,
    /// Text message was not valid UTF-8
    InvalidUtf8,
    /// Buffer too small for encoding
    BufferTooSmall,
}

impl FrameError {
    /// Whether the parser can keep reading from the same stream
    pub fn is_recoverable(self) -> bool {
        matches!(self, FrameError::PayloadTooLarge | FrameError::InvalidUtf8)
    }
}

/// Something the application has to act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsEvent {
    /// Complete (possibly reassembled) text message
    Text(String),
    /// Ping; the payload must be echoed back in a pong
    Ping(Vec<u8, MAX_CONTROL_PAYLOAD>),
    Pong,
    /// Server is closing, with its status code when one was sent
    Close(Option<u16>),
}

/// Size of the client frame header for a payload of `len` bytes
pub const fn header_len(len: usize) -> usize {
    let ext = if len < LEN_16 as usize {
        0
    } else if len <= u16::MAX as usize {
        2
    } else {
        8
    };
    2 + ext + 4
}

/// Encode a single unfragmented, masked client frame
///
/// Returns the number of bytes written
pub fn encode_frame(
    opcode: Opcode,
    payload: &[u8],
    mask_key: [u8; 4],
    buffer: &mut [u8],
) -> Result<usize, FrameError> {
    if opcode.is_control() && payload.len() > MAX_CONTROL_PAYLOAD {
        return Err(FrameError::PayloadTooLarge);
    }

    let header = header_len(payload.len());
    let frame_len = header + payload.len();
    if buffer.len() < frame_len {
        return Err(FrameError::BufferTooSmall);
    }

    buffer[0] = FIN_BIT | opcode as u8;
    let mut pos = 2;
    if payload.len() < LEN_16 as usize {
        buffer[1] = MASK_BIT | payload.len() as u8;
    } else if payload.len() <= u16::MAX as usize {
        buffer[1] = MASK_BIT | LEN_16;
        buffer[2..4].copy_from_slice(&(payload.len() as u16).to_be_bytes());
        pos = 4;
    } else {
        buffer[1] = MASK_BIT | LEN_64;
        buffer[2..10].copy_from_slice(&(payload.len() as u64).to_be_bytes());
        pos = 10;
    }

    buffer[pos..pos + 4].copy_from_slice(&mask_key);
    pos += 4;

    for (i, &byte) in payload.iter().enumerate() {
        buffer[pos + i] = byte ^ mask_key[i % 4];
    }

    Ok(frame_len)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for FIN/opcode byte
    WaitingForHeader,
    /// Got opcode, waiting for MASK/length byte
    WaitingForLength,
    /// Reading 2 or 8 extended length bytes
    ReadingExtendedLength,
    /// Reading the 4-byte masking key
    ReadingMask,
    /// Reading payload bytes
    ReadingPayload,
}

/// State machine for parsing incoming frames
///
/// Server frames are normally unmasked; masked frames are unmasked anyway.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    fin: bool,
    opcode: Opcode,
    masked: bool,
    mask: [u8; 4],
    length: u64,
    /// Extended length or mask bytes still expected
    pending: u8,
    payload_read: u64,
    control: Vec<u8, MAX_CONTROL_PAYLOAD>,
    message: Vec<u8, MAX_MESSAGE_SIZE>,
    /// Opcode of the data message being reassembled
    fragment: Option<Opcode>,
    /// Current message overflowed; consume it without storing
    overflow: bool,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForHeader,
            fin: false,
            opcode: Opcode::Continuation,
            masked: false,
            mask: [0; 4],
            length: 0,
            pending: 0,
            payload_read: 0,
            control: Vec::new(),
            message: Vec::new(),
            fragment: None,
            overflow: false,
        }
    }

    /// Reset the parser state, dropping any partial message
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(event))` when a frame completes something the
    /// application must see, `Ok(None)` when more bytes are needed. After an
    /// error that is not [`FrameError::is_recoverable`] the parser has been
    /// reset and the stream should be abandoned.
    pub fn feed(&mut self, byte: u8) -> Result<Option<WsEvent>, FrameError> {
        match self.state {
            ParseState::WaitingForHeader => {
                self.start_frame(byte)?;
                Ok(None)
            }
            ParseState::WaitingForLength => {
                self.masked = byte & MASK_BIT != 0;
                let len = byte & 0x7F;
                self.length = 0;
                match len {
                    LEN_16 => {
                        self.pending = 2;
                        self.state = ParseState::ReadingExtendedLength;
                        Ok(None)
                    }
                    LEN_64 => {
                        self.pending = 8;
                        self.state = ParseState::ReadingExtendedLength;
                        Ok(None)
                    }
                    _ => {
                        self.length = len as u64;
                        self.length_known()
                    }
                }
            }
            ParseState::ReadingExtendedLength => {
                self.length = (self.length << 8) | byte as u64;
                self.pending -= 1;
                if self.pending == 0 {
                    self.length_known()
                } else {
                    Ok(None)
                }
            }
            ParseState::ReadingMask => {
                self.mask[4 - self.pending as usize] = byte;
                self.pending -= 1;
                if self.pending == 0 {
                    self.start_payload()
                } else {
                    Ok(None)
                }
            }
            ParseState::ReadingPayload => {
                let byte = if self.masked {
                    byte ^ self.mask[(self.payload_read % 4) as usize]
                } else {
                    byte
                };
                self.payload_read += 1;

                if self.opcode.is_control() {
                    // Length already checked against MAX_CONTROL_PAYLOAD
                    let _ = self.control.push(byte);
                } else if self.fragment == Some(Opcode::Text) && !self.overflow {
                    let _ = self.message.push(byte);
                }

                if self.payload_read == self.length {
                    self.finish_frame()
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Feed bytes until an event is produced
    ///
    /// Returns the number of bytes consumed together with the event, so the
    /// caller can continue with the remainder.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (usize, Result<Option<WsEvent>, FrameError>) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => {}
                other => return (i + 1, other),
            }
        }
        (bytes.len(), Ok(None))
    }

    fn start_frame(&mut self, byte: u8) -> Result<(), FrameError> {
        if byte & RSV_BITS != 0 {
            self.reset();
            return Err(FrameError::InvalidFrame);
        }
        let Some(opcode) = Opcode::from_bits(byte) else {
            self.reset();
            return Err(FrameError::InvalidFrame);
        };
        let fin = byte & FIN_BIT != 0;

        match opcode {
            Opcode::Continuation if self.fragment.is_none() => {
                self.reset();
                return Err(FrameError::UnexpectedContinuation);
            }
            Opcode::Text | Opcode::Binary => {
                if self.fragment.is_some() {
                    self.reset();
                    return Err(FrameError::InvalidFrame);
                }
                self.fragment = Some(opcode);
                self.message.clear();
                self.overflow = false;
            }
            op if op.is_control() && !fin => {
                self.reset();
                return Err(FrameError::InvalidFrame);
            }
            _ => {}
        }

        self.fin = fin;
        self.opcode = opcode;
        self.payload_read = 0;
        self.control.clear();
        self.state = ParseState::WaitingForLength;
        Ok(())
    }

    fn length_known(&mut self) -> Result<Option<WsEvent>, FrameError> {
        if self.opcode.is_control() {
            if self.length > MAX_CONTROL_PAYLOAD as u64 {
                self.reset();
                return Err(FrameError::InvalidFrame);
            }
        } else if self.message.len() as u64 + self.length > MAX_MESSAGE_SIZE as u64 {
            self.overflow = true;
        }

        if self.masked {
            self.pending = 4;
            self.state = ParseState::ReadingMask;
            Ok(None)
        } else {
            self.start_payload()
        }
    }

    fn start_payload(&mut self) -> Result<Option<WsEvent>, FrameError> {
        if self.length == 0 {
            self.finish_frame()
        } else {
            self.state = ParseState::ReadingPayload;
            Ok(None)
        }
    }

    fn finish_frame(&mut self) -> Result<Option<WsEvent>, FrameError> {
        self.state = ParseState::WaitingForHeader;

        match self.opcode {
            Opcode::Ping => Ok(Some(WsEvent::Ping(self.control.clone()))),
            Opcode::Pong => Ok(Some(WsEvent::Pong)),
            Opcode::Close => {
                let code = match self.control.as_slice() {
                    [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
                    _ => None,
                };
                Ok(Some(WsEvent::Close(code)))
            }
            Opcode::Text | Opcode::Binary | Opcode::Continuation => {
                if !self.fin {
                    return Ok(None);
                }

                let kind = self.fragment.take();
                if self.overflow {
                    self.overflow = false;
                    self.message.clear();
                    return Err(FrameError::PayloadTooLarge);
                }
                if kind != Some(Opcode::Text) {
                    // Binary messages are not part of the ledger API
                    return Ok(None);
                }

                let text = core::str::from_utf8(&self.message)
                    .map(String::from)
                    .map_err(|_| FrameError::InvalidUtf8);
                self.message.clear();
                text.map(|t| Some(WsEvent::Text(t)))
            }
        }
    }
}
