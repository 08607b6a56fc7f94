//! Transport collaborator interfaces
//!
//! The session never touches the socket. Inbound traffic is pulled from an
//! [`Inbox`] and outbound requests are pushed into a [`RequestSink`].

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

/// Errors from handing a request to the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Connection is not open
    NotConnected,
    /// Outbound queue is full
    QueueFull,
}

/// Something the transport delivered, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Opened,
    Closed,
    Message(String),
}

/// Non-blocking source of inbound traffic
pub trait Inbox {
    /// Next buffered item, `None` when nothing is waiting
    fn try_next(&mut self) -> Option<Inbound>;
}

/// Outbound text channel
pub trait RequestSink {
    fn send(&mut self, text: &str) -> Result<(), LinkError>;
}

impl Inbox for VecDeque<Inbound> {
    fn try_next(&mut self) -> Option<Inbound> {
        self.pop_front()
    }
}

/// Collects requests in memory
impl RequestSink for Vec<String> {
    fn send(&mut self, text: &str) -> Result<(), LinkError> {
        self.push(String::from(text));
        Ok(())
    }
}
