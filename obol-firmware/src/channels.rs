//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use alloc::string::String;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, Ordering};

use obol_core::{Inbound, Inbox, LinkError, RequestSink};
use obol_display::DrawList;

/// Channel capacity for inbound link traffic
const INBOUND_CHANNEL_SIZE: usize = 8;

/// Channel capacity for outbound requests (one refresh is 2 + accounts)
const OUTBOUND_CHANNEL_SIZE: usize = 12;

/// Link events and text messages, in arrival order (link -> app)
pub static INBOUND: Channel<CriticalSectionRawMutex, Inbound, INBOUND_CHANNEL_SIZE> =
    Channel::new();

/// JSON requests waiting to be framed (app -> link)
pub static OUTBOUND: Channel<CriticalSectionRawMutex, String, OUTBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Set by the link task while the WebSocket is open
pub static LINK_UP: AtomicBool = AtomicBool::new(false);

/// Latest frame to push to the panel (app -> display)
pub static FRAME: Signal<CriticalSectionRawMutex, DrawList> = Signal::new();

/// Wi-Fi progress for the boot screen (wifi -> app)
pub static NET_STATUS: Signal<CriticalSectionRawMutex, NetStatus> = Signal::new();

/// Network bring-up progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetStatus {
    Joining,
    JoinFailed,
    WaitingForAddress,
    Online,
}

impl NetStatus {
    pub fn describe(self) -> &'static str {
        match self {
            NetStatus::Joining => "Joining...",
            NetStatus::JoinFailed => "Join failed, retrying",
            NetStatus::WaitingForAddress => "Waiting for DHCP...",
            NetStatus::Online => "Connecting...",
        }
    }
}

/// [`Inbox`] over the inbound channel, never blocks
pub struct InboundQueue;

impl Inbox for InboundQueue {
    fn try_next(&mut self) -> Option<Inbound> {
        INBOUND.try_receive().ok()
    }
}

/// [`RequestSink`] over the outbound channel
pub struct OutboundQueue;

impl RequestSink for OutboundQueue {
    fn send(&mut self, text: &str) -> Result<(), LinkError> {
        if !LINK_UP.load(Ordering::Acquire) {
            return Err(LinkError::NotConnected);
        }
        OUTBOUND
            .try_send(String::from(text))
            .map_err(|_| LinkError::QueueFull)
    }
}
