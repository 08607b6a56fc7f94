//! Secure WebSocket link task
//!
//! DNS, TCP, TLS and the WebSocket upgrade, then a loop that frames
//! outbound requests and turns inbound frames into messages for the app
//! task. Any failure closes the link; it is reopened after the configured
//! reconnect delay.

use alloc::string::String;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_net::dns::DnsQueryType;
use embassy_net::tcp::{ConnectError, TcpSocket};
use embassy_net::Stack;
use embassy_rp::clocks::RoscRng;
use embassy_time::{Duration, Timer};
use embedded_io_async::{Read, Write};
use embedded_tls::{Aes128GcmSha256, TlsConfig, TlsConnection, TlsContext, TlsError, UnsecureProvider};
use portable_atomic::Ordering;
use rand_core::RngCore;

use obol_core::config::TickerConfig;
use obol_core::Inbound;
use obol_protocol::ws::{self, FrameError, FrameParser, HandshakeError, Opcode, WsEvent};
use obol_protocol::MAX_MESSAGE_SIZE;

use crate::channels::{INBOUND, LINK_UP, OUTBOUND};

const TCP_BUFFER_SIZE: usize = 4096;

/// Largest TLS record plus overhead
const TLS_READ_BUFFER_SIZE: usize = 16640;
const TLS_WRITE_BUFFER_SIZE: usize = 4096;

/// Upgrade request and response headers
const HANDSHAKE_BUFFER_SIZE: usize = 1024;

/// Longest client frame header
const FRAME_OVERHEAD: usize = 14;

const SOCKET_TIMEOUT_S: u64 = 60;

/// Socket and TLS buffers, reused across reconnects
pub struct LinkBuffers {
    tcp_rx: [u8; TCP_BUFFER_SIZE],
    tcp_tx: [u8; TCP_BUFFER_SIZE],
    tls_read: [u8; TLS_READ_BUFFER_SIZE],
    tls_write: [u8; TLS_WRITE_BUFFER_SIZE],
    frame: [u8; MAX_MESSAGE_SIZE + FRAME_OVERHEAD],
}

impl LinkBuffers {
    pub const fn new() -> Self {
        Self {
            tcp_rx: [0; TCP_BUFFER_SIZE],
            tcp_tx: [0; TCP_BUFFER_SIZE],
            tls_read: [0; TLS_READ_BUFFER_SIZE],
            tls_write: [0; TLS_WRITE_BUFFER_SIZE],
            frame: [0; MAX_MESSAGE_SIZE + FRAME_OVERHEAD],
        }
    }
}

/// Why a link attempt ended
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum LinkFailure {
    Dns,
    Connect(ConnectError),
    Tls(TlsError),
    Handshake(HandshakeError),
    Frame(FrameError),
    /// Socket read/write failed or the peer went away
    Io,
}

#[embassy_executor::task]
pub async fn link_task(
    stack: Stack<'static>,
    config: &'static TickerConfig,
    buffers: &'static mut LinkBuffers,
) {
    info!("Link task started");

    let delay = Duration::from_millis(config.polling.reconnect_delay_ms as u64);

    loop {
        stack.wait_config_up().await;

        match run_link(stack, config, buffers).await {
            Ok(()) => info!("Link closed by server"),
            Err(e) => warn!("Link failed: {:?}", e),
        }

        if LINK_UP.swap(false, Ordering::AcqRel) {
            INBOUND.send(Inbound::Closed).await;
        }
        // Requests queued for the old connection are stale
        while OUTBOUND.try_receive().is_ok() {}

        warn!("Reconnecting in {} ms", delay.as_millis());
        Timer::after(delay).await;
    }
}

/// One connection, from DNS lookup to close
async fn run_link(
    stack: Stack<'static>,
    config: &TickerConfig,
    buffers: &mut LinkBuffers,
) -> Result<(), LinkFailure> {
    let endpoint = &config.endpoint;
    let host = endpoint.host.as_str();

    let addrs = stack
        .dns_query(host, DnsQueryType::A)
        .await
        .map_err(|_| LinkFailure::Dns)?;
    let addr = *addrs.first().ok_or(LinkFailure::Dns)?;
    debug!("Resolved {} to {}", host, addr);

    let LinkBuffers {
        tcp_rx,
        tcp_tx,
        tls_read,
        tls_write,
        frame,
    } = buffers;

    let mut socket = TcpSocket::new(stack, tcp_rx, tcp_tx);
    socket.set_timeout(Some(Duration::from_secs(SOCKET_TIMEOUT_S)));
    socket
        .connect((addr, endpoint.port))
        .await
        .map_err(LinkFailure::Connect)?;

    // TODO: pin the ISRG Root X1 certificate once a verifying provider fits in RAM
    let tls_config = TlsConfig::new().with_server_name(host);
    let mut tls: TlsConnection<'_, _, Aes128GcmSha256> =
        TlsConnection::new(socket, tls_read, tls_write);
    tls.open(TlsContext::new(
        &tls_config,
        UnsecureProvider::new::<Aes128GcmSha256>(RoscRng),
    ))
    .await
    .map_err(LinkFailure::Tls)?;
    debug!("TLS session established");

    let mut parser = FrameParser::new();
    let mut rx = [0u8; HANDSHAKE_BUFFER_SIZE];

    let (start, end) = upgrade(&mut tls, host, endpoint.port, &endpoint.path, &mut rx).await?;

    LINK_UP.store(true, Ordering::Release);
    INBOUND.send(Inbound::Opened).await;
    info!("Link open to {}", host);

    if dispatch(&mut parser, &rx[start..end], &mut tls, frame).await? {
        return Ok(());
    }

    loop {
        let event = select(tls.read(&mut rx), OUTBOUND.receive()).await;
        match event {
            Either::First(Ok(0)) => return Err(LinkFailure::Io),
            Either::First(Ok(n)) => {
                if dispatch(&mut parser, &rx[..n], &mut tls, frame).await? {
                    return Ok(());
                }
            }
            Either::First(Err(_)) => return Err(LinkFailure::Io),
            Either::Second(request) => {
                trace!("Sending {} byte request", request.len());
                send_frame(&mut tls, Opcode::Text, request.as_bytes(), frame).await?;
            }
        }
    }
}

/// Perform the HTTP upgrade
///
/// Returns the range of `rx` that already belongs to the frame stream.
async fn upgrade<T: Read + Write>(
    io: &mut T,
    host: &str,
    port: u16,
    path: &str,
    rx: &mut [u8; HANDSHAKE_BUFFER_SIZE],
) -> Result<(usize, usize), LinkFailure> {
    let mut nonce = [0u8; 16];
    RoscRng.fill_bytes(&mut nonce);

    let mut request: heapless::String<HANDSHAKE_BUFFER_SIZE> = heapless::String::new();
    ws::write_request(&mut request, host, port, path, &nonce).map_err(LinkFailure::Handshake)?;
    io.write_all(request.as_bytes())
        .await
        .map_err(|_| LinkFailure::Io)?;
    io.flush().await.map_err(|_| LinkFailure::Io)?;

    let mut filled = 0;
    loop {
        if filled == rx.len() {
            return Err(LinkFailure::Handshake(HandshakeError::Malformed));
        }
        let n = io.read(&mut rx[filled..]).await.map_err(|_| LinkFailure::Io)?;
        if n == 0 {
            return Err(LinkFailure::Io);
        }
        filled += n;

        if let Some(len) = ws::check_response(&rx[..filled]).map_err(LinkFailure::Handshake)? {
            return Ok((len, filled));
        }
    }
}

/// Feed received bytes to the parser and act on every event
///
/// Returns true once the server has closed the connection.
async fn dispatch<T: Write>(
    parser: &mut FrameParser,
    bytes: &[u8],
    io: &mut T,
    scratch: &mut [u8],
) -> Result<bool, LinkFailure> {
    let mut rest = bytes;
    while !rest.is_empty() {
        let (used, result) = parser.feed_bytes(rest);
        rest = &rest[used..];

        match result {
            Ok(None) => {}
            Ok(Some(WsEvent::Text(text))) => deliver(text).await,
            Ok(Some(WsEvent::Ping(payload))) => {
                send_frame(io, Opcode::Pong, &payload, scratch).await?;
            }
            Ok(Some(WsEvent::Pong)) => trace!("Pong"),
            Ok(Some(WsEvent::Close(code))) => {
                info!("Server sent close, code {:?}", code);
                // Best effort echo
                let _ = send_frame(io, Opcode::Close, &[], scratch).await;
                return Ok(true);
            }
            Err(e) if e.is_recoverable() => warn!("Dropped inbound message: {:?}", e),
            Err(e) => return Err(LinkFailure::Frame(e)),
        }
    }
    Ok(false)
}

async fn deliver(text: String) {
    trace!("Received {} byte message", text.len());
    INBOUND.send(Inbound::Message(text)).await;
}

/// Mask, frame and send one message
async fn send_frame<T: Write>(
    io: &mut T,
    opcode: Opcode,
    payload: &[u8],
    scratch: &mut [u8],
) -> Result<(), LinkFailure> {
    let mask = RoscRng.next_u32().to_le_bytes();
    let len = ws::encode_frame(opcode, payload, mask, scratch).map_err(LinkFailure::Frame)?;
    io.write_all(&scratch[..len])
        .await
        .map_err(|_| LinkFailure::Io)?;
    io.flush().await.map_err(|_| LinkFailure::Io)
}
