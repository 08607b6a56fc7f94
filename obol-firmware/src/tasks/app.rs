//! Application task
//!
//! Owns the ticker session. Every tick it samples the button, drains the
//! inbound channel, runs the timers and renders. Frames are forwarded to
//! the display task only when they differ from the last one sent.

use defmt::*;

use obol_core::config::TickerConfig;
use obol_core::{AlertEvent, LinkEvent, Session, TickReport};
use obol_display::{render, render_status, DrawList, RenderConfig};
use obol_hal_rp2040::{ActiveInput, RpInput};

use crate::channels::{InboundQueue, NetStatus, OutboundQueue, FRAME, NET_STATUS};
use crate::tasks::tick::TICK_SIGNAL;

#[embassy_executor::task]
pub async fn app_task(config: &'static TickerConfig, button: ActiveInput<RpInput<'static>>) {
    info!("App task started");

    let mut session = Session::new(config);
    let render_config = RenderConfig::from(config);
    let mut inbox = InboundQueue;
    let mut outbox = OutboundQueue;

    let mut net = NetStatus::Joining;
    let mut ever_opened = false;
    let mut last_frame: Option<DrawList> = None;

    loop {
        let now_ms = TICK_SIGNAL.wait().await;

        if let Some(status) = NET_STATUS.try_take() {
            debug!("Network status: {:?}", status);
            net = status;
        }

        let report = session.tick(now_ms, button.is_active(), &mut inbox, &mut outbox);
        if report.link == Some(LinkEvent::Opened) {
            ever_opened = true;
        }
        log_report(&report);

        let mut frame = DrawList::new();
        let drawn = if ever_opened {
            render(&session.snapshot(), &render_config, &mut frame)
        } else {
            render_status(&["Obol", config.wifi.ssid.as_str(), net.describe()], &mut frame)
        };
        if let Err(e) = drawn {
            warn!("Render failed: {:?}", e);
            continue;
        }

        if last_frame.as_ref() != Some(&frame) {
            FRAME.signal(frame.clone());
            last_frame = Some(frame);
        }
    }
}

/// Log what happened during one tick
fn log_report(report: &TickReport) {
    if report.mode_changed {
        info!("Display mode toggled");
    }
    match report.link {
        Some(LinkEvent::Opened) => info!("Session live"),
        Some(LinkEvent::Closed) => info!("Session lost link, pending requests abandoned"),
        None => {}
    }
    if report.malformed > 0 {
        debug!("{} malformed messages", report.malformed);
    }
    if let Some(id) = report.last_unmatched {
        debug!("{} unmatched responses (last id {})", report.unmatched, id);
    }
    if report.rejected > 0 {
        debug!("{} requests rejected by server", report.rejected);
    }
    if report.send_failures > 0 {
        warn!("{} requests could not be queued", report.send_failures);
    }
    if report.requests_sent > 0 {
        trace!("{} requests sent", report.requests_sent);
    }
    match report.alert {
        Some(AlertEvent::Raised) => info!("Price alert raised"),
        Some(AlertEvent::Cleared) => info!("Price alert cleared"),
        None => {}
    }
}
