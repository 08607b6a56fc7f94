//! Tick task for time-based updates
//!
//! Drives the app task: button sampling, message draining, timers and
//! redraws all happen once per tick.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 50;

/// Signal to notify the app task of a tick
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u64> = Signal::new();

/// Tick task - sends periodic tick signals with uptime
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    let start = Instant::now();

    loop {
        ticker.next().await;
        TICK_SIGNAL.signal(start.elapsed().as_millis());
    }
}
