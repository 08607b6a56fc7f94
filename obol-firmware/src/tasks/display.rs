//! Display task
//!
//! Owns the SSD1306 and pushes every frame the app task publishes.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Timer;

use obol_drivers::Ssd1306;

use crate::channels::FRAME;

/// Retry delay after an I2C failure during init
const INIT_RETRY_MS: u64 = 1000;

#[embassy_executor::task]
pub async fn display_task(mut display: Ssd1306<I2c<'static, I2C0, Async>>) {
    info!("Display task started");

    while let Err(e) = display.init().await {
        error!("Display init failed: {:?}", e);
        Timer::after_millis(INIT_RETRY_MS).await;
    }
    info!("SSD1306 initialized");

    loop {
        let frame = FRAME.wait().await;

        if let Err(e) = frame.replay(display.frame_mut()) {
            warn!("Frame replay failed: {:?}", e);
            continue;
        }
        if let Err(e) = display.flush().await {
            warn!("Display flush failed: {:?}", e);
        }
    }
}
