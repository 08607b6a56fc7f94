//! Wi-Fi and network stack tasks
//!
//! `cyw43_task` and `net_task` just run the driver and stack runners.
//! `wifi_task` owns the radio control handle: it joins the configured
//! network, waits for DHCP and rejoins whenever the link drops.

use cyw43::JoinOptions;
use cyw43_pio::PioSpi;
use defmt::*;
use embassy_net::Stack;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::{DMA_CH0, PIO0};
use embassy_time::Timer;

use obol_core::config::WifiConfig;

use crate::channels::{NetStatus, NET_STATUS};

/// Delay between failed join attempts
const JOIN_RETRY_MS: u64 = 5000;

#[embassy_executor::task]
pub async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
pub async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

#[embassy_executor::task]
pub async fn wifi_task(
    mut control: cyw43::Control<'static>,
    stack: Stack<'static>,
    wifi: &'static WifiConfig,
) {
    info!("Wi-Fi task started");

    loop {
        NET_STATUS.signal(NetStatus::Joining);
        info!("Joining {}", wifi.ssid.as_str());

        let options = if wifi.password.is_empty() {
            JoinOptions::new_open()
        } else {
            JoinOptions::new(wifi.password.as_bytes())
        };

        if let Err(e) = control.join(&wifi.ssid, options).await {
            warn!("Join failed with status {}", e.status);
            NET_STATUS.signal(NetStatus::JoinFailed);
            Timer::after_millis(JOIN_RETRY_MS).await;
            continue;
        }

        NET_STATUS.signal(NetStatus::WaitingForAddress);
        stack.wait_config_up().await;
        if let Some(v4) = stack.config_v4() {
            info!("Network up, address {}", v4.address);
        }
        NET_STATUS.signal(NetStatus::Online);

        stack.wait_link_down().await;
        warn!("Wi-Fi link lost");
    }
}
