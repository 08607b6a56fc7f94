//! Obol - XRP price ticker firmware
//!
//! Main firmware binary for the Raspberry Pi Pico W. Streams order-book
//! quotes from an XRP Ledger WebSocket endpoint and shows the mid price,
//! the spread and an optional portfolio summary on an SSD1306 OLED.

#![no_std]
#![no_main]

extern crate alloc;

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::StackResources;
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::peripherals::{I2C0, PIO0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embedded_alloc::LlffHeap as Heap;
use rand_core::RngCore;
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use obol_core::config::TickerConfig;
use obol_drivers::Ssd1306;
use obol_hal_rp2040::button_input;

use crate::tasks::link::LinkBuffers;

mod board;
mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});

// Heap allocator for JSON messages
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 48KB
const HEAP_SIZE: usize = 48 * 1024;

/// I2C bus speed for the OLED
const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Sockets for DHCP, DNS and the link
const NET_SOCKETS: usize = 4;

// Static cells (must live forever for task references)
static CONFIG: StaticCell<TickerConfig> = StaticCell::new();
static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<NET_SOCKETS>> = StaticCell::new();
static LINK_BUFFERS: ConstStaticCell<LinkBuffers> = ConstStaticCell::new(LinkBuffers::new());

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Obol firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static TickerConfig = CONFIG.init(config::load());
    board::check_pins(&config.pins);

    // Display on I2C0 (Pico W: SDA=GPIO4, SCL=GPIO5)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);
    let display = Ssd1306::new(i2c);

    // Mode button (GPIO15 to ground)
    let button = button_input(p.PIN_15);

    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::display_task(display)).unwrap();
    spawner.spawn(tasks::app_task(config, button)).unwrap();

    // CYW43 over PIO SPI (Pico W: PWR=23, DIO=24, CS=25, CLK=29)
    let fw = include_bytes!("../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../cyw43-firmware/43439A0_clm.bin");

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(tasks::cyw43_task(runner)).unwrap();

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;
    info!("CYW43 initialized");

    let seed = RoscRng.next_u64();
    let (stack, net_runner) = embassy_net::new(
        net_device,
        embassy_net::Config::dhcpv4(Default::default()),
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(tasks::net_task(net_runner)).unwrap();

    spawner
        .spawn(tasks::wifi_task(control, stack, &config.wifi))
        .unwrap();
    spawner
        .spawn(tasks::link_task(stack, config, LINK_BUFFERS.take()))
        .unwrap();

    info!("All tasks spawned, firmware running");
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
