//! diskview firmware for the STM32F429 discovery kit
//!
//! Watches the SD slot, reads a short text file from every card that is
//! inserted and shows it on the ILI9341 panel. A second task keeps the
//! touch input and the CPU line of the display alive.
//!
//! Peripheral map:
//! - LED3 (PG13): device serviced, LED4 (PG14): fault
//! - ILI9341: SPI5 (PF7 SCK, PF8 MISO, PF9 MOSI), CS PC2, DC PD13
//! - STMPE811: I2C3 (PA8 SCL, PC9 SDA)
//! - SD card: SPI4 (PE2 SCK, PE5 MISO, PE6 MOSI), CS PE4, card detect PE3

#![no_std]
#![no_main]

mod board;
mod config;
mod shared;
mod tasks;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::sdcard::DummyCsPin;
use embedded_sdmmc::SdCard;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ILI9341Rgb565;
use mipidsi::options::ColorOrder;
use mipidsi::Builder;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use diskview_core::{ExclusiveSection, Frontend, Gui, Shared, StorageWatcher};
use diskview_drivers::display::TextConsole;
use diskview_drivers::indicator::Led;
use diskview_drivers::storage::{CardDetectTransport, FixedTime, SdFilesystem};
use diskview_drivers::touch::{Calibration, Stmpe811, STMPE811_ADDRESS};

use crate::board::{Section, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::shared::LIFECYCLE;

/// Embedded configuration (validated by build.rs)
const EMBEDDED_CONFIG: &str = include_str!("../diskview.toml");

/// mipidsi batches pixel writes through this buffer
const DISPLAY_BUFFER_SIZE: usize = 512;

static DISPLAY_BUFFER: StaticCell<[u8; DISPLAY_BUFFER_SIZE]> = StaticCell::new();
static SECTION: StaticCell<Section> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("diskview firmware starting...");

    let p = embassy_stm32::init(Default::default());
    info!("Embassy initialized");

    let config = config::load(EMBEDDED_CONFIG);

    // Indicators, both off until a card is serviced
    let serviced = Led::new_active_high(Output::new(p.PG13, Level::Low, Speed::Low));
    let fault = Led::new_active_high(Output::new(p.PG14, Level::Low, Speed::Low));

    // ILI9341 panel on SPI5
    let display_spi = {
        let mut cfg = spi::Config::default();
        cfg.frequency = Hertz::mhz(10);
        Spi::new_blocking(p.SPI5, p.PF7, p.PF9, p.PF8, cfg)
    };
    let display_cs = Output::new(p.PC2, Level::High, Speed::High);
    let display_dc = Output::new(p.PD13, Level::Low, Speed::High);
    let display_dev = ExclusiveDevice::new(display_spi, display_cs, Delay).unwrap();
    let buffer = DISPLAY_BUFFER.init([0; DISPLAY_BUFFER_SIZE]);
    let interface = SpiInterface::new(display_dev, display_dc, buffer);

    let screen = match Builder::new(ILI9341Rgb565, interface)
        .display_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
        .color_order(ColorOrder::Bgr)
        .init(&mut Delay)
    {
        Ok(screen) => screen,
        Err(_) => defmt::panic!("Display init failed"),
    };

    let mut console = TextConsole::new(screen);
    if let Err(e) = console.clear() {
        warn!("Initial clear failed: {}", e);
    }
    info!("Display initialized");

    // STMPE811 on I2C3; a dead controller just reads as "no touch"
    let touch_i2c = I2c::new_blocking(p.I2C3, p.PA8, p.PC9, Hertz::khz(100), Default::default());
    let calibration = Calibration::new(config.touch, DISPLAY_WIDTH, DISPLAY_HEIGHT);
    let mut touch = Stmpe811::new(touch_i2c, STMPE811_ADDRESS, calibration);
    match touch.init(&mut Delay) {
        Ok(()) => info!("Touch controller initialized"),
        Err(e) => warn!("Touch controller init failed: {}", e),
    }

    // SD card on SPI4. Card init needs <= 400 kHz and the reads are
    // tiny, so the bus stays at that rate.
    let card_spi = {
        let mut cfg = spi::Config::default();
        cfg.frequency = Hertz::khz(400);
        Spi::new_blocking(p.SPI4, p.PE2, p.PE6, p.PE5, cfg)
    };
    let card_cs = Output::new(p.PE4, Level::High, Speed::High);
    let card_dev = ExclusiveDevice::new(card_spi, DummyCsPin, Delay).unwrap();
    let card = SdCard::new(card_dev, card_cs, Delay);
    let filesystem = SdFilesystem::new(card, FixedTime);

    // Card-detect switch closes to ground with a card present
    let slot = CardDetectTransport::new(Input::new(p.PE3, Pull::Up), true);
    info!("SD slot initialized");

    let section: &'static Section = SECTION.init(ExclusiveSection::new(
        ThreadModeRawMutex::new(),
        Shared::new(console),
    ));

    let watcher = StorageWatcher::new(
        slot,
        filesystem,
        serviced,
        fault,
        &LIFECYCLE,
        config.storage.clone(),
    );
    let frontend = Frontend::new(touch, config.status);

    // Spawn tasks
    spawner.spawn(tasks::load_task(config.timing.load_window_ms)).unwrap();
    spawner.spawn(tasks::frontend_task(frontend, section, config.timing)).unwrap();
    spawner.spawn(tasks::watcher_task(watcher, section, config.timing)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat, lifecycle {}", LIFECYCLE.load());
    }
}
