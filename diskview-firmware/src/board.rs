//! Board binding for the STM32F429 discovery kit
//!
//! Concrete driver types for the peripherals wired in `main`. Embassy
//! tasks cannot be generic, so their arguments are spelled out here.

use embassy_stm32::gpio::{Input, Output};
use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Blocking;
use embassy_stm32::spi::Spi;
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::sdcard::DummyCsPin;
use embedded_sdmmc::SdCard;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ILI9341Rgb565;
use mipidsi::NoResetPin;

use diskview_core::{ExclusiveSection, Frontend, Shared, StorageWatcher, READ_BUFFER_SIZE};
use diskview_drivers::display::TextConsole;
use diskview_drivers::indicator::Led;
use diskview_drivers::storage::{CardDetectTransport, FixedTime, SdFilesystem};
use diskview_drivers::touch::Stmpe811;

/// Panel size in portrait orientation
pub const DISPLAY_WIDTH: u16 = 240;
pub const DISPLAY_HEIGHT: u16 = 320;

/// One chip-selected device on a dedicated SPI bus
pub type SpiDev = ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, Delay>;

/// ILI9341 panel on SPI5
pub type Screen =
    mipidsi::Display<SpiInterface<'static, SpiDev, Output<'static>>, ILI9341Rgb565, NoResetPin>;

/// GUI drawn on the panel
pub type Console = TextConsole<Screen>;

/// Display and read buffer behind one lock
pub type Section = ExclusiveSection<ThreadModeRawMutex, Shared<Console, READ_BUFFER_SIZE>>;

/// LED3 / LED4
pub type StatusLed = Led<Output<'static>>;

/// SD card bus; the card drives its own chip select so it can clock
/// dummy bytes with CS released
pub type CardSpi = ExclusiveDevice<Spi<'static, Blocking>, DummyCsPin, Delay>;

/// SD slot on SPI4 with its card-detect switch
pub type CardSlot = CardDetectTransport<Input<'static>>;
pub type CardFs = SdFilesystem<SdCard<CardSpi, Output<'static>, Delay>, FixedTime>;

/// STMPE811 on I2C3
pub type Touch = Stmpe811<I2c<'static, Blocking>>;

pub type Watcher = StorageWatcher<'static, CardSlot, CardFs, StatusLed>;
pub type TouchFrontend = Frontend<Touch>;
