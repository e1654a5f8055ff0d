//! STMPE811 resistive touch controller
//!
//! Blocking I2C driver. The controller is set up for touch-screen use
//! only (no GPIO expander functions): 12-bit ADC, FIFO threshold of one
//! sample, touch detection with averaging.
//!
//! # Usage
//!
//! ```ignore
//! let mut touch = Stmpe811::new(i2c, STMPE811_ADDRESS, calibration);
//! touch.init(&mut Delay)?;
//!
//! // Once per frame:
//! let state = touch.state();
//! ```

use diskview_hal::{TouchController, TouchState};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::calibration::Calibration;

/// Default 7-bit bus address (ADDR0 pulled high)
pub const STMPE811_ADDRESS: u8 = 0x41;

/// Expected contents of the CHIP_ID register
pub const CHIP_ID: u16 = 0x0811;

/// Register map (subset)
mod reg {
    pub const CHIP_ID: u8 = 0x00;
    pub const SYS_CTRL1: u8 = 0x03;
    pub const SYS_CTRL2: u8 = 0x04;
    pub const INT_STA: u8 = 0x0B;
    pub const GPIO_AF: u8 = 0x17;
    pub const ADC_CTRL1: u8 = 0x20;
    pub const ADC_CTRL2: u8 = 0x21;
    pub const TSC_CTRL: u8 = 0x40;
    pub const TSC_CFG: u8 = 0x41;
    pub const FIFO_TH: u8 = 0x4A;
    pub const FIFO_STA: u8 = 0x4B;
    pub const FIFO_SIZE: u8 = 0x4C;
    pub const TSC_FRACT_XYZ: u8 = 0x56;
    pub const TSC_I_DRIVE: u8 = 0x58;
    pub const TSC_DATA_XYZ: u8 = 0xD7;
}

/// SYS_CTRL1: soft reset
const SOFT_RESET: u8 = 0x02;
/// SYS_CTRL2 clock-disable bits for ADC, GPIO and TSC
const CLOCKS_OFF: u8 = 0x01 | 0x04 | 0x08;
/// TSC_CTRL: touch detected status
const TOUCH_DETECTED: u8 = 0x80;
/// FIFO_STA: reset FIFO
const FIFO_RESET: u8 = 0x01;

/// STMPE811 driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// I2C transfer failed
    Bus,
    /// Device answered with an unexpected chip id
    WrongChip(u16),
}

/// STMPE811 driver
pub struct Stmpe811<I2C> {
    i2c: I2C,
    address: u8,
    calibration: Calibration,
    /// Last mapped position, reused while the FIFO is empty
    last: (u16, u16),
}

impl<I2C: I2c> Stmpe811<I2C> {
    pub fn new(i2c: I2C, address: u8, calibration: Calibration) -> Self {
        Self {
            i2c,
            address,
            calibration,
            last: (0, 0),
        }
    }

    /// Verify the chip id and configure touch-screen mode
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), TouchError> {
        let id = self.chip_id()?;
        if id != CHIP_ID {
            return Err(TouchError::WrongChip(id));
        }

        self.write(reg::SYS_CTRL1, SOFT_RESET)?;
        delay.delay_ms(10);
        self.write(reg::SYS_CTRL1, 0x00)?;
        delay.delay_ms(2);

        // Enable ADC and TSC clocks, GPIO clock too (needed for AF)
        let clocks = self.read(reg::SYS_CTRL2)?;
        self.write(reg::SYS_CTRL2, clocks & !CLOCKS_OFF)?;

        // Sample time 80 clocks, 12-bit, internal reference
        self.write(reg::ADC_CTRL1, 0x49)?;
        delay.delay_ms(2);
        // ADC clock 3.25 MHz
        self.write(reg::ADC_CTRL2, 0x01)?;

        // Touch pins to their TSC function
        self.write(reg::GPIO_AF, 0x00)?;

        // 4-sample average, 500 us touch detect delay, 500 us settling
        self.write(reg::TSC_CFG, 0x9A)?;
        self.write(reg::FIFO_TH, 0x01)?;
        self.reset_fifo()?;

        // Z format 7.1, 50 mA drive
        self.write(reg::TSC_FRACT_XYZ, 0x01)?;
        self.write(reg::TSC_I_DRIVE, 0x01)?;

        // Enable TSC, XY acquisition only
        self.write(reg::TSC_CTRL, 0x01)?;

        // Clear pending interrupts
        self.write(reg::INT_STA, 0xFF)?;
        delay.delay_ms(2);

        Ok(())
    }

    /// Read the 16-bit chip id
    pub fn chip_id(&mut self) -> Result<u16, TouchError> {
        let mut id = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg::CHIP_ID], &mut id)
            .map_err(|_| TouchError::Bus)?;
        Ok(u16::from_be_bytes(id))
    }

    /// Sample once, propagating bus errors
    pub fn try_state(&mut self) -> Result<TouchState, TouchError> {
        let ctrl = self.read(reg::TSC_CTRL)?;
        if ctrl & TOUCH_DETECTED == 0 {
            self.reset_fifo()?;
            return Ok(TouchState::default());
        }

        if self.read(reg::FIFO_SIZE)? > 0 {
            let mut xyz = [0u8; 4];
            self.i2c
                .write_read(self.address, &[reg::TSC_DATA_XYZ], &mut xyz)
                .map_err(|_| TouchError::Bus)?;
            let (raw_x, raw_y) = unpack_xy(xyz);
            self.last = self.calibration.apply(raw_x, raw_y);
            self.reset_fifo()?;
        }

        Ok(TouchState {
            detected: true,
            x: self.last.0,
            y: self.last.1,
        })
    }

    fn reset_fifo(&mut self) -> Result<(), TouchError> {
        self.write(reg::FIFO_STA, FIFO_RESET)?;
        self.write(reg::FIFO_STA, 0x00)
    }

    fn read(&mut self, register: u8) -> Result<u8, TouchError> {
        let mut value = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut value)
            .map_err(|_| TouchError::Bus)?;
        Ok(value[0])
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), TouchError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|_| TouchError::Bus)
    }
}

impl<I2C: I2c> TouchController for Stmpe811<I2C> {
    fn state(&mut self) -> TouchState {
        self.try_state().unwrap_or_default()
    }
}

/// Unpack the 12-bit X and Y fields of a packed XYZ sample
fn unpack_xy(xyz: [u8; 4]) -> (u16, u16) {
    let packed = u32::from_be_bytes(xyz);
    (((packed >> 20) & 0x0FFF) as u16, ((packed >> 8) & 0x0FFF) as u16)
}
