//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in diskview-hal and diskview-core:
//!
//! - Indicator LEDs on GPIO pins
//! - SD slot card-detect transport
//! - FAT filesystem on an SD card (embedded-sdmmc)
//! - STMPE811 touch controller with linear calibration
//! - Text console GUI on an embedded-graphics draw target

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod indicator;
pub mod storage;
pub mod touch;
