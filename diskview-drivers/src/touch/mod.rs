//! Touch digitizer drivers

pub mod calibration;
pub mod stmpe811;

pub use calibration::Calibration;
pub use stmpe811::{Stmpe811, TouchError, STMPE811_ADDRESS};
