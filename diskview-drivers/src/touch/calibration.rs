//! Linear touch calibration
//!
//! Maps raw digitizer readings onto screen pixels. A raw range given as
//! `max < min` flips the axis.

use diskview_core::config::TouchConfig;

/// Raw-to-screen mapping for one panel orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    config: TouchConfig,
    width: u16,
    height: u16,
}

impl Calibration {
    pub fn new(config: TouchConfig, width: u16, height: u16) -> Self {
        Self {
            config,
            width,
            height,
        }
    }

    /// Map a raw sample to screen coordinates
    ///
    /// The result is always inside the screen.
    pub fn apply(&self, raw_x: u16, raw_y: u16) -> (u16, u16) {
        let (raw_x, raw_y) = if self.config.swap_xy {
            (raw_y, raw_x)
        } else {
            (raw_x, raw_y)
        };
        (
            scale(raw_x, self.config.x_min, self.config.x_max, self.width),
            scale(raw_y, self.config.y_min, self.config.y_max, self.height),
        )
    }
}

fn scale(raw: u16, min: u16, max: u16, size: u16) -> u16 {
    let last = i32::from(size.saturating_sub(1));
    let span = i32::from(max) - i32::from(min);
    if span == 0 {
        return 0;
    }
    let offset = i32::from(raw) - i32::from(min);
    (offset * last / span).clamp(0, last) as u16
}
