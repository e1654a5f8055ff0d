//! Processor utilization meter
//!
//! Tasks report how long they were busy; a periodic roll turns the
//! accumulated busy time into a percentage of the elapsed window. All
//! state is atomic so reporters never block each other.

use portable_atomic::{AtomicU32, AtomicU8, Ordering};

/// Lock-free busy-time accumulator
pub struct LoadMeter {
    busy_us: AtomicU32,
    percent: AtomicU8,
}

impl Default for LoadMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadMeter {
    pub const fn new() -> Self {
        Self {
            busy_us: AtomicU32::new(0),
            percent: AtomicU8::new(0),
        }
    }

    /// Add busy time for the current window
    pub fn record_busy(&self, us: u32) {
        let _ = self
            .busy_us
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |busy| {
                Some(busy.saturating_add(us))
            });
    }

    /// Close the current window and publish its utilization
    ///
    /// `window_us` is the time elapsed since the previous roll. Returns
    /// the new percentage, clamped to 100.
    pub fn roll(&self, window_us: u32) -> u8 {
        let busy = self.busy_us.swap(0, Ordering::AcqRel);
        let percent = if window_us == 0 {
            0
        } else {
            (u64::from(busy) * 100 / u64::from(window_us)).min(100) as u8
        };
        self.percent.store(percent, Ordering::Release);
        percent
    }

    /// Utilization of the last completed window
    pub fn percent(&self) -> u8 {
        self.percent.load(Ordering::Acquire)
    }
}
