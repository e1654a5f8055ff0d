//! CPU load task
//!
//! Closes one load-meter window per tick. The display task picks up the
//! published percentage on its next frame.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use super::micros;
use crate::shared::LOAD;

#[embassy_executor::task]
pub async fn load_task(window_ms: u32) {
    let mut ticker = Ticker::every(Duration::from_millis(window_ms.into()));
    let mut last = Instant::now();

    loop {
        ticker.next().await;
        let now = Instant::now();
        let percent = LOAD.roll(micros(now - last));
        last = now;
        trace!("CPU load {}%", percent);
    }
}
