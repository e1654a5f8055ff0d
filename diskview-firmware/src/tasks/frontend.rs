//! Display/input task
//!
//! Forwards touch changes to the GUI, advances its event loop and
//! redraws the CPU line once per frame.

use defmt::*;
use embassy_time::{Duration, Instant, Timer};

use diskview_core::config::TimingConfig;

use super::micros;
use crate::board::{Section, TouchFrontend};
use crate::shared::LOAD;

#[embassy_executor::task]
pub async fn frontend_task(
    mut frontend: TouchFrontend,
    section: &'static Section,
    timing: TimingConfig,
) {
    let period = Duration::from_millis(timing.display_period_ms.into());

    info!(
        "Display task started ({} ms period)",
        timing.display_period_ms
    );

    loop {
        let started = Instant::now();
        match frontend.step(section, LOAD.percent()) {
            Ok(report) => {
                if let Some(pointer) = report.pointer {
                    trace!(
                        "Touch {} at ({}, {})",
                        if pointer.pressed { "down" } else { "up" },
                        pointer.x,
                        pointer.y
                    );
                }
            }
            // Expected only if the frame races a held section
            Err(e) => debug!("Frame skipped: {}", e),
        }
        LOAD.record_busy(micros(started.elapsed()));

        Timer::after(period).await;
    }
}
