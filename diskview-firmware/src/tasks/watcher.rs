//! Storage watcher task
//!
//! Pumps the card slot every period. When a card becomes ready the
//! watcher step runs the whole service sequence synchronously, so no
//! other task runs until the buffer and display are consistent again.

use defmt::*;
use embassy_time::{Duration, Instant, Timer};

use diskview_core::config::TimingConfig;
use diskview_core::{ServiceReport, StepReport};

use super::micros;
use crate::board::{Section, Watcher};
use crate::shared::LOAD;

#[embassy_executor::task]
pub async fn watcher_task(mut watcher: Watcher, section: &'static Section, timing: TimingConfig) {
    let period = Duration::from_millis(timing.watcher_period_ms.into());
    // A zero budget disables the overrun warning
    let budget = (timing.section_budget_ms > 0)
        .then(|| Duration::from_millis(timing.section_budget_ms.into()));
    let file = watcher.config().file.clone();

    info!(
        "Watcher task started ({} ms period), state {}",
        timing.watcher_period_ms,
        watcher.state()
    );

    loop {
        let started = Instant::now();
        let report = watcher.step(section);
        let busy = started.elapsed();
        LOAD.record_busy(micros(busy));

        log_step(&report, file.as_str());

        if report.service.is_some() {
            debug!(
                "Service took {} us, {} sections so far",
                busy.as_micros(),
                section.entries()
            );
            if let Some(budget) = budget {
                if busy > budget {
                    warn!(
                        "Exclusive section overran its budget: {} ms > {} ms",
                        busy.as_millis(),
                        budget.as_millis()
                    );
                }
            }
        }

        Timer::after(period).await;
    }
}

fn log_step(report: &StepReport, file: &str) {
    if let Some(event) = report.notification {
        info!("Slot: {} -> {}", event, report.state);
    }
    if let Some(service) = &report.service {
        log_service(service, file);
    }
}

fn log_service(service: &ServiceReport, file: &str) {
    match service.outcome {
        Ok(fill) if fill.truncated => {
            warn!("Read {} bytes from {} (truncated)", fill.written, file)
        }
        Ok(fill) => info!("Read {} bytes from {}", fill.written, file),
        Err(e) => warn!("Reading {} failed: {}", file, e),
    }
    if let Err(e) = service.display {
        warn!("Display update failed: {}", e);
    }
    if let Err(e) = service.unmount {
        warn!("Unmount failed: {}", e);
    }
}
