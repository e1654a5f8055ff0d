//! Embassy async tasks
//!
//! Both application tasks run on the thread-mode executor at the same
//! priority and share the display and read buffer through the section.

pub mod frontend;
pub mod load;
pub mod watcher;

pub use frontend::frontend_task;
pub use load::load_task;
pub use watcher::watcher_task;

use embassy_time::Duration;

/// Whole microseconds, saturating, as the load meter counts them
fn micros(span: Duration) -> u32 {
    u32::try_from(span.as_micros()).unwrap_or(u32::MAX)
}
