//! Display drivers

pub mod console;

pub use console::{TextConsole, EVENT_QUEUE_LEN};
