//! Board-agnostic core logic for the diskview firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Device lifecycle state machine and its atomic cell
//! - Capacity-checked read buffer
//! - Exclusive section guarding the shared display and buffer
//! - Storage watcher and display/input frontend steps
//! - Processor load meter
//! - Configuration types and the embedded TOML parser
//! - GUI surface trait

#![no_std]
#![deny(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod exclusive;
pub mod frontend;
pub mod load;
pub mod state;
pub mod traits;
pub mod watcher;

pub use buffer::{Fill, ReadBuffer, READ_BUFFER_SIZE};
pub use exclusive::{ExclusiveSection, SectionError, Shared};
pub use frontend::{Frontend, FrameError, FrameReport};
pub use load::LoadMeter;
pub use state::{AppState, Event, LifecycleCell};
pub use traits::{Gui, GuiError, PointerEvent};
pub use watcher::{ServiceError, ServiceReport, StepReport, StorageWatcher};
