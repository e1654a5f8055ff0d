//! diskview Hardware Abstraction Layer
//!
//! This crate defines the narrow contracts between the application and
//! the collaborators it drives but does not implement: indicator outputs,
//! the removable storage transport, the filesystem layer and the touch
//! digitizer. Board crates provide the implementations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (diskview-core, firmware)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  diskview-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  diskview-drivers (SD card, STMPE811..) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`indicator::Indicator`] - Binary status outputs (LEDs)
//! - [`storage::StorageTransport`] - Attach/detach notifications
//! - [`fs::Filesystem`] - Mount, open, read, close, unmount
//! - [`touch::TouchController`] - Touch digitizer sampling

#![no_std]
#![deny(unsafe_code)]

pub mod fs;
pub mod indicator;
pub mod storage;
pub mod touch;

// Re-export key traits at crate root for convenience
pub use fs::{Filesystem, FsError, OpenMode};
pub use indicator::Indicator;
pub use storage::{StorageTransport, TransportEvent};
pub use touch::{TouchController, TouchState};
