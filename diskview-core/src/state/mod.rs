//! Device lifecycle state machine
//!
//! Tracks whether an attached storage device still needs to be read.
//! The state machine is explicit, finite, and deterministic.

pub mod cell;
pub mod events;
pub mod machine;

pub use cell::LifecycleCell;
pub use events::Event;
pub use machine::AppState;
