//! Device lifecycle state machine
//!
//! Decides when the storage watcher may service an attached device.
//! Transitions are pure; the shared copy lives in [`super::LifecycleCell`].

use super::events::Event;

/// Device lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AppState {
    /// No pending work
    #[default]
    Idle = 0,
    /// A device became class-active; read it at the next opportunity
    Ready = 1,
    /// Service sequence in progress (set and cleared within one watcher step)
    Running = 2,
}

impl AppState {
    /// Get the state as its single-word representation
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a state from its single-word representation
    ///
    /// Unknown values decode as `Idle`, the safe resting state.
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => AppState::Ready,
            2 => AppState::Running,
            _ => AppState::Idle,
        }
    }

    /// Check if a service sequence should run
    pub fn needs_service(&self) -> bool {
        matches!(self, AppState::Ready)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use AppState::*;
        use Event::*;

        match (self, event) {
            // Detach wins from every state
            (_, Detached) => Idle,

            (Idle, DeviceActive) => Ready,
            (Ready, DeviceActive) => Ready,

            (Ready, ServiceStarted) => Running,

            // Best effort: finishing always returns to idle, success or not
            (Running, ServiceFinished) => Idle,
            (Ready, ServiceFinished) => Idle,

            // Configuration selection and anything unexpected: no change
            _ => self,
        }
    }
}
