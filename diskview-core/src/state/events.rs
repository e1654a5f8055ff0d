//! Events that trigger lifecycle transitions

use diskview_hal::TransportEvent;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Transport notifications
    /// Device attached, configuration selected (not yet usable)
    ConfigurationSelected,
    /// Device enumerated with the expected storage class
    DeviceActive,
    /// Device removed
    Detached,

    // Watcher events
    /// Watcher entered the service sequence
    ServiceStarted,
    /// Watcher completed the service sequence (successfully or not)
    ServiceFinished,
}

impl From<TransportEvent> for Event {
    fn from(event: TransportEvent) -> Self {
        match event {
            TransportEvent::ConfigurationSelected => Event::ConfigurationSelected,
            TransportEvent::ClassActive => Event::DeviceActive,
            TransportEvent::Disconnected => Event::Detached,
        }
    }
}
