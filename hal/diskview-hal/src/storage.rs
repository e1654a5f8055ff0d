//! Removable storage transport
//!
//! The transport owns device detection and enumeration. The application
//! only pumps it and reacts to the notifications it produces.

/// Notifications delivered by the storage transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportEvent {
    /// A device was attached and a configuration has been selected
    ConfigurationSelected,
    /// The device was detached
    Disconnected,
    /// The device is enumerated and of the expected storage class
    ClassActive,
}

/// Storage transport pump
///
/// `poll` must not block for longer than a single bus transaction. A
/// device that fails enumeration or has the wrong class simply never
/// produces [`TransportEvent::ClassActive`].
pub trait StorageTransport {
    /// Advance the transport's internal processing by one step
    ///
    /// Returns the notification produced by this step, if any.
    fn poll(&mut self) -> Option<TransportEvent>;
}
