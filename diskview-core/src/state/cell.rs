//! Process-wide lifecycle cell
//!
//! Holds the current [`AppState`] as a single atomic word so a transport
//! notification raised from another execution context (an interrupt
//! handler, a higher-priority executor) can apply a transition without
//! ever exposing a partial value.

use portable_atomic::{AtomicU8, Ordering};

use super::events::Event;
use super::machine::AppState;

/// Atomically updated lifecycle state
pub struct LifecycleCell {
    state: AtomicU8,
}

impl Default for LifecycleCell {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleCell {
    /// Create a new cell in the `Idle` state
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(AppState::Idle.as_u8()),
        }
    }

    /// Current state
    pub fn load(&self) -> AppState {
        AppState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Apply an event and return the resulting state
    ///
    /// The read-transition-write is a single compare-and-swap loop, so
    /// concurrent notifiers never lose an update.
    pub fn notify(&self, event: Event) -> AppState {
        let previous = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                Some(AppState::from_u8(raw).transition(event).as_u8())
            })
            // The closure always returns Some
            .unwrap_or_else(|raw| raw);
        AppState::from_u8(previous).transition(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use diskview_hal::TransportEvent;

    #[test]
    fn test_starts_idle() {
        let cell = LifecycleCell::new();
        assert_eq!(cell.load(), AppState::Idle);
    }

    #[test]
    fn test_notify_returns_new_state() {
        let cell = LifecycleCell::new();
        assert_eq!(cell.notify(Event::DeviceActive), AppState::Ready);
        assert_eq!(cell.load(), AppState::Ready);

        assert_eq!(cell.notify(Event::ServiceStarted), AppState::Running);
        assert_eq!(cell.notify(Event::ServiceFinished), AppState::Idle);
    }

    #[test]
    fn test_double_detach_stays_idle() {
        let cell = LifecycleCell::new();
        cell.notify(Event::DeviceActive);
        assert_eq!(cell.notify(Event::Detached), AppState::Idle);
        assert_eq!(cell.notify(Event::Detached), AppState::Idle);
    }

    fn transport_event() -> impl Strategy<Value = TransportEvent> {
        prop_oneof![
            Just(TransportEvent::ConfigurationSelected),
            Just(TransportEvent::ClassActive),
            Just(TransportEvent::Disconnected),
        ]
    }

    proptest! {
        #[test]
        fn prop_transport_events_never_reach_running(
            events in proptest::collection::vec(transport_event(), 0..64)
        ) {
            let cell = LifecycleCell::new();
            for event in events {
                let state = cell.notify(event.into());
                prop_assert!(matches!(state, AppState::Idle | AppState::Ready));
                if event == TransportEvent::Disconnected {
                    prop_assert_eq!(state, AppState::Idle);
                }
            }
        }
    }
}
