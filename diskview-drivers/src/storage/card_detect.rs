//! Card-detect storage transport
//!
//! Turns the mechanical card-detect switch of an SD slot into transport
//! notifications. The switch is sampled once per `poll`:
//!
//! - A level must be stable for `debounce_polls` samples before it counts.
//! - Debounced insertion emits `ConfigurationSelected` and starts a settle
//!   countdown, giving the card time to power up.
//! - When the countdown expires, `ClassActive` is emitted once.
//! - Debounced removal emits `Disconnected`, from any phase.

use diskview_hal::{StorageTransport, TransportEvent};
use embedded_hal::digital::InputPin;

/// Default samples a level must hold to be accepted
pub const DEFAULT_DEBOUNCE_POLLS: u8 = 4;

/// Default polls between insertion and `ClassActive`
pub const DEFAULT_SETTLE_POLLS: u16 = 50;

/// Slot phase as seen by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotPhase {
    /// No card
    Empty,
    /// Card inserted, powering up
    Settling { remaining: u16 },
    /// Card ready for use
    Active,
}

/// Storage transport driven by a card-detect switch
pub struct CardDetectTransport<P> {
    pin: P,
    /// If true, a card is present when the pin is LOW
    active_low: bool,
    debounce_polls: u8,
    settle_polls: u16,
    /// Last raw sample and how many polls it has held
    raw: bool,
    held: u8,
    phase: SlotPhase,
}

impl<P: InputPin> CardDetectTransport<P> {
    /// Create a transport with default debounce and settle times
    pub fn new(pin: P, active_low: bool) -> Self {
        Self::with_timing(pin, active_low, DEFAULT_DEBOUNCE_POLLS, DEFAULT_SETTLE_POLLS)
    }

    /// Create a transport with explicit timing, in polls
    pub fn with_timing(pin: P, active_low: bool, debounce_polls: u8, settle_polls: u16) -> Self {
        Self {
            pin,
            active_low,
            debounce_polls: debounce_polls.max(1),
            settle_polls,
            raw: false,
            held: 0,
            phase: SlotPhase::Empty,
        }
    }

    /// Current slot phase
    pub fn phase(&self) -> SlotPhase {
        self.phase
    }

    /// Sample the switch; a read error counts as "no card"
    fn card_present(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => high != self.active_low,
            Err(_) => false,
        }
    }

    /// Debounced presence, or `None` while the level is still settling
    fn debounced(&mut self) -> Option<bool> {
        let present = self.card_present();
        if present == self.raw {
            self.held = self.held.saturating_add(1);
        } else {
            self.raw = present;
            self.held = 1;
        }
        (self.held >= self.debounce_polls).then_some(self.raw)
    }
}

impl<P: InputPin> StorageTransport for CardDetectTransport<P> {
    fn poll(&mut self) -> Option<TransportEvent> {
        let present = self.debounced();

        match (self.phase, present) {
            (SlotPhase::Empty, Some(true)) => {
                self.phase = SlotPhase::Settling {
                    remaining: self.settle_polls,
                };
                Some(TransportEvent::ConfigurationSelected)
            }
            (SlotPhase::Settling { .. } | SlotPhase::Active, Some(false)) => {
                self.phase = SlotPhase::Empty;
                Some(TransportEvent::Disconnected)
            }
            (SlotPhase::Settling { remaining: 0 }, _) => {
                self.phase = SlotPhase::Active;
                Some(TransportEvent::ClassActive)
            }
            (SlotPhase::Settling { remaining }, _) => {
                self.phase = SlotPhase::Settling {
                    remaining: remaining - 1,
                };
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::vec::Vec;

    /// Switch that reports whatever level the test sets
    struct MockSwitch {
        high: bool,
    }

    impl ErrorType for MockSwitch {
        type Error = Infallible;
    }

    impl InputPin for MockSwitch {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    fn transport(debounce: u8, settle: u16) -> CardDetectTransport<MockSwitch> {
        // Active-low switch, idle high (no card)
        CardDetectTransport::with_timing(MockSwitch { high: true }, true, debounce, settle)
    }

    fn run(t: &mut CardDetectTransport<MockSwitch>, polls: usize) -> Vec<TransportEvent> {
        (0..polls).filter_map(|_| t.poll()).collect()
    }

    #[test]
    fn test_no_card_no_events() {
        let mut t = transport(2, 3);
        assert!(run(&mut t, 20).is_empty());
        assert_eq!(t.phase(), SlotPhase::Empty);
    }

    #[test]
    fn test_insert_settle_activate() {
        let mut t = transport(2, 3);
        t.pin.high = false;

        assert_eq!(t.poll(), None);
        assert_eq!(t.poll(), Some(TransportEvent::ConfigurationSelected));
        assert!(run(&mut t, 3).is_empty());
        assert_eq!(t.poll(), Some(TransportEvent::ClassActive));
        assert_eq!(t.phase(), SlotPhase::Active);
        // Active is reported once
        assert!(run(&mut t, 10).is_empty());
    }

    #[test]
    fn test_bounce_is_ignored() {
        let mut t = transport(3, 0);
        for _ in 0..10 {
            t.pin.high = !t.pin.high;
            assert_eq!(t.poll(), None);
        }
        assert_eq!(t.phase(), SlotPhase::Empty);
    }

    #[test]
    fn test_removal_while_settling() {
        let mut t = transport(1, 100);
        t.pin.high = false;
        assert_eq!(t.poll(), Some(TransportEvent::ConfigurationSelected));
        t.pin.high = true;
        assert_eq!(t.poll(), Some(TransportEvent::Disconnected));
        assert!(run(&mut t, 200).is_empty());
    }

    #[test]
    fn test_removal_and_reinsert() {
        let mut t = transport(1, 0);
        t.pin.high = false;
        assert_eq!(
            run(&mut t, 3),
            [
                TransportEvent::ConfigurationSelected,
                TransportEvent::ClassActive
            ]
        );

        t.pin.high = true;
        assert_eq!(run(&mut t, 3), [TransportEvent::Disconnected]);

        t.pin.high = false;
        assert_eq!(
            run(&mut t, 3),
            [
                TransportEvent::ConfigurationSelected,
                TransportEvent::ClassActive
            ]
        );
    }
}
