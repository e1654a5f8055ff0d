//! GPIO indicator output
//!
//! Drives a status LED through any `embedded-hal` output pin. The pin
//! can be wired active-high (default) or active-low.

use diskview_hal::Indicator;
use embedded_hal::digital::OutputPin;

/// LED on a GPIO pin
pub struct Led<P> {
    pin: P,
    /// If true, LED on = pin LOW
    inverted: bool,
    /// Current logical state (true = lit)
    lit: bool,
}

impl<P: OutputPin> Led<P> {
    /// Create a new LED output, initially off
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the LED is lit when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut led = Self {
            pin,
            inverted,
            lit: false,
        };
        led.drive(false);
        led
    }

    /// Create a new LED with active-high output
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a new LED with active-low output
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    fn drive(&mut self, lit: bool) {
        self.lit = lit;
        // Pin errors are infallible on every supported HAL
        let _ = if lit != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }
}

impl<P: OutputPin> Indicator for Led<P> {
    fn on(&mut self) {
        self.drive(true);
    }

    fn off(&mut self) {
        self.drive(false);
    }

    fn is_on(&self) -> bool {
        self.lit
    }
}
