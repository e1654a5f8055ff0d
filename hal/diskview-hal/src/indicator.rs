//! Indicator output abstraction
//!
//! The application drives two binary indicators: "device serviced" and
//! "fault". Implementations decide how on/off maps to pin levels.

/// Binary indicator output
pub trait Indicator {
    /// Light the indicator
    fn on(&mut self);

    /// Turn the indicator off
    fn off(&mut self);

    /// Check if the indicator is currently lit
    fn is_on(&self) -> bool;

    /// Set the indicator to a specific state
    fn set(&mut self, lit: bool) {
        if lit {
            self.on();
        } else {
            self.off();
        }
    }
}
