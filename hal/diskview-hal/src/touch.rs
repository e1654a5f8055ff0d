//! Touch digitizer abstraction

/// One raw sample from the touch digitizer, in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchState {
    /// Contact detected on this sample
    pub detected: bool,
    /// Horizontal position in pixels
    pub x: u16,
    /// Vertical position in pixels
    pub y: u16,
}

/// Touch digitizer
pub trait TouchController {
    /// Sample the digitizer once
    ///
    /// A bus failure is reported as "no contact"; the caller samples
    /// again on the next period.
    fn state(&mut self) -> TouchState;
}
