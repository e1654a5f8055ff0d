//! GUI subsystem trait
//!
//! The GUI is a dumb text surface plus an input sink. All decisions
//! about what to show are made by the watcher and the frontend.

/// Errors from the GUI surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GuiError {
    /// Display bus transfer failed
    Bus,
    /// Position outside the drawable area
    OutOfBounds,
}

/// Normalized pointer input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerEvent {
    /// Contact present
    pub pressed: bool,
    /// Logical input layer
    pub layer: u8,
    /// Horizontal position in pixels
    pub x: u16,
    /// Vertical position in pixels
    pub y: u16,
}

/// GUI surface and event loop
pub trait Gui {
    /// Queue a pointer event for the next event-loop step
    fn store_pointer(&mut self, event: PointerEvent);

    /// Advance the event loop by one step
    ///
    /// Returns the number of queued events processed.
    fn exec(&mut self) -> Result<usize, GuiError>;

    /// Clear the whole screen and reset the text cursor
    fn clear(&mut self) -> Result<(), GuiError>;

    /// Print text at the cursor, wrapping at the screen edge
    fn print(&mut self, text: &str) -> Result<(), GuiError>;

    /// Print one line of text at a fixed position
    fn print_at(&mut self, text: &str, x: u16, y: u16) -> Result<(), GuiError>;
}
