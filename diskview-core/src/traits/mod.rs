//! Application-side collaborator traits
//!
//! Hardware collaborators (transport, filesystem, touch, indicators) live
//! in `diskview-hal`. The GUI surface is defined here because its input
//! type is an application concept.

pub mod gui;

pub use gui::{Gui, GuiError, PointerEvent};
