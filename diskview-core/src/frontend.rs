//! Display/input frontend
//!
//! One [`Frontend::step`] is one frame of the foreground task: sample
//! the touch digitizer, forward the pointer change to the GUI, advance
//! the GUI event loop and redraw the status line. The frontend never
//! looks at the device lifecycle.

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::String;

use diskview_hal::TouchController;

use crate::config::StatusConfig;
use crate::exclusive::{ExclusiveSection, SectionError, Shared};
use crate::traits::{Gui, GuiError, PointerEvent};

/// Input layer that touch events are routed to
pub const TOUCH_LAYER: u8 = 0;

/// Capacity of the formatted status line
pub const STATUS_LINE_LEN: usize = 16;

/// Errors from one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    Section(SectionError),
    Gui(GuiError),
}

impl From<SectionError> for FrameError {
    fn from(e: SectionError) -> Self {
        FrameError::Section(e)
    }
}

impl From<GuiError> for FrameError {
    fn from(e: GuiError) -> Self {
        FrameError::Gui(e)
    }
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameReport {
    /// Pointer change forwarded this frame
    pub pointer: Option<PointerEvent>,
    /// Events handled by the GUI event loop
    pub handled: usize,
}

/// Format the processor utilization line
///
/// Trailing spaces overwrite the tail of a previously longer value.
pub fn status_line(cpu_percent: u8) -> String<STATUS_LINE_LEN> {
    let mut line = String::new();
    // "CPU : 255%   " is the longest possible line and fits
    let _ = write!(line, "CPU : {}%   ", cpu_percent);
    line
}

/// Foreground display/input task state
pub struct Frontend<T> {
    touch: T,
    last: PointerEvent,
    status: StatusConfig,
}

impl<T: TouchController> Frontend<T> {
    pub fn new(touch: T, status: StatusConfig) -> Self {
        Self {
            touch,
            last: PointerEvent::default(),
            status,
        }
    }

    /// Sample the digitizer and return the pointer change, if any
    ///
    /// A release is reported at the last contact position.
    pub fn sample(&mut self) -> Option<PointerEvent> {
        let raw = self.touch.state();
        let event = if raw.detected {
            PointerEvent {
                pressed: true,
                layer: TOUCH_LAYER,
                x: raw.x,
                y: raw.y,
            }
        } else {
            PointerEvent {
                pressed: false,
                ..self.last
            }
        };

        if event == self.last {
            None
        } else {
            self.last = event;
            Some(event)
        }
    }

    /// Run one frame
    ///
    /// The digitizer is sampled before touching the shared resources, so
    /// the touch bus is never held across the GUI work.
    pub fn step<M, G, const N: usize>(
        &mut self,
        section: &ExclusiveSection<M, Shared<G, N>>,
        cpu_percent: u8,
    ) -> Result<FrameReport, FrameError>
    where
        M: RawMutex,
        G: Gui,
    {
        let pointer = self.sample();
        let line = status_line(cpu_percent);
        let StatusConfig { x, y } = self.status;

        let handled = section.access(|shared| -> Result<usize, GuiError> {
            if let Some(event) = pointer {
                shared.gui.store_pointer(event);
            }
            let handled = shared.gui.exec()?;
            shared.gui.print_at(&line, x, y)?;
            Ok(handled)
        })??;

        Ok(FrameReport { pointer, handled })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use diskview_hal::TouchState;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use std::collections::VecDeque;
    use std::string::{String as StdString, ToString};
    use std::vec::Vec;

    struct ScriptedTouch {
        samples: VecDeque<TouchState>,
    }

    impl ScriptedTouch {
        fn new(samples: &[TouchState]) -> Self {
            Self {
                samples: samples.iter().copied().collect(),
            }
        }
    }

    impl TouchController for ScriptedTouch {
        fn state(&mut self) -> TouchState {
            self.samples.pop_front().unwrap_or_default()
        }
    }

    fn touch(x: u16, y: u16) -> TouchState {
        TouchState {
            detected: true,
            x,
            y,
        }
    }

    #[derive(Default)]
    struct RecordingGui {
        queued: Vec<PointerEvent>,
        handled: Vec<PointerEvent>,
        lines: Vec<(StdString, u16, u16)>,
        fail_draw: bool,
    }

    impl Gui for RecordingGui {
        fn store_pointer(&mut self, event: PointerEvent) {
            self.queued.push(event);
        }
        fn exec(&mut self) -> Result<usize, GuiError> {
            let n = self.queued.len();
            self.handled.append(&mut self.queued);
            Ok(n)
        }
        fn clear(&mut self) -> Result<(), GuiError> {
            Ok(())
        }
        fn print(&mut self, _text: &str) -> Result<(), GuiError> {
            Ok(())
        }
        fn print_at(&mut self, text: &str, x: u16, y: u16) -> Result<(), GuiError> {
            if self.fail_draw {
                return Err(GuiError::Bus);
            }
            self.lines.push((text.to_string(), x, y));
            Ok(())
        }
    }

    type Section = ExclusiveSection<CriticalSectionRawMutex, Shared<RecordingGui, 16>>;

    fn section() -> Section {
        ExclusiveSection::new(
            CriticalSectionRawMutex::new(),
            Shared::new(RecordingGui::default()),
        )
    }

    #[test]
    fn test_status_line_format() {
        assert_eq!(status_line(7).as_str(), "CPU : 7%   ");
        assert_eq!(status_line(100).as_str(), "CPU : 100%   ");
        assert_eq!(status_line(255).as_str(), "CPU : 255%   ");
    }

    #[test]
    fn test_frame_draws_status_line() {
        let section = section();
        let mut frontend = Frontend::new(ScriptedTouch::new(&[]), StatusConfig::default());

        let report = frontend.step(&section, 42).unwrap();
        assert_eq!(report.pointer, None);
        assert_eq!(report.handled, 0);
        section
            .access(|shared| {
                assert_eq!(shared.gui.lines.len(), 1);
                let (text, x, y) = &shared.gui.lines[0];
                assert_eq!(text, "CPU : 42%   ");
                assert_eq!((*x, *y), (120, 300));
            })
            .unwrap();
    }

    #[test]
    fn test_press_hold_release() {
        let section = section();
        let mut frontend = Frontend::new(
            ScriptedTouch::new(&[
                touch(10, 20),
                touch(10, 20),
                touch(12, 24),
                TouchState::default(),
                TouchState::default(),
            ]),
            StatusConfig::default(),
        );

        let forwarded: Vec<_> = (0..5)
            .map(|_| frontend.step(&section, 0).unwrap().pointer)
            .collect();

        let pressed = |x, y| PointerEvent {
            pressed: true,
            layer: TOUCH_LAYER,
            x,
            y,
        };
        assert_eq!(
            forwarded,
            [
                Some(pressed(10, 20)),
                None,
                Some(pressed(12, 24)),
                Some(PointerEvent {
                    pressed: false,
                    layer: TOUCH_LAYER,
                    x: 12,
                    y: 24
                }),
                None,
            ]
        );
        section
            .access(|shared| assert_eq!(shared.gui.handled.len(), 3))
            .unwrap();
    }

    #[test]
    fn test_frame_inside_section_is_busy() {
        let section = section();
        let mut frontend = Frontend::new(ScriptedTouch::new(&[]), StatusConfig::default());

        let result = section.enter(|_| frontend.step(&section, 0)).unwrap();
        assert_eq!(result, Err(FrameError::Section(SectionError::Busy)));
    }

    #[test]
    fn test_draw_failure_is_reported() {
        let section = section();
        section.access(|shared| shared.gui.fail_draw = true).unwrap();
        let mut frontend = Frontend::new(ScriptedTouch::new(&[]), StatusConfig::default());

        assert_eq!(
            frontend.step(&section, 0),
            Err(FrameError::Gui(GuiError::Bus))
        );
    }

    #[test]
    fn test_custom_status_position() {
        let section = section();
        let mut frontend =
            Frontend::new(ScriptedTouch::new(&[]), StatusConfig { x: 4, y: 8 });
        frontend.step(&section, 1).unwrap();
        section
            .access(|shared| {
                let (_, x, y) = &shared.gui.lines[0];
                assert_eq!((*x, *y), (4, 8));
            })
            .unwrap();
    }
}
