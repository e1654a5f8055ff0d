//! Text console GUI
//!
//! A minimal [`Gui`] over any RGB565 `embedded-graphics` draw target:
//! a character-cell text cursor with wrapping, fixed-position lines, and
//! an event loop that marks pressed touch points.

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::Deque;

use diskview_core::traits::{Gui, GuiError, PointerEvent};

/// Pointer events buffered between event-loop steps
pub const EVENT_QUEUE_LEN: usize = 8;

/// Character cell size of the console font
const CELL: Size = Size::new(10, 20);

/// Edge length of a touch marker
const MARKER_SIZE: u32 = 5;

const BACKGROUND: Rgb565 = Rgb565::BLACK;
const FOREGROUND: Rgb565 = Rgb565::WHITE;
const MARKER: Rgb565 = Rgb565::GREEN;

/// Text console on a draw target
pub struct TextConsole<D> {
    target: D,
    style: MonoTextStyle<'static, Rgb565>,
    events: Deque<PointerEvent, EVENT_QUEUE_LEN>,
    /// Cursor position in character cells
    col: u32,
    row: u32,
    /// Events discarded because the queue was full
    dropped: u32,
}

impl<D: DrawTarget<Color = Rgb565>> TextConsole<D> {
    pub fn new(target: D) -> Self {
        Self {
            target,
            style: MonoTextStyleBuilder::new()
                .font(&FONT_10X20)
                .text_color(FOREGROUND)
                .background_color(BACKGROUND)
                .build(),
            events: Deque::new(),
            col: 0,
            row: 0,
            dropped: 0,
        }
    }

    /// Underlying draw target
    pub fn target(&self) -> &D {
        &self.target
    }

    /// Number of pointer events dropped on overflow
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    fn columns(&self) -> u32 {
        self.target.bounding_box().size.width / CELL.width
    }

    fn rows(&self) -> u32 {
        self.target.bounding_box().size.height / CELL.height
    }

    fn newline(&mut self) {
        self.col = 0;
        self.row += 1;
    }

    fn draw_text(&mut self, text: &str, origin: Point) -> Result<(), GuiError> {
        Text::with_baseline(text, origin, self.style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(|_| GuiError::Bus)
    }

    fn draw_marker(&mut self, x: u16, y: u16) -> Result<(), GuiError> {
        Rectangle::with_center(
            Point::new(i32::from(x), i32::from(y)),
            Size::new(MARKER_SIZE, MARKER_SIZE),
        )
        .into_styled(PrimitiveStyle::with_fill(MARKER))
        .draw(&mut self.target)
        .map_err(|_| GuiError::Bus)
    }

    /// Print one line segment at the cursor, wrapping as needed
    fn print_line(&mut self, line: &str) -> Result<(), GuiError> {
        let columns = self.columns();
        let mut rest = line;
        while !rest.is_empty() {
            if self.row >= self.rows() {
                // Off the bottom of the screen
                return Ok(());
            }
            let room = columns.saturating_sub(self.col) as usize;
            if room == 0 {
                self.newline();
                continue;
            }
            let split = rest
                .char_indices()
                .nth(room)
                .map_or(rest.len(), |(i, _)| i);
            let (segment, tail) = rest.split_at(split);
            let origin = Point::new(
                (self.col * CELL.width) as i32,
                (self.row * CELL.height) as i32,
            );
            self.draw_text(segment, origin)?;
            self.col += segment.chars().count() as u32;
            rest = tail;
        }
        Ok(())
    }
}

impl<D: DrawTarget<Color = Rgb565>> Gui for TextConsole<D> {
    fn store_pointer(&mut self, event: PointerEvent) {
        if self.events.is_full() {
            self.events.pop_front();
            self.dropped = self.dropped.saturating_add(1);
        }
        // Cannot fail: a slot was freed above
        let _ = self.events.push_back(event);
    }

    fn exec(&mut self) -> Result<usize, GuiError> {
        let mut handled = 0;
        while let Some(event) = self.events.pop_front() {
            if event.pressed {
                self.draw_marker(event.x, event.y)?;
            }
            handled += 1;
        }
        Ok(handled)
    }

    fn clear(&mut self) -> Result<(), GuiError> {
        self.col = 0;
        self.row = 0;
        self.target.clear(BACKGROUND).map_err(|_| GuiError::Bus)
    }

    fn print(&mut self, text: &str) -> Result<(), GuiError> {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }
            self.print_line(line.trim_end_matches('\r'))?;
        }
        Ok(())
    }

    fn print_at(&mut self, text: &str, x: u16, y: u16) -> Result<(), GuiError> {
        let size = self.target.bounding_box().size;
        if u32::from(x) >= size.width || u32::from(y) >= size.height {
            return Err(GuiError::OutOfBounds);
        }
        // Glyph cells carry the background color, so the old text is erased
        self.draw_text(text, Point::new(i32::from(x), i32::from(y)))
    }
}
