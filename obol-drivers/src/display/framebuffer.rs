//! Monochrome frame buffer
//!
//! Page-organised like the SSD1306 GDDRAM: byte `x + page * WIDTH` holds
//! eight vertical pixels, LSB on top.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_9X18_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use obol_display::{Align, Canvas, DisplayError, Font};

/// Display dimensions
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
pub const PAGES: usize = HEIGHT / 8;

fn mono_font(font: Font) -> &'static MonoFont<'static> {
    match font {
        Font::Small => &FONT_6X10,
        Font::Medium => &FONT_9X18_BOLD,
        Font::Large => &FONT_10X20,
    }
}

fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Center => Alignment::Center,
        Align::Right => Alignment::Right,
    }
}

pub struct FrameBuffer {
    buffer: [u8; WIDTH * PAGES],
    inverted: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            buffer: [0; WIDTH * PAGES],
            inverted: false,
        }
    }

    /// Raw GDDRAM bytes of one page
    pub fn page(&self, page: usize) -> &[u8] {
        &self.buffer[page * WIDTH..(page + 1) * WIDTH]
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        self.buffer[x + (y / 8) * WIDTH] & (1 << (y % 8)) != 0
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        let byte = &mut self.buffer[x + (y / 8) * WIDTH];
        if on {
            *byte |= 1 << (y % 8);
        } else {
            *byte &= !(1 << (y % 8));
        }
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Clip off-screen pixels
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                if x < WIDTH && y < HEIGHT {
                    self.set_pixel(x, y, color.is_on());
                }
            }
        }
        Ok(())
    }
}

impl Canvas for FrameBuffer {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.buffer.fill(0);
        Ok(())
    }

    /// Applied by the panel on the next flush
    fn set_inverted(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.inverted = inverted;
        Ok(())
    }

    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        font: Font,
        align: Align,
        text: &str,
    ) -> Result<(), DisplayError> {
        let character_style = MonoTextStyle::new(mono_font(font), BinaryColor::On);
        let text_style = TextStyleBuilder::new()
            .alignment(alignment(align))
            .baseline(Baseline::Top)
            .build();

        // Right-aligned text ends on the pixel before `x`
        let x = if align == Align::Right { x - 1 } else { x };

        match Text::with_text_style(text, Point::new(x, y), character_style, text_style).draw(self) {
            Ok(_) => Ok(()),
            Err(never) => match never {},
        }
    }
}
