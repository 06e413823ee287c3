//! In-memory 128x64 monochrome framebuffer with change detection.
//!
//! Screens draw into this buffer. Once a frame is complete, only the
//! rectangle around changed pixels is pushed to the real display, or the
//! whole buffer is dumped as text by the simulator.

use core::convert::Infallible;
use core::fmt;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::screens::constants::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

const WIDTH: usize = DISPLAY_WIDTH_PX as usize;
const HEIGHT: usize = DISPLAY_HEIGHT_PX as usize;

/// One bit per pixel, row-major, MSB is the leftmost pixel.
const BYTES_PER_ROW: usize = WIDTH / 8;
const BUFFER_LEN: usize = BYTES_PER_ROW * HEIGHT;

/// Bounding box of pixels that changed since the last flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn area(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.min_x as i32, self.min_y as i32),
            Size::new(
                (self.max_x - self.min_x + 1) as u32,
                (self.max_y - self.min_y + 1) as u32,
            ),
        )
    }
}

/// 128x64 `DrawTarget<Color = BinaryColor>` backed by a 1 KiB array.
#[derive(Clone)]
pub struct FrameBuffer {
    bits: [u8; BUFFER_LEN],
    dirty: Option<DirtyRect>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// A blank buffer with nothing pending.
    pub const fn new() -> Self {
        Self {
            bits: [0; BUFFER_LEN],
            dirty: None,
        }
    }

    #[inline]
    fn locate(x: usize, y: usize) -> (usize, u8) {
        (y * BYTES_PER_ROW + x / 8, 0x80 >> (x % 8))
    }

    /// Colour at (`x`, `y`). Out-of-range coordinates read as off.
    pub fn pixel(&self, x: usize, y: usize) -> BinaryColor {
        if x >= WIDTH || y >= HEIGHT {
            return BinaryColor::Off;
        }
        let (idx, mask) = Self::locate(x, y);
        if self.bits[idx] & mask != 0 {
            BinaryColor::On
        } else {
            BinaryColor::Off
        }
    }

    /// Number of lit pixels.
    pub fn lit_pixels(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    /// Whether anything changed since the last [`flush`](Self::flush).
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Write a pixel, growing the dirty rect only when the colour changes.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: BinaryColor) {
        let (idx, mask) = Self::locate(x, y);
        let was_on = self.bits[idx] & mask != 0;
        if was_on == color.is_on() {
            return;
        }

        self.bits[idx] ^= mask;
        match &mut self.dirty {
            Some(rect) => rect.expand(x, y),
            None => self.dirty = Some(DirtyRect::from_point(x, y)),
        }
    }

    /// Push the changed region to `display` and clear the dirty state.
    ///
    /// A no-op when nothing changed.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let area = rect.area();
        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            area.size.width, area.size.height, rect.min_x, rect.min_y
        );

        let this = &*self;
        let colors = (rect.min_y..=rect.max_y)
            .flat_map(move |y| (rect.min_x..=rect.max_x).map(move |x| this.pixel(x, y)));
        display.fill_contiguous(&area, colors)
    }

    /// Write the buffer as text, two pixel rows per line using half blocks.
    pub fn render_text<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for y in (0..HEIGHT).step_by(2) {
            for x in 0..WIDTH {
                let top = self.pixel(x, y).is_on();
                let bottom = self.pixel(x, y + 1).is_on();
                out.write_char(match (top, bottom) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                })?;
            }
            out.write_char('\n')?;
        }
        Ok(())
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("lit_pixels", &self.lit_pixels())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0
                && coord.y >= 0
                && (coord.x as usize) < WIDTH
                && (coord.y as usize) < HEIGHT
            {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let visible = area.intersection(&self.bounding_box());
        let Some(bottom_right) = visible.bottom_right() else {
            return Ok(());
        };

        for y in visible.top_left.y..=bottom_right.y {
            for x in visible.top_left.x..=bottom_right.x {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}
