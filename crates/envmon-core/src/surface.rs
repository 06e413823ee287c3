//! The drawing surface the screens render onto.
//!
//! Screens only ever issue the five calls of [`Surface`]. Pixel work is left
//! to an embedded-graphics [`DrawTarget`] behind [`GraphicsSurface`].

use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X9};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

/// Monochrome drawing surface with an explicit present step.
pub trait Surface {
    type Error: core::fmt::Debug;

    /// Blank the whole surface.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), Self::Error>;

    fn draw_filled_rect(&mut self, x: i32, y: i32, width: u32, height: u32)
    -> Result<(), Self::Error>;

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<(), Self::Error>;

    /// Make everything drawn since the last present visible.
    fn present(&mut self) -> Result<(), Self::Error>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    type Error = S::Error;

    fn clear(&mut self) -> Result<(), Self::Error> {
        (**self).clear()
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), Self::Error> {
        (**self).draw_text(text, x, y)
    }

    fn draw_filled_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<(), Self::Error> {
        (**self).draw_filled_rect(x, y, width, height)
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<(), Self::Error> {
        (**self).draw_line(x1, y1, x2, y2)
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        (**self).present()
    }
}

/// [`Surface`] over any monochrome embedded-graphics target.
///
/// `present` is whatever pushes pixels out: `flush()` on a buffered SSD1306,
/// or a terminal dump in the simulator.
pub struct GraphicsSurface<D, F> {
    target: D,
    present: F,
}

impl<D, F> GraphicsSurface<D, F>
where
    D: DrawTarget<Color = BinaryColor>,
    F: FnMut(&mut D) -> Result<(), D::Error>,
{
    pub fn new(target: D, present: F) -> Self {
        Self { target, present }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }
}

impl<D, F> Surface for GraphicsSurface<D, F>
where
    D: DrawTarget<Color = BinaryColor>,
    D::Error: core::fmt::Debug,
    F: FnMut(&mut D) -> Result<(), D::Error>,
{
    type Error = D::Error;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.target.clear(BinaryColor::Off)
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), Self::Error> {
        let style = MonoTextStyle::new(&FONT_6X9, BinaryColor::On);
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut self.target)?;
        Ok(())
    }

    fn draw_filled_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<(), Self::Error> {
        Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut self.target)
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<(), Self::Error> {
        Line::new(Point::new(x1, y1), Point::new(x2, y2))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut self.target)
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        (self.present)(&mut self.target)
    }
}
