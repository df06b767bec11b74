//! embedded-graphics adapter for the display surface trait
//!
//! Bridges the application's pixel/text operations onto any
//! `DrawTarget<Color = Rgb565>`. Text uses a fixed-cell monospace font;
//! the font metrics feed the editor's line-length computation.

use embassy_rp::gpio::Output;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use quill_core::traits::display::{Color, DisplaySurface, SurfaceError};

/// Backlight turns off below this brightness
const BACKLIGHT_ON_THRESHOLD: f32 = 0.05;

/// `DisplaySurface` over an embedded-graphics draw target
///
/// Panel bring-up happens before construction; a `GfxSurface` is ready to
/// draw. Draw errors from the target all surface as communication errors -
/// the panel gives no finer diagnosis over SPI.
pub struct GfxSurface<T> {
    target: T,
    backlight: Output<'static>,
    font: &'static MonoFont<'static>,
}

impl<T> GfxSurface<T>
where
    T: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    pub fn new(target: T, backlight: Output<'static>, font: &'static MonoFont<'static>) -> Self {
        Self {
            target,
            backlight,
            font,
        }
    }

    fn rgb(color: Color) -> Rgb565 {
        Rgb565::from(RawU16::new(color.0))
    }
}

impl<T> DisplaySurface for GfxSurface<T>
where
    T: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    fn clear(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.target
            .clear(Self::rgb(color))
            .map_err(|_| SurfaceError::Communication)
    }

    fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        color: Color,
    ) -> Result<(), SurfaceError> {
        Rectangle::new(
            Point::new(x as i32, y as i32),
            Size::new(width as u32, height as u32),
        )
        .into_styled(PrimitiveStyle::with_fill(Self::rgb(color)))
        .draw(&mut self.target)
        .map_err(|_| SurfaceError::Communication)
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: u16,
        y: u16,
        fg: Color,
        bg: Color,
    ) -> Result<(), SurfaceError> {
        let style = MonoTextStyleBuilder::new()
            .font(self.font)
            .text_color(Self::rgb(fg))
            .background_color(Self::rgb(bg))
            .build();

        Text::with_baseline(text, Point::new(x as i32, y as i32), style, Baseline::Top)
            .draw(&mut self.target)
            .map_err(|_| SurfaceError::Communication)?;
        Ok(())
    }

    fn width(&self) -> u16 {
        self.target.size().width as u16
    }

    fn height(&self) -> u16 {
        self.target.size().height as u16
    }

    fn font_width(&self) -> u16 {
        (self.font.character_size.width + self.font.character_spacing) as u16
    }

    fn font_height(&self) -> u16 {
        self.font.character_size.height as u16
    }

    fn set_backlight(&mut self, brightness: f32) {
        if brightness >= BACKLIGHT_ON_THRESHOLD {
            self.backlight.set_high();
        } else {
            self.backlight.set_low();
        }
    }

    fn refresh(&mut self) -> Result<(), SurfaceError> {
        // The panel draws write-through; nothing buffered to push
        Ok(())
    }
}
