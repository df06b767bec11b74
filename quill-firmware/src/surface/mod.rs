//! Display surface implementation for the board's panel
//!
//! [`GfxSurface`] adapts any embedded-graphics draw target to the
//! `DisplaySurface` trait the application draws against; the concrete
//! panel behind it is brought up with mipidsi in `main`. Swapping panels
//! means swapping the mipidsi model (and this type alias), nothing above
//! changes.

pub mod gfx;

pub use gfx::GfxSurface;

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7789;

/// SPI device for the panel (bus is exclusive to the display)
pub type PanelSpi = ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, Delay>;

/// The board's concrete mipidsi display
pub type PanelDisplay =
    mipidsi::Display<SpiInterface<'static, PanelSpi, Output<'static>>, ST7789, Output<'static>>;

/// The surface handed to the UI task
pub type BoardSurface = GfxSurface<PanelDisplay>;
