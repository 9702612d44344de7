//! Display driver for Pimoroni PIM715 Display Pack 2.8" (ST7789).
//!
//! Pin mapping for PIM715:
//! - CS: GPIO17
//! - DC: GPIO16
//! - CLK: GPIO18 (SPI0 CLK)
//! - MOSI: GPIO19 (SPI0 TX)
//! - Backlight: GPIO20
//! - Reset: Tied to RUN pin (resets with Pico)
//!
//! The graph is rendered into a 96x16 [`FrameBuffer`] and blitted to the
//! middle of the 320x240 panel, each graph pixel drawn as a `SCALE`x`SCALE`
//! block.

use core::convert::Infallible;

use display_interface_spi::SPIInterface;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Config as SpiConfig, Spi};
use embedded_graphics::pixelcolor::{BinaryColor, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::models::ST7789;
use mipidsi::options::{ColorInversion, Orientation, Rotation};
use mipidsi::{Builder, NoResetPin};
use thermograph::BitmapSurface;
use thermograph::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use thermograph::render::FrameBuffer;

/// Display type alias for the ST7789 on PIM715 (no reset pin).
pub type Pim715Display<'d> = mipidsi::Display<
    SPIInterface<ExclusiveDevice<Spi<'d, SPI0, Blocking>, Output<'d>, embedded_hal_bus::spi::NoDelay>, Output<'d>>,
    ST7789,
    NoResetPin,
>;

/// Panel size after rotation (landscape).
const PANEL_WIDTH: u32 = 320;
const PANEL_HEIGHT: u32 = 240;

/// Panel pixels per graph pixel.
const SCALE: u32 = 3;

const LIT: Rgb565 = Rgb565::GREEN;
const UNLIT: Rgb565 = Rgb565::BLACK;

const _: () = assert!(DISPLAY_WIDTH * SCALE <= PANEL_WIDTH);
const _: () = assert!(DISPLAY_HEIGHT * SCALE <= PANEL_HEIGHT);

/// Initialize the PIM715 display.
///
/// Returns the initialized display ready for drawing.
pub fn init_display<'d>(
    spi: Spi<'d, SPI0, Blocking>,
    cs: Output<'d>,
    dc: Output<'d>,
) -> Pim715Display<'d> {
    // Create SPI device with chip select
    let spi_device = ExclusiveDevice::new_no_delay(spi, cs).unwrap();

    // Create display interface
    let di = SPIInterface::new(spi_device, dc);

    // Native panel is 240x320 (portrait), rotated 90 degrees for landscape
    Builder::new(ST7789, di)
        .display_size(240, 320)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .invert_colors(ColorInversion::Inverted)
        .init(&mut embassy_time::Delay)
        .unwrap()
}

/// SPI configuration for the ST7789 display.
///
/// The ST7789 supports up to 62.5MHz SPI clock.
/// We use 40MHz for reliable operation.
pub fn display_spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = 40_000_000; // 40MHz
    config
}

// =============================================================================
// Graph Surface
// =============================================================================

/// Monochrome graph surface backed by the colour panel.
///
/// Drawing goes to the framebuffer; `flush` pushes the whole scaled frame in
/// one contiguous SPI transfer.
pub struct PanelSurface<'d> {
    frame: FrameBuffer,
    panel: Pim715Display<'d>,
}

impl<'d> PanelSurface<'d> {
    pub fn new(mut panel: Pim715Display<'d>) -> Self {
        panel.clear(UNLIT).ok();
        Self {
            frame: FrameBuffer::new(),
            panel,
        }
    }

    fn area() -> Rectangle {
        let size = Size::new(DISPLAY_WIDTH * SCALE, DISPLAY_HEIGHT * SCALE);
        let origin = Point::new(
            ((PANEL_WIDTH - size.width) / 2) as i32,
            ((PANEL_HEIGHT - size.height) / 2) as i32,
        );
        Rectangle::new(origin, size)
    }
}

impl BitmapSurface for PanelSurface<'_> {
    fn clear(&mut self) { BitmapSurface::clear(&mut self.frame); }

    fn draw_image(
        &mut self,
        bits: &[u8],
        x: u32,
        row: u32,
        width: u32,
        height: u32,
    ) {
        self.frame.draw_image(bits, x, row, width, height);
    }

    fn flush(&mut self) {
        let area = Self::area();
        let frame = &self.frame;
        let colors = (0..area.size.height).flat_map(move |y| {
            (0..area.size.width).map(move |x| if frame.pixel(x / SCALE, y / SCALE) { LIT } else { UNLIT })
        });
        self.panel.fill_contiguous(&area, colors).ok();
    }
}

impl OriginDimensions for PanelSurface<'_> {
    fn size(&self) -> Size { self.frame.size() }
}

impl DrawTarget for PanelSurface<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.frame.draw_iter(pixels)
    }
}
