//! Graph surface shared between the display thread and the SDL window.
//!
//! SDL must stay on the main thread, so the display stage draws into its own
//! `FrameBuffer` and each flush publishes a copy. The main thread takes the
//! latest published frame and copies it onto the simulator display.

use std::convert::Infallible;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::SimulatorDisplay;
use thermograph::BitmapSurface;
use thermograph::render::FrameBuffer;

/// Most recently flushed frame, if the window has not picked it up yet.
pub type LatestFrame = Signal<CriticalSectionRawMutex, FrameBuffer>;

/// Draws into a `FrameBuffer`; `flush` publishes it to `latest`.
pub struct SharedSurface {
    frame: FrameBuffer,
    latest: &'static LatestFrame,
}

impl SharedSurface {
    pub fn new(latest: &'static LatestFrame) -> Self {
        Self {
            frame: FrameBuffer::new(),
            latest,
        }
    }
}

impl BitmapSurface for SharedSurface {
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

    fn flush(&mut self) { self.latest.signal(self.frame.clone()); }
}

impl OriginDimensions for SharedSurface {
    fn size(&self) -> Size { self.frame.size() }
}

impl DrawTarget for SharedSurface {
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

/// Replace the simulator display contents with `frame`.
pub fn present(
    display: &mut SimulatorDisplay<BinaryColor>,
    frame: &FrameBuffer,
) {
    display.clear(BinaryColor::Off).ok();
    display
        .draw_iter(frame.lit_pixels().map(|p| Pixel(p, BinaryColor::On)))
        .ok();
}

// =============================================================================
// Tests
// =============================================================================
