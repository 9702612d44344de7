//! Paged monochrome framebuffer and the display surface trait.
//!
//! [`BitmapSurface`] is the contract the display task draws through: clear the
//! screen, blit packed column bytes into pages, flush. The panel driver lives
//! outside this crate; [`FrameBuffer`] is the in-memory implementation used by
//! the firmware and the simulator before pushing pixels to real hardware.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::config::{DISPLAY_HEIGHT, DISPLAY_PAGES, DISPLAY_WIDTH, PAGE_HEIGHT};

/// Collaborator interface for a page-organised bitmap display.
pub trait BitmapSurface {
    /// Blank the whole surface.
    fn clear(&mut self);

    /// Draw `width * height` packed column bytes at column `x`, page `row`.
    ///
    /// `bits` is row-major: `height` pages of `width` bytes each. Anything
    /// falling outside the surface is clipped.
    fn draw_image(
        &mut self,
        bits: &[u8],
        x: u32,
        row: u32,
        width: u32,
        height: u32,
    );

    /// Called once after every full redraw.
    fn flush(&mut self) {}
}

/// Width in bytes of one page.
const PAGE_BYTES: usize = DISPLAY_WIDTH as usize;

/// 96x16 monochrome framebuffer, two pages of one byte per column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pages: [[u8; PAGE_BYTES]; DISPLAY_PAGES],
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            pages: [[0; PAGE_BYTES]; DISPLAY_PAGES],
        }
    }

    /// Raw bytes of one page.
    #[inline]
    pub fn page(
        &self,
        page: usize,
    ) -> &[u8; PAGE_BYTES] {
        &self.pages[page]
    }

    /// Byte at column `x` of page `page`.
    #[inline]
    pub fn column(
        &self,
        x: usize,
        page: usize,
    ) -> u8 {
        self.pages[page][x]
    }

    /// Whether the pixel at (`x`, `y`) is lit. Out-of-bounds reads are off.
    pub fn pixel(
        &self,
        x: u32,
        y: u32,
    ) -> bool {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return false;
        }
        let byte = self.pages[(y / PAGE_HEIGHT) as usize][x as usize];
        byte & (1 << (y % PAGE_HEIGHT)) != 0
    }

    /// Iterate over every lit pixel.
    pub fn lit_pixels(&self) -> impl Iterator<Item = Point> + '_ {
        (0..DISPLAY_HEIGHT).flat_map(move |y| {
            (0..DISPLAY_WIDTH)
                .filter(move |&x| self.pixel(x, y))
                .map(move |x| Point::new(x as i32, y as i32))
        })
    }
}

impl Default for FrameBuffer {
    fn default() -> Self { Self::new() }
}

impl BitmapSurface for FrameBuffer {
    fn clear(&mut self) { self.pages = [[0; PAGE_BYTES]; DISPLAY_PAGES]; }

    fn draw_image(
        &mut self,
        bits: &[u8],
        x: u32,
        row: u32,
        width: u32,
        height: u32,
    ) {
        for r in 0..height {
            let page = (row + r) as usize;
            if page >= DISPLAY_PAGES {
                break;
            }
            for c in 0..width {
                let col = (x + c) as usize;
                let Some(&byte) = bits.get((r * width + c) as usize) else {
                    return;
                };
                if col < PAGE_BYTES {
                    self.pages[page][col] = byte;
                }
            }
        }
    }
}

// =============================================================================
// embedded-graphics integration (text banners, simulator output)
// =============================================================================

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size { Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT) }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
                continue;
            }
            let byte = &mut self.pages[(y / PAGE_HEIGHT) as usize][x as usize];
            let mask = 1u8 << (y % PAGE_HEIGHT);
            match color {
                BinaryColor::On => *byte |= mask,
                BinaryColor::Off => *byte &= !mask,
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
