//! Scrolling bar-graph renderer.
//!
//! Every update is a full redraw: clear, axis decoration, then one encoded
//! column per averaged value, oldest on the left. The display is small enough
//! that a full frame costs less than tracking dirty columns.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;

use crate::config::layout::{Y_AXIS_WIDTH, Y_AXIS_X};
use crate::config::{AXIS_OFFSET, GRAPH_COLUMNS};
use crate::fault::Fault;
use crate::render::encoder::encode_column;
use crate::render::framebuffer::BitmapSurface;
use crate::render::styles::{BANNER_STYLE, FAULT_STYLE, TOP_LEFT};
use crate::window::MovingWindow;

// =============================================================================
// Axis Decoration
// =============================================================================

/// Solid y-axis column (both pages).
const Y_AXIS_BAR: [u8; Y_AXIS_WIDTH as usize] = [0xFF; Y_AXIS_WIDTH as usize];

/// X-axis baseline byte (bit 6 of the lower page).
pub const BASELINE: u8 = 0x40;

/// Baseline run under the whole graph.
const X_AXIS: [u8; GRAPH_COLUMNS] = [BASELINE; GRAPH_COLUMNS];

/// "3" of the "30" label, upper page at x = 0.
const LABEL_THREE: [u8; 3] = [0x11, 0x15, 0x1F];

/// "0" of the "30" label, upper page at x = 4.
const LABEL_ZERO_TOP: [u8; 4] = [0x0E, 0x11, 0x11, 0x0E];

/// "0" label next to the baseline, lower page at x = 4.
const LABEL_ZERO_BOTTOM: [u8; 4] = [0x38, 0x44, 0x44, 0x38];

/// Draw the y-axis, x-axis baseline and the "30" / "0" scale labels.
pub fn draw_axis<S: BitmapSurface>(surface: &mut S) {
    surface.draw_image(&Y_AXIS_BAR, Y_AXIS_X, 0, Y_AXIS_WIDTH, 1);
    surface.draw_image(&Y_AXIS_BAR, Y_AXIS_X, 1, Y_AXIS_WIDTH, 1);
    surface.draw_image(&X_AXIS, AXIS_OFFSET, 1, GRAPH_COLUMNS as u32, 1);

    surface.draw_image(&LABEL_THREE, 0, 0, LABEL_THREE.len() as u32, 1);
    surface.draw_image(&LABEL_ZERO_TOP, 4, 0, LABEL_ZERO_TOP.len() as u32, 1);
    surface.draw_image(&LABEL_ZERO_BOTTOM, 4, 1, LABEL_ZERO_BOTTOM.len() as u32, 1);
}

// =============================================================================
// Graph
// =============================================================================

/// Redraw the full graph from `history` (oldest value in the leftmost column).
pub fn draw_graph<S: BitmapSurface, const N: usize>(
    surface: &mut S,
    history: &MovingWindow<N>,
) {
    surface.clear();
    draw_axis(surface);

    for (i, value) in history.iter().enumerate() {
        let pattern = encode_column(value);
        surface.draw_image(&[pattern.bits], i as u32 + AXIS_OFFSET, pattern.row.page(), 1, 1);
    }

    surface.flush();
}

// =============================================================================
// Text Banners
// =============================================================================

/// Two-line startup banner, one line per page.
pub fn draw_banner<D>(
    target: &mut D,
    title: &str,
    subtitle: &str,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off).ok();
    Text::with_text_style(title, Point::new(0, 0), BANNER_STYLE, TOP_LEFT).draw(target).ok();
    Text::with_text_style(subtitle, Point::new(0, 8), BANNER_STYLE, TOP_LEFT).draw(target).ok();
}

/// Fault banner drawn over the graph area when a task halts.
pub fn draw_fault_banner<D>(
    target: &mut D,
    task: &str,
    fault: Fault,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let mut line: heapless::String<24> = heapless::String::new();
    line.push_str(task).ok();
    line.push(' ').ok();
    line.push_str(fault.as_str()).ok();

    target.clear(BinaryColor::Off).ok();
    Text::with_text_style(line.as_str(), Point::new(0, 0), FAULT_STYLE, TOP_LEFT).draw(target).ok();
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::framebuffer::FrameBuffer;

    /// Surface that records every call instead of drawing.
    #[derive(Default)]
    struct RecordingSurface {
        clears: usize,
        flushes: usize,
        draws: Vec<(Vec<u8>, u32, u32, u32, u32)>,
    }

    impl BitmapSurface for RecordingSurface {
        fn clear(&mut self) {
            self.clears += 1;
            self.draws.clear();
        }

        fn draw_image(
            &mut self,
            bits: &[u8],
            x: u32,
            row: u32,
            width: u32,
            height: u32,
        ) {
            self.draws.push((bits.to_vec(), x, row, width, height));
        }

        fn flush(&mut self) { self.flushes += 1; }
    }

    #[test]
    fn test_axis_layout() {
        let mut fb = FrameBuffer::new();
        draw_axis(&mut fb);

        // Y-axis fully lit on both pages
        for x in 9..=10 {
            assert_eq!(fb.column(x, 0), 0xFF);
            assert_eq!(fb.column(x, 1), 0xFF);
        }
        // Baseline under every graph column
        for x in 11..96 {
            assert_eq!(fb.column(x, 1), BASELINE, "column {x}");
            assert_eq!(fb.column(x, 0), 0);
        }
        // Scale labels
        assert_eq!(fb.page(0)[0..3], LABEL_THREE);
        assert_eq!(fb.page(0)[4..8], LABEL_ZERO_TOP);
        assert_eq!(fb.page(1)[4..8], LABEL_ZERO_BOTTOM);
    }

    #[test]
    fn test_graph_is_full_redraw() {
        let mut surface = RecordingSurface::default();
        let history: MovingWindow<GRAPH_COLUMNS> = MovingWindow::new();

        draw_graph(&mut surface, &history);
        draw_graph(&mut surface, &history);

        assert_eq!(surface.clears, 2);
        assert_eq!(surface.flushes, 2);
        // 6 axis blits + one per column, from the last frame only
        assert_eq!(surface.draws.len(), 6 + GRAPH_COLUMNS);
    }

    #[test]
    fn test_graph_columns_follow_history() {
        let mut history: MovingWindow<GRAPH_COLUMNS> = MovingWindow::new();
        history.push(30);
        history.push(17);
        history.push(5);

        let mut fb = FrameBuffer::new();
        draw_graph(&mut fb, &history);

        let last = AXIS_OFFSET as usize + GRAPH_COLUMNS - 1;
        // Newest value (5) in the rightmost column, lower page
        assert_eq!(fb.column(last, 1), 0x50);
        assert_eq!(fb.column(last, 0), 0);
        // 17 on the upper page; the lower page keeps the baseline
        assert_eq!(fb.column(last - 1, 0), 0x40);
        assert_eq!(fb.column(last - 1, 1), BASELINE);
        // 30 at the very top
        assert_eq!(fb.column(last - 2, 0), 0x01);
        // Zero-filled history sits on the baseline
        assert_eq!(fb.column(AXIS_OFFSET as usize, 1), BASELINE);
    }

    #[test]
    fn test_graph_columns_at_axis_offset() {
        let mut surface = RecordingSurface::default();
        let mut history: MovingWindow<GRAPH_COLUMNS> = MovingWindow::new();
        history.push(22);
        draw_graph(&mut surface, &history);

        let columns = &surface.draws[6..];
        for (i, (bits, x, _, w, h)) in columns.iter().enumerate() {
            assert_eq!(*x, AXIS_OFFSET + i as u32);
            assert_eq!((*w, *h), (1, 1));
            assert_eq!(bits.len(), 1);
        }
        let (bits, _, row, _, _) = &columns[GRAPH_COLUMNS - 1];
        assert_eq!(bits[0], 0x08);
        assert_eq!(*row, 0);
    }

    #[test]
    fn test_fault_banner_draws_text() {
        let mut fb = FrameBuffer::new();
        draw_axis(&mut fb);
        draw_fault_banner(&mut fb, "Display", Fault::StackMargin);
        // Axis is gone and some text pixels are lit
        assert_ne!(fb.column(9, 1), 0xFF);
        assert!(fb.lit_pixels().count() > 0);
    }

    #[test]
    fn test_banner_uses_both_pages() {
        let mut fb = FrameBuffer::new();
        draw_banner(&mut fb, "THERMO", "GRAPH");
        assert!(fb.lit_pixels().any(|p| p.y < 8));
        assert!(fb.lit_pixels().any(|p| p.y >= 8));
    }
}
