//! Display geometry and graph placement.
//!
//! The target panel is a 96x16 monochrome display organised as two 8-pixel
//! pages. Each byte written to a page is one column of 8 pixels, bit 0 on top.

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (columns).
pub const DISPLAY_WIDTH: u32 = 96;

/// Display height in pixels.
pub const DISPLAY_HEIGHT: u32 = 16;

/// Pixels per page (one byte per column).
pub const PAGE_HEIGHT: u32 = 8;

/// Number of pages (rows of bytes). Page 0 is the upper half.
pub const DISPLAY_PAGES: usize = (DISPLAY_HEIGHT / PAGE_HEIGHT) as usize;

const _: () = assert!(DISPLAY_HEIGHT % PAGE_HEIGHT == 0);

// =============================================================================
// Graph Layout
// =============================================================================

/// Column where the y-axis bar starts (two columns wide).
pub const Y_AXIS_X: u32 = 9;

/// Width of the y-axis bar in columns.
pub const Y_AXIS_WIDTH: u32 = 2;

/// First column of plotted data, just right of the y-axis.
pub const AXIS_OFFSET: u32 = Y_AXIS_X + Y_AXIS_WIDTH;

/// Number of plotted columns (one averaged value per column).
pub const GRAPH_COLUMNS: usize = (DISPLAY_WIDTH - AXIS_OFFSET) as usize;

const _: () = assert!(GRAPH_COLUMNS == 85);
