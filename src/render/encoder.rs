//! Column encoder: averaged temperature -> one graph column.
//!
//! The graph is 16 pixels tall, split into two 8-pixel pages. A value maps to
//! a single byte written into one page: bit 0 is the top pixel, bit 7 the
//! bottom. Higher temperatures light higher pixels, so within a page the data
//! bit moves toward bit 0 as the value rises.
//!
//! Lower-page bytes always include bit 6 (`0x40`), the x-axis baseline, so
//! drawing a column never punches a hole in the axis.
//!
//! The bucket table is kept exactly as designed for the panel. Bucket widths
//! are uneven on purpose (4..8 spans four values, 16 and 17 are single-value
//! buckets straddling the page boundary, 28..=30 spans three). Values 0..2 and
//! 16 have no data pixel of their own and sit on the baseline.

use crate::config::{MAX_TEMP, MIN_TEMP};

/// Values above this are drawn on the upper page.
pub const ROW_SPLIT: i32 = 16;

/// Display page a column pattern is written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Row {
    /// Page 0, the top 8 pixels.
    Upper,
    /// Page 1, the bottom 8 pixels (holds the x-axis).
    Lower,
}

impl Row {
    /// Page index on the display.
    #[inline]
    pub const fn page(self) -> u32 {
        match self {
            Self::Upper => 0,
            Self::Lower => 1,
        }
    }
}

/// Packed column byte plus the page it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColumnPattern {
    pub bits: u8,
    pub row: Row,
}

/// Upper bound (exclusive) of each bucket and the byte drawn for it.
/// The last bucket is closed at `MAX_TEMP`.
const BUCKETS: [(i32, u8); 14] = [
    (2, 0x40),  // on the axis
    (4, 0x60),
    (8, 0x50),
    (10, 0x48),
    (12, 0x44),
    (14, 0x42),
    (16, 0x41),
    (18, 0x40), // 16 -> lower page, 17 -> upper page
    (20, 0x20),
    (22, 0x10),
    (24, 0x08),
    (26, 0x04),
    (28, 0x02),
    (MAX_TEMP + 1, 0x01),
];

/// Page selector: upper page for values above `ROW_SPLIT`.
#[inline]
pub const fn row_for(value: i32) -> Row {
    if value > ROW_SPLIT { Row::Upper } else { Row::Lower }
}

/// Encode an averaged value in `MIN_TEMP..=MAX_TEMP` as a column pattern.
///
/// Callers must clamp upstream; the sensor walk guarantees the range. Out of
/// range values trip a debug assertion and saturate to the edge buckets in
/// release builds.
pub fn encode_column(value: i32) -> ColumnPattern {
    debug_assert!(
        (MIN_TEMP..=MAX_TEMP).contains(&value),
        "column value out of range"
    );

    let bits = BUCKETS
        .iter()
        .find(|&&(upper, _)| value < upper)
        .map_or(BUCKETS[BUCKETS.len() - 1].1, |&(_, bits)| bits);

    ColumnPattern {
        bits,
        row: row_for(value),
    }
}

// =============================================================================
// Tests
// =============================================================================
