//! Static text styles for the monochrome panel.
//!
//! Styles are `const` so nothing is built per frame. Only two sizes fit a
//! 16-pixel tall display: the 5x8 font for two-line banners and ProFont 7pt
//! for the single-line fault banner.

use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_5X8},
    pixelcolor::BinaryColor,
    text::{Baseline, TextStyle, TextStyleBuilder},
};
use profont::PROFONT_7_POINT;

/// Top-left anchored text, so a y of 0 or 8 lands exactly on a page.
pub const TOP_LEFT: TextStyle = TextStyleBuilder::new().baseline(Baseline::Top).build();

/// Small text for the startup banner (one line per page).
pub const BANNER_STYLE: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);

/// Fault banner text.
pub const FAULT_STYLE: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(&PROFONT_7_POINT, BinaryColor::On);
