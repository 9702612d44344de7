//! Rendering for the 96x16 monochrome graph.
//!
//! - `encoder`: Averaged value -> packed column byte and page
//! - `framebuffer`: `BitmapSurface` trait and the in-memory `FrameBuffer`
//! - `graph`: Axis decoration, full-frame graph redraw, text banners
//! - `styles`: Const text styles

pub mod encoder;
pub mod framebuffer;
pub mod graph;
pub mod styles;

pub use encoder::{ColumnPattern, Row, encode_column};
pub use framebuffer::{BitmapSurface, FrameBuffer};
pub use graph::{draw_axis, draw_banner, draw_fault_banner, draw_graph};
