//! Thermograph - testable core of the sensor/average/graph telemetry pipeline.
//!
//! A simulated temperature sensor feeds a moving-average filter, whose output
//! scrolls across a 96x16 monochrome bar-graph. A fourth task reports per-task
//! run-time statistics over a serial link. This crate holds everything that is
//! not hardware: the stages, the bounded hand-off queues, the column encoder,
//! the framebuffer and the statistics report.
//!
//! The firmware (`pico2/`) and the desktop simulator (`simulator/`) supply the
//! executor, the display panel, the UART and the run-time/stack probes.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test --lib
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the firmware links the crate as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

#[macro_use]
pub mod logging;

pub mod config;
pub mod fault;
pub mod profiling;
pub mod random;
pub mod render;
pub mod tasks;
pub mod window;

// Re-export commonly used items
pub use config::PipelineConfig;
pub use fault::{Fault, FaultLatch, TaskState};
pub use render::{BitmapSurface, ColumnPattern, FrameBuffer, Row, encode_column};
pub use tasks::{Periodic, Pipeline, Sample};
pub use window::MovingWindow;
