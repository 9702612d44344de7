//! Thermograph Simulator for Desktop.
//!
//! Runs the library's pipeline loops on std threads sharing one static
//! [`Pipeline`], draws the graph in an `embedded-graphics-simulator` window
//! and prints the statistics table to stdout.
//!
//! Threads, spawned in priority order:
//! - sensor: samples on an absolute 100 ms deadline
//! - average: filters every sample
//! - display: redraws the graph for every average
//! - diagnostics: statistics report every second
//! - main: the SDL window (SDL must stay on this thread)
//!
//! Each stage thread drives its loop with `pollster::block_on`, which parks
//! the thread until a queue wakes it.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod profiling;
mod surface;
mod timing;

use std::thread;
use std::time::Instant;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use heapless::String;
use thermograph::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use thermograph::profiling::push_radix;
use thermograph::render::draw_banner;
use thermograph::tasks::{
    AVERAGE_TASK,
    AverageStage,
    DIAGNOSTICS_TASK,
    DISPLAY_TASK,
    DisplayStage,
    SENSOR_TASK,
    SensorStage,
    run_average,
    run_diagnostics,
    run_display,
    run_sensor,
};
use thermograph::{BitmapSurface, Fault, Pipeline, PipelineConfig};

use crate::profiling::{StdoutSerial, THREAD_STACK_BYTES, ThreadProbe};
use crate::surface::{LatestFrame, SharedSurface, present};
use crate::timing::{BANNER_TIME, DIAGNOSTICS_PERIOD, Deadline, FRAME_TIME, SENSOR_PERIOD};

/// Queues, task monitor and fault latch shared by every stage thread.
static PIPELINE: Pipeline<CriticalSectionRawMutex> = Pipeline::new();

/// Frames flushed by the display thread, picked up by the window.
static FRAME: LatestFrame = Signal::new();

fn main() {
    let config = PipelineConfig::default();
    let epoch = Instant::now();

    let output_settings = OutputSettingsBuilder::new()
        .scale(6)
        .theme(BinaryColorTheme::OledBlue)
        .build();
    let mut window = Window::new("Thermograph Sim", &output_settings);
    let mut display = SimulatorDisplay::new(Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT));

    // Startup banner with the walk seed
    let mut surface = SharedSurface::new(&FRAME);
    let mut subtitle: String<16> = String::new();
    subtitle.push_str("seed ").ok();
    push_radix(&mut subtitle, config.seed.into(), 16);
    draw_banner(&mut surface, "THERMOGRAPH", &subtitle);
    surface.flush();

    let banner_end = Instant::now() + BANNER_TIME;
    while Instant::now() < banner_end {
        if !refresh(&mut window, &mut display) {
            return;
        }
    }

    spawn_task(SENSOR_TASK, epoch, move |probe| {
        let mut stage = SensorStage::new(&config);
        let mut deadline = Deadline::new(SENSOR_PERIOD);
        pollster::block_on(run_sensor(&PIPELINE, probe, &mut deadline, &mut stage))
    });
    spawn_task(AVERAGE_TASK, epoch, move |probe| {
        let mut stage = AverageStage::new(&config);
        pollster::block_on(run_average(&PIPELINE, probe, &mut stage))
    });
    spawn_task(DISPLAY_TASK, epoch, move |probe| {
        let mut stage = DisplayStage::new();
        pollster::block_on(run_display(&PIPELINE, probe, &mut stage, &mut surface))
    });
    spawn_task(DIAGNOSTICS_TASK, epoch, move |probe| {
        let mut serial = StdoutSerial::new();
        let mut deadline = Deadline::new(DIAGNOSTICS_PERIOD);
        pollster::block_on(run_diagnostics(&PIPELINE, probe, &mut deadline, &mut serial))
    });

    while refresh(&mut window, &mut display) {}
}

/// Show the latest frame and handle window events for one frame time.
///
/// Returns `false` once the window is closed.
fn refresh(
    window: &mut Window,
    display: &mut SimulatorDisplay<BinaryColor>,
) -> bool {
    if let Some(frame) = FRAME.try_take() {
        present(display, &frame);
    }
    window.update(display);

    if window.events().any(|ev| matches!(ev, SimulatorEvent::Quit)) {
        return false;
    }
    thread::sleep(FRAME_TIME);
    true
}

/// Run one pipeline stage on its own thread.
///
/// Blocks until the stage has registered with the monitor (or given up), so
/// stages register, and report, in spawn order.
fn spawn_task<F>(
    name: &'static str,
    epoch: Instant,
    body: F,
) where
    F: FnOnce(&ThreadProbe) -> Fault + Send + 'static,
{
    let registered = PIPELINE.monitor().len() + 1;

    let handle = thread::Builder::new()
        .name(name.into())
        .stack_size(THREAD_STACK_BYTES)
        .spawn(move || {
            let probe = ThreadProbe::new(epoch);
            let fault = body(&probe);
            eprintln!("{name} task halted: {fault}");
        })
        .expect("failed to spawn task thread");

    while PIPELINE.monitor().len() < registered && !handle.is_finished() {
        thread::yield_now();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_stage_threads_share_pipeline() {
        let config = PipelineConfig::default();
        let epoch = Instant::now();

        spawn_task(SENSOR_TASK, epoch, move |probe| {
            let mut stage = SensorStage::new(&config);
            let mut deadline = Deadline::new(Duration::from_millis(1));
            pollster::block_on(run_sensor(&PIPELINE, probe, &mut deadline, &mut stage))
        });
        spawn_task(AVERAGE_TASK, epoch, move |probe| {
            let mut stage = AverageStage::new(&config);
            pollster::block_on(run_average(&PIPELINE, probe, &mut stage))
        });

        // Seed 0xDEADBEEF through a window of 5, across threads
        let averages: Vec<i32> = (0..20)
            .map(|_| pollster::block_on(PIPELINE.average_queue().receive()))
            .collect();
        assert_eq!(averages, [3, 6, 9, 13, 16, 16, 16, 16, 16, 16, 17, 17, 17, 17, 17, 17, 18, 18, 18, 17]);

        let names: Vec<&str> = PIPELINE.monitor().snapshot().iter().map(|s| s.name).collect();
        assert_eq!(names, [SENSOR_TASK, AVERAGE_TASK]);
        assert!(PIPELINE.halted().is_none());
    }
}
