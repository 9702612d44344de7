//! Thermograph Firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Graphs a simulated temperature on the Pimoroni PIM715 Display Pack 2.8"
//! and prints per-task statistics on UART0.
//!
//! # Architecture
//!
//! Four tasks, fixed priorities from `thermograph::config`, highest first:
//! - Sensor: `SWI_IRQ_0` interrupt executor, P1
//! - Average: `SWI_IRQ_1` interrupt executor, P2
//! - Display: `SWI_IRQ_2` interrupt executor, P3
//! - Diagnostics: thread-mode executor (main)
//!
//! Stages hand samples over bounded queues owned by the static [`PIPELINE`].
//! A halted task lights the red LED and parks; diagnostics keeps reporting.

#![no_std]
#![no_main]
// Crate-level lints (match the library for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod display;
mod probe;
mod serial;
mod timing;

use defmt::{error, info};
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::spi::Spi;
use embassy_rp::uart::{Config as UartConfig, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use heapless::String;
use thermograph::config::{
    AVERAGE_PRIORITY,
    DIAGNOSTICS_PERIOD_MS,
    DISPLAY_PRIORITY,
    SENSOR_PERIOD_MS,
    SENSOR_PRIORITY,
    preemption_rank,
};
use thermograph::profiling::push_radix;
use thermograph::render::draw_banner;
use thermograph::tasks::{
    AverageStage,
    DisplayStage,
    SensorStage,
    run_average,
    run_diagnostics,
    run_display,
    run_sensor,
};
use thermograph::{BitmapSurface, Fault, Pipeline, PipelineConfig};
use {defmt_rtt as _, panic_probe as _};

use crate::display::{PanelSurface, display_spi_config, init_display};
use crate::probe::BoardProbe;
use crate::serial::UartSerial;
use crate::timing::PeriodTicker;

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"pico2-thermograph"),
    embassy_rp::binary_info::rp_program_description!(c"Sensor to moving-average bar graph on PIM715 Display"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

// =============================================================================
// Shared State
// =============================================================================

/// Queues, task monitor and fault latch shared by every task.
static PIPELINE: Pipeline<CriticalSectionRawMutex> = Pipeline::new();

static PROBE: BoardProbe = BoardProbe;

/// First fault, for the status LED task.
static HALTED: Signal<CriticalSectionRawMutex, Fault> = Signal::new();

static EXECUTOR_SENSOR: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_AVERAGE: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_DISPLAY: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_0() {
    unsafe { EXECUTOR_SENSOR.on_interrupt() }
}

#[interrupt]
unsafe fn SWI_IRQ_1() {
    unsafe { EXECUTOR_AVERAGE.on_interrupt() }
}

#[interrupt]
unsafe fn SWI_IRQ_2() {
    unsafe { EXECUTOR_DISPLAY.on_interrupt() }
}

/// NVIC priority of the interrupt executor running a task of `priority`.
fn executor_priority(priority: u8) -> Priority {
    match preemption_rank(priority) {
        Some(0) => Priority::P1,
        Some(1) => Priority::P2,
        _ => Priority::P3,
    }
}

/// Park a halted task forever. The library has already logged and latched
/// the fault.
async fn park(fault: Fault) {
    HALTED.signal(fault);
    core::future::pending::<()>().await;
}

// =============================================================================
// Tasks
// =============================================================================

#[embassy_executor::task]
async fn sensor_task(mut stage: SensorStage) {
    let mut ticker = PeriodTicker::every_ms(SENSOR_PERIOD_MS);
    let fault = run_sensor(&PIPELINE, &PROBE, &mut ticker, &mut stage).await;
    park(fault).await;
}

#[embassy_executor::task]
async fn average_task(mut stage: AverageStage) {
    let fault = run_average(&PIPELINE, &PROBE, &mut stage).await;
    park(fault).await;
}

#[embassy_executor::task]
async fn display_task(mut surface: PanelSurface<'static>) {
    let mut stage = DisplayStage::new();
    let fault = run_display(&PIPELINE, &PROBE, &mut stage, &mut surface).await;
    park(fault).await;
}

/// Red LED on (active-low) once any task halts.
#[embassy_executor::task]
async fn status_led_task(mut led: Output<'static>) {
    let fault = HALTED.wait().await;
    error!("Pipeline halted: {}", fault);
    led.set_low();

    // Keep the pin driven
    core::future::pending::<()>().await;
}

// =============================================================================
// Entry Point
// =============================================================================

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Thermograph starting...");

    let p = embassy_rp::init(Default::default());
    let config = PipelineConfig::default();

    // Initialize RGB LED (active-low: Low = ON)
    // PIM715: Red=26, Green=27, Blue=28
    let led_r = Output::new(p.PIN_26, Level::High); // Off
    let mut led_g = Output::new(p.PIN_27, Level::High); // Off

    // Initialize display pins
    // PIM715 pinout: CS=17, DC=16, CLK=18, MOSI=19, Backlight=20
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let _backlight = Output::new(p.PIN_20, Level::High);

    // Initialize SPI (TX-only, display doesn't need MISO)
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, display_spi_config());
    let mut surface = PanelSurface::new(init_display(spi, cs, dc));
    info!("Display initialized!");

    // Startup banner with the walk seed
    let mut subtitle: String<16> = String::new();
    subtitle.push_str("seed ").ok();
    push_radix(&mut subtitle, config.seed.into(), 16);
    draw_banner(&mut surface, "THERMOGRAPH", &subtitle);
    surface.flush();

    // Flash green to indicate display init success
    led_g.set_low();
    Timer::after_millis(1000).await;
    led_g.set_high();

    let uart = UartTx::new_blocking(p.UART0, p.PIN_0, UartConfig::default());
    let mut serial = UartSerial::new(uart);

    spawner.spawn(status_led_task(led_r)).unwrap();

    // Highest priority first so the sensor registers first in the monitor
    interrupt::SWI_IRQ_0.set_priority(executor_priority(SENSOR_PRIORITY));
    let sensor_spawner = EXECUTOR_SENSOR.start(interrupt::SWI_IRQ_0);
    sensor_spawner.spawn(sensor_task(SensorStage::new(&config))).unwrap();

    interrupt::SWI_IRQ_1.set_priority(executor_priority(AVERAGE_PRIORITY));
    let average_spawner = EXECUTOR_AVERAGE.start(interrupt::SWI_IRQ_1);
    average_spawner.spawn(average_task(AverageStage::new(&config))).unwrap();

    interrupt::SWI_IRQ_2.set_priority(executor_priority(DISPLAY_PRIORITY));
    let display_spawner = EXECUTOR_DISPLAY.start(interrupt::SWI_IRQ_2);
    display_spawner.spawn(display_task(surface)).unwrap();

    info!("Pipeline tasks spawned");

    // Diagnostics runs here, on the thread-mode executor
    let mut ticker = PeriodTicker::every_ms(DIAGNOSTICS_PERIOD_MS);
    let fault = run_diagnostics(&PIPELINE, &PROBE, &mut ticker, &mut serial).await;
    park(fault).await;
}
