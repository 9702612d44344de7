//! Pipeline configuration.
//!
//! - `layout`: Display geometry and graph placement
//!
//! All tunables are compile-time constants with `const` assertions that fail
//! the build if they are configured inconsistently. The few values a board
//! or test may want to override at startup live in [`PipelineConfig`].

pub mod layout;

pub use layout::{
    AXIS_OFFSET,
    DISPLAY_HEIGHT,
    DISPLAY_PAGES,
    DISPLAY_WIDTH,
    GRAPH_COLUMNS,
    PAGE_HEIGHT,
};

// =============================================================================
// Sensor Range
// =============================================================================

/// Lowest temperature the simulated sensor can report.
pub const MIN_TEMP: i32 = 0;

/// Highest temperature the simulated sensor can report.
/// The column encoder covers exactly `MIN_TEMP..=MAX_TEMP`.
pub const MAX_TEMP: i32 = 30;

/// Temperature the random walk starts from.
pub const INITIAL_TEMP: i32 = 15;

/// Default LCG seed. Fixed so every boot replays the same walk.
pub const DEFAULT_SEED: u32 = 0xDEAD_BEEF;

const _: () = assert!(MIN_TEMP < MAX_TEMP);
const _: () = assert!(INITIAL_TEMP >= MIN_TEMP && INITIAL_TEMP <= MAX_TEMP);

// =============================================================================
// Queues and Buffers
// =============================================================================

/// Capacity of both hand-off queues (sensor -> average -> display).
pub const QUEUE_SIZE: usize = 4;

/// Number of raw samples the average filter keeps.
pub const FILTER_CAPACITY: usize = 20;

/// Default averaging window (most recent samples). Clamped to `FILTER_CAPACITY`.
pub const AVERAGE_WINDOW: usize = 5;

const _: () = assert!(QUEUE_SIZE > 0);
const _: () = assert!(AVERAGE_WINDOW <= FILTER_CAPACITY);

// =============================================================================
// Task Timing and Priorities
// =============================================================================

/// Sensor sampling period in milliseconds (10 Hz).
pub const SENSOR_PERIOD_MS: u64 = 100;

/// Diagnostics report period in milliseconds.
pub const DIAGNOSTICS_PERIOD_MS: u64 = 1000;

/// Task priorities, highest first. Fixed at creation.
pub const SENSOR_PRIORITY: u8 = 4;
pub const AVERAGE_PRIORITY: u8 = 3;
pub const DISPLAY_PRIORITY: u8 = 2;
pub const DIAGNOSTICS_PRIORITY: u8 = 1;

const _: () = assert!(SENSOR_PRIORITY > AVERAGE_PRIORITY);
const _: () = assert!(AVERAGE_PRIORITY > DISPLAY_PRIORITY);
const _: () = assert!(DISPLAY_PRIORITY > DIAGNOSTICS_PRIORITY);
const _: () = assert!(DIAGNOSTICS_PERIOD_MS > SENSOR_PERIOD_MS);

/// Preemption rank of the interrupt executor for a task `priority`, `0`
/// being the most urgent. `None` for the lowest priority, which runs in
/// thread mode.
pub const fn preemption_rank(priority: u8) -> Option<u8> {
    if priority <= DIAGNOSTICS_PRIORITY {
        None
    } else {
        Some(SENSOR_PRIORITY.saturating_sub(priority))
    }
}

// =============================================================================
// Task Monitoring
// =============================================================================

/// Maximum number of tasks the monitor can track.
pub const MAX_TASKS: usize = 6;

/// Minimum free stack (in 32-bit words) a task may run with.
/// Dropping below this halts the task.
pub const STACK_FLOOR_WORDS: u32 = 32;

/// Maximum task name length shown in the statistics table.
pub const TASK_NAME_LEN: usize = 10;

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Startup knobs for one pipeline instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// LCG seed for the random walk.
    pub seed: u32,
    /// First temperature of the walk, clamped to `MIN_TEMP..=MAX_TEMP`.
    pub initial_temperature: i32,
    /// Number of most recent samples averaged by the filter.
    pub average_window: usize,
}

impl PipelineConfig {
    pub const fn new() -> Self {
        Self {
            seed: DEFAULT_SEED,
            initial_temperature: INITIAL_TEMP,
            average_window: AVERAGE_WINDOW,
        }
    }

    /// Override the LCG seed.
    #[must_use]
    pub const fn with_seed(
        mut self,
        seed: u32,
    ) -> Self {
        self.seed = seed;
        self
    }

    /// Override the averaging window.
    #[must_use]
    pub const fn with_average_window(
        mut self,
        window: usize,
    ) -> Self {
        self.average_window = window;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================
