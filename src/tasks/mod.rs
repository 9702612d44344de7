//! Pipeline stages and their async run loops.
//!
//! - `sensor`: Random-walk sampler, periodic producer
//! - `average`: Moving-average filter between the two queues
//! - `display`: Graph history and full-frame redraw
//! - `diagnostics`: Periodic statistics report over serial
//!
//! Each stage is a plain struct with a synchronous step function, plus a
//! `run_*` loop generic over the mutex kind, the probe and the timer. The
//! firmware wraps the loops in `#[embassy_executor::task]` functions with
//! concrete types; host tests drive them with `embassy_futures::block_on`.
//!
//! Run loops only return when their task halts, with the fault that halted it.

pub mod average;
pub mod diagnostics;
pub mod display;
pub mod sensor;

use core::future::Future;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;

pub use average::{AverageStage, run_average};
pub use diagnostics::run_diagnostics;
pub use display::{DisplayStage, run_display};
pub use sensor::{SensorStage, run_sensor};

use crate::config::QUEUE_SIZE;
use crate::fault::{Fault, FaultLatch};
use crate::profiling::monitor::{TaskContext, TaskId, TaskMonitor, TaskProbe};

/// A temperature reading or averaged value, in whole degrees.
pub type Sample = i32;

/// Bounded single-producer single-consumer hand-off between two stages.
pub type SampleQueue<M> = Channel<M, Sample, QUEUE_SIZE>;

/// Task names as they appear in the statistics report.
pub const SENSOR_TASK: &str = "Sensor";
pub const AVERAGE_TASK: &str = "Average";
pub const DISPLAY_TASK: &str = "Display";
pub const DIAGNOSTICS_TASK: &str = "Stats";

/// Absolute-deadline timer.
///
/// Each call waits until the next deadline, which advances by exactly one
/// period, so loop jitter does not accumulate.
pub trait Periodic {
    fn next(&mut self) -> impl Future<Output = ()>;
}

// =============================================================================
// Pipeline Context
// =============================================================================

/// Shared state of one pipeline: both queues, the task monitor and the
/// fault latch. Created once and borrowed by every run loop.
pub struct Pipeline<M: RawMutex> {
    sensor_queue: SampleQueue<M>,
    average_queue: SampleQueue<M>,
    monitor: TaskMonitor<M>,
    faults: FaultLatch,
}

impl<M: RawMutex> Pipeline<M> {
    pub const fn new() -> Self {
        Self {
            sensor_queue: Channel::new(),
            average_queue: Channel::new(),
            monitor: TaskMonitor::new(),
            faults: FaultLatch::new(),
        }
    }

    /// Raw samples, sensor -> average filter.
    #[inline]
    pub fn sensor_queue(&self) -> &SampleQueue<M> { &self.sensor_queue }

    /// Averaged values, average filter -> display.
    #[inline]
    pub fn average_queue(&self) -> &SampleQueue<M> { &self.average_queue }

    #[inline]
    pub fn monitor(&self) -> &TaskMonitor<M> { &self.monitor }

    #[inline]
    pub fn faults(&self) -> &FaultLatch { &self.faults }

    /// Name and fault of the first task that halted, if any.
    pub fn halted(&self) -> Option<(&'static str, Fault)> {
        let (task, fault) = self.faults.get()?;
        Some((self.monitor.name(TaskId(task)).unwrap_or("?"), fault))
    }

    /// Register a task and pass its initial stack check.
    fn start<'a, P: TaskProbe>(
        &'a self,
        probe: &'a P,
        name: &'static str,
    ) -> Result<TaskContext<'a, M, P>, Fault> {
        let mut ctx = TaskContext::register(&self.monitor, probe, name)?;
        self.check_stack(&mut ctx)?;
        log_info!("{} task running", name);
        Ok(ctx)
    }

    /// Stack check that latches and logs the fault on failure.
    fn check_stack<P: TaskProbe>(
        &self,
        ctx: &mut TaskContext<'_, M, P>,
    ) -> Result<(), Fault> {
        ctx.check_stack().inspect_err(|&fault| {
            self.faults.raise(ctx.id().0, fault);
            log_error!(
                "{} task halted: {}",
                self.monitor.name(ctx.id()).unwrap_or("?"),
                fault.as_str()
            );
        })
    }
}

impl<M: RawMutex> Default for Pipeline<M> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================
