//! Fatal fault handling.
//!
//! The pipeline knows only two failure kinds and treats both as terminal:
//! there is no retry and no degraded mode. A task that faults moves to
//! [`TaskState::Halted`] and its run loop returns the [`Fault`]; the platform
//! wrapper then surfaces it (log, LED, display banner) and parks the task.
//!
//! [`FaultLatch`] remembers the first fault so the diagnostics task, which
//! keeps running, can report it over serial.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

/// Terminal fault kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// A queue, monitor slot or stats buffer could not be allocated.
    ResourceExhaustion,
    /// A task's free stack dropped below `STACK_FLOOR_WORDS`.
    StackMargin,
}

impl Fault {
    /// Short uppercase label for the display banner and serial report.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResourceExhaustion => "NO MEM",
            Self::StackMargin => "STACK",
        }
    }

    const fn code(self) -> u8 {
        match self {
            Self::ResourceExhaustion => 1,
            Self::StackMargin => 2,
        }
    }

    const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::ResourceExhaustion),
            2 => Some(Self::StackMargin),
            _ => None,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::ResourceExhaustion => f.write_str("resource exhaustion"),
            Self::StackMargin => f.write_str("stack margin violation"),
        }
    }
}

// =============================================================================
// Task State Machine
// =============================================================================

/// Lifecycle of a pipeline task: `Init -> Running -> Halted`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskState {
    /// Created, first stack check not yet passed.
    #[default]
    Init,
    /// Looping normally.
    Running,
    /// Stopped for good.
    Halted(Fault),
}

impl TaskState {
    #[inline]
    pub const fn is_halted(self) -> bool { matches!(self, Self::Halted(_)) }
}

// =============================================================================
// Fault Latch
// =============================================================================

/// Records the first fault raised anywhere in the pipeline.
pub struct FaultLatch {
    /// `Fault::code()`, 0 while clear.
    code: AtomicU8,
    /// Index of the faulting task in the task monitor.
    task: AtomicU8,
}

impl FaultLatch {
    pub const fn new() -> Self {
        Self {
            code: AtomicU8::new(0),
            task: AtomicU8::new(0),
        }
    }

    /// Latch `fault` for `task`. Later faults are ignored.
    pub fn raise(
        &self,
        task: usize,
        fault: Fault,
    ) {
        if self
            .code
            .compare_exchange(0, fault.code(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.task.store(task as u8, Ordering::Release);
        }
    }

    /// First latched fault and the index of the task that raised it.
    pub fn get(&self) -> Option<(usize, Fault)> {
        let fault = Fault::from_code(self.code.load(Ordering::Acquire))?;
        Some((usize::from(self.task.load(Ordering::Acquire)), fault))
    }
}

impl Default for FaultLatch {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================
