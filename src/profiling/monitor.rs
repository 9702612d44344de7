//! Per-task run-time and stack accounting.
//!
//! The executor does not track per-task statistics itself, so each pipeline
//! task reports to a shared [`TaskMonitor`]: run-time ticks spent between
//! suspension points and the lowest free-stack reading seen so far. The
//! diagnostics task snapshots the monitor to build its report.
//!
//! Readings come from a platform [`TaskProbe`]: a free-running tick counter
//! and the current stack headroom. [`TaskContext`] ties a probe to one monitor
//! slot and owns the task's `Init -> Running -> Halted` state.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::Vec;

use crate::config::{MAX_TASKS, STACK_FLOOR_WORDS};
use crate::fault::{Fault, TaskState};

/// Platform readings the monitor depends on.
pub trait TaskProbe {
    /// Free-running 64-bit run-time counter, never expected to wrap.
    fn run_time_ticks(&self) -> u64;

    /// Stack headroom of the calling task, in 32-bit words.
    fn free_stack_words(&self) -> u32;
}

/// Index of a registered task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskId(pub usize);

/// Snapshot record for one task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskStat {
    pub name: &'static str,
    /// Cumulative run-time ticks.
    pub run_time: u64,
    /// Lowest free-stack reading, in words (`u32::MAX` until first reading).
    pub min_free_stack: u32,
}

/// Shared per-task statistics table.
pub struct TaskMonitor<M: RawMutex> {
    tasks: Mutex<M, RefCell<Vec<TaskStat, MAX_TASKS>>>,
}

impl<M: RawMutex> TaskMonitor<M> {
    pub const fn new() -> Self {
        Self {
            tasks: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// Claim a slot for `name`.
    ///
    /// Fails with [`Fault::ResourceExhaustion`] once `MAX_TASKS` are registered.
    pub fn register(
        &self,
        name: &'static str,
    ) -> Result<TaskId, Fault> {
        self.tasks.lock(|tasks| {
            let mut tasks = tasks.borrow_mut();
            let id = tasks.len();
            tasks
                .push(TaskStat {
                    name,
                    run_time: 0,
                    min_free_stack: u32::MAX,
                })
                .map_err(|_| Fault::ResourceExhaustion)?;
            Ok(TaskId(id))
        })
    }

    /// Add `ticks` to a task's cumulative run time.
    pub fn add_run_time(
        &self,
        id: TaskId,
        ticks: u64,
    ) {
        self.with_task(id, |stat| stat.run_time = stat.run_time.saturating_add(ticks));
    }

    /// Record a free-stack reading, keeping the minimum.
    pub fn observe_stack(
        &self,
        id: TaskId,
        free_words: u32,
    ) {
        self.with_task(id, |stat| stat.min_free_stack = stat.min_free_stack.min(free_words));
    }

    /// Name a task registered under `id`, if any.
    pub fn name(
        &self,
        id: TaskId,
    ) -> Option<&'static str> {
        self.tasks.lock(|tasks| tasks.borrow().get(id.0).map(|stat| stat.name))
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize { self.tasks.lock(|tasks| tasks.borrow().len()) }

    /// Whether no task has registered yet.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Copy of every task's statistics, in registration order.
    pub fn snapshot(&self) -> Vec<TaskStat, MAX_TASKS> { self.tasks.lock(|tasks| tasks.borrow().clone()) }

    fn with_task(
        &self,
        id: TaskId,
        f: impl FnOnce(&mut TaskStat),
    ) {
        self.tasks.lock(|tasks| {
            if let Some(stat) = tasks.borrow_mut().get_mut(id.0) {
                f(stat);
            }
        });
    }
}

impl<M: RawMutex> Default for TaskMonitor<M> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Task Context
// =============================================================================

/// One task's view of the monitor: its slot, its probe and its state.
pub struct TaskContext<'a, M: RawMutex, P: TaskProbe> {
    monitor: &'a TaskMonitor<M>,
    probe: &'a P,
    id: TaskId,
    state: TaskState,
}

impl<'a, M: RawMutex, P: TaskProbe> TaskContext<'a, M, P> {
    /// Register `name` with the monitor.
    pub fn register(
        monitor: &'a TaskMonitor<M>,
        probe: &'a P,
        name: &'static str,
    ) -> Result<Self, Fault> {
        match monitor.register(name) {
            Ok(id) => Ok(Self {
                monitor,
                probe,
                id,
                state: TaskState::Init,
            }),
            Err(fault) => {
                log_error!("cannot register task {}: monitor full", name);
                Err(fault)
            }
        }
    }

    #[inline]
    pub const fn id(&self) -> TaskId { self.id }

    #[inline]
    pub const fn state(&self) -> TaskState { self.state }

    /// Start of an active section; pass the result to [`Self::end_work`].
    #[inline]
    pub fn begin_work(&self) -> u64 { self.probe.run_time_ticks() }

    /// Charge the ticks since `started` to this task.
    pub fn end_work(
        &self,
        started: u64,
    ) {
        let elapsed = self.probe.run_time_ticks().saturating_sub(started);
        self.monitor.add_run_time(self.id, elapsed);
    }

    /// Read the stack headroom and halt if it is below `STACK_FLOOR_WORDS`.
    ///
    /// The first passing check moves the task from `Init` to `Running`. Once
    /// halted, the task stays halted.
    pub fn check_stack(&mut self) -> Result<(), Fault> {
        if let TaskState::Halted(fault) = self.state {
            return Err(fault);
        }

        let free = self.probe.free_stack_words();
        self.monitor.observe_stack(self.id, free);

        if free < STACK_FLOOR_WORDS {
            return Err(self.halt(Fault::StackMargin));
        }

        self.state = TaskState::Running;
        Ok(())
    }

    /// Enter the terminal state.
    pub fn halt(
        &mut self,
        fault: Fault,
    ) -> Fault {
        self.state = TaskState::Halted(fault);
        fault
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use core::cell::Cell;

    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    use super::*;

    /// Probe with a manual clock and a scripted stack reading.
    pub(crate) struct FakeProbe {
        pub ticks: Cell<u64>,
        pub tick_step: u64,
        pub free_stack: Cell<u32>,
        /// Number of healthy stack readings left; afterwards reads 0.
        pub healthy_checks: Cell<Option<u32>>,
    }

    impl FakeProbe {
        pub fn new() -> Self {
            Self {
                ticks: Cell::new(0),
                tick_step: 1,
                free_stack: Cell::new(256),
                healthy_checks: Cell::new(None),
            }
        }

        /// Report a healthy stack for `checks` readings, then zero.
        pub fn failing_after(checks: u32) -> Self {
            let probe = Self::new();
            probe.healthy_checks.set(Some(checks));
            probe
        }
    }

    impl TaskProbe for FakeProbe {
        fn run_time_ticks(&self) -> u64 {
            let now = self.ticks.get();
            self.ticks.set(now.wrapping_add(self.tick_step));
            now
        }

        fn free_stack_words(&self) -> u32 {
            match self.healthy_checks.get() {
                Some(0) => 0,
                Some(n) => {
                    self.healthy_checks.set(Some(n - 1));
                    self.free_stack.get()
                }
                None => self.free_stack.get(),
            }
        }
    }

    #[test]
    fn test_register_until_full() {
        let monitor: TaskMonitor<NoopRawMutex> = TaskMonitor::new();
        for i in 0..MAX_TASKS {
            assert_eq!(monitor.register("task"), Ok(TaskId(i)));
        }
        assert_eq!(monitor.register("extra"), Err(Fault::ResourceExhaustion));
        assert_eq!(monitor.len(), MAX_TASKS);
    }

    #[test]
    fn test_run_time_and_stack_accounting() {
        let monitor: TaskMonitor<NoopRawMutex> = TaskMonitor::new();
        let a = monitor.register("Sensor").unwrap();
        let b = monitor.register("Average").unwrap();

        monitor.add_run_time(a, 10);
        monitor.add_run_time(a, 5);
        monitor.add_run_time(b, 7);
        monitor.observe_stack(a, 120);
        monitor.observe_stack(a, 80);
        monitor.observe_stack(a, 100);

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].name, "Sensor");
        assert_eq!(snapshot[0].run_time, 15);
        assert_eq!(snapshot[0].min_free_stack, 80);
        assert_eq!(snapshot[1].run_time, 7);
        assert_eq!(snapshot[1].min_free_stack, u32::MAX);
        assert_eq!(monitor.name(b), Some("Average"));
        assert_eq!(monitor.name(TaskId(5)), None);
    }

    #[test]
    fn test_run_time_past_32_bits() {
        let monitor: TaskMonitor<NoopRawMutex> = TaskMonitor::new();
        let id = monitor.register("Sensor").unwrap();

        // Over 71 minutes of microseconds
        monitor.add_run_time(id, u64::from(u32::MAX));
        monitor.add_run_time(id, 10);
        assert_eq!(monitor.snapshot()[0].run_time, u64::from(u32::MAX) + 10);
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let monitor: TaskMonitor<NoopRawMutex> = TaskMonitor::new();
        monitor.add_run_time(TaskId(3), 10);
        assert!(monitor.is_empty());
    }

    #[test]
    fn test_context_charges_work() {
        let monitor: TaskMonitor<NoopRawMutex> = TaskMonitor::new();
        let mut probe = FakeProbe::new();
        probe.tick_step = 4;
        let ctx = TaskContext::register(&monitor, &probe, "Display").unwrap();

        let started = ctx.begin_work();
        ctx.end_work(started);
        assert_eq!(monitor.snapshot()[0].run_time, 4);
    }

    #[test]
    fn test_context_state_machine() {
        let monitor: TaskMonitor<NoopRawMutex> = TaskMonitor::new();
        let probe = FakeProbe::failing_after(2);
        let mut ctx = TaskContext::register(&monitor, &probe, "Sensor").unwrap();
        assert_eq!(ctx.state(), TaskState::Init);

        assert_eq!(ctx.check_stack(), Ok(()));
        assert_eq!(ctx.state(), TaskState::Running);
        assert_eq!(ctx.check_stack(), Ok(()));

        assert_eq!(ctx.check_stack(), Err(Fault::StackMargin));
        assert_eq!(ctx.state(), TaskState::Halted(Fault::StackMargin));
        assert_eq!(monitor.snapshot()[0].min_free_stack, 0);

        // Terminal: stays halted even if the stack recovers
        probe.healthy_checks.set(None);
        assert_eq!(ctx.check_stack(), Err(Fault::StackMargin));
    }

    #[test]
    fn test_stack_floor_boundary() {
        let monitor: TaskMonitor<NoopRawMutex> = TaskMonitor::new();
        let probe = FakeProbe::new();
        let mut ctx = TaskContext::register(&monitor, &probe, "Average").unwrap();

        probe.free_stack.set(STACK_FLOOR_WORDS);
        assert_eq!(ctx.check_stack(), Ok(()));

        probe.free_stack.set(STACK_FLOOR_WORDS - 1);
        assert_eq!(ctx.check_stack(), Err(Fault::StackMargin));
    }

    #[test]
    fn test_context_register_fails_when_full() {
        let monitor: TaskMonitor<NoopRawMutex> = TaskMonitor::new();
        let probe = FakeProbe::new();
        for _ in 0..MAX_TASKS {
            monitor.register("filler").unwrap();
        }
        assert!(matches!(
            TaskContext::register(&monitor, &probe, "late"),
            Err(Fault::ResourceExhaustion)
        ));
    }
}
