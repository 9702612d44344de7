//! Run-time and stack probes for the RP2350.
//!
//! # Stack
//!
//! Every executor here runs on the main stack: the interrupt executors
//! preempt the thread executor on the same MSP. The stack grows down toward
//! the end of static RAM (`__sheap`, placed by cortex-m-rt right after
//! `.bss` and `.uninit`), so the headroom of whichever task is running is the
//! distance from the current MSP down to that symbol.
//!
//! # Run time
//!
//! Microseconds from the 64-bit embassy time driver, so neither per-task run
//! time nor the report total wraps in practice.

use cortex_m::register::msp;
use embassy_time::Instant;
use thermograph::profiling::TaskProbe;

unsafe extern "C" {
    /// Start of the heap region, i.e. the lowest address the stack may reach.
    static __sheap: u32;
}

/// Probe shared by every task.
pub struct BoardProbe;

impl BoardProbe {
    fn stack_floor() -> u32 {
        #[allow(unused_unsafe)]
        let floor = unsafe { core::ptr::addr_of!(__sheap) };
        floor as u32
    }
}

impl TaskProbe for BoardProbe {
    #[inline]
    fn run_time_ticks(&self) -> u64 { Instant::now().as_micros() }

    fn free_stack_words(&self) -> u32 {
        // Stack grows down: free = SP - floor
        msp::read().saturating_sub(Self::stack_floor()) / 4
    }
}
