//! Host probes and the stdout statistics sink.
//!
//! Run time is wall-clock microseconds since simulator start. Stack headroom
//! is estimated from the address of a local relative to one captured when
//! the thread started, against the stack size the thread was spawned with.

use std::hint::black_box;
use std::io::{self, Write};
use std::ptr;
use std::time::Instant;

use thermograph::profiling::{SerialPort, TaskProbe};

/// Stack size every pipeline thread is spawned with.
pub const THREAD_STACK_BYTES: usize = 64 * 1024;

/// Probe for the thread that created it.
pub struct ThreadProbe {
    epoch: Instant,
    base: usize,
}

impl ThreadProbe {
    /// Create on the measured thread, as early as possible.
    pub fn new(epoch: Instant) -> Self {
        Self {
            epoch,
            base: stack_address(),
        }
    }
}

#[inline(never)]
fn stack_address() -> usize {
    let marker = 0u8;
    ptr::from_ref(black_box(&marker)) as usize
}

impl TaskProbe for ThreadProbe {
    fn run_time_ticks(&self) -> u64 { self.epoch.elapsed().as_micros() as u64 }

    fn free_stack_words(&self) -> u32 {
        let used = self.base.saturating_sub(stack_address());
        (THREAD_STACK_BYTES.saturating_sub(used) / 4) as u32
    }
}

/// Serial port stand-in writing to the terminal.
pub struct StdoutSerial {
    out: io::Stdout,
}

impl StdoutSerial {
    pub fn new() -> Self { Self { out: io::stdout() } }
}

impl SerialPort for StdoutSerial {
    fn write_byte(
        &mut self,
        byte: u8,
    ) {
        let mut out = self.out.lock();
        out.write_all(&[byte]).ok();
        if byte == b'\n' {
            out.flush().ok();
        }
    }
}
