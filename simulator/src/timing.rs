//! Timing for the simulator threads.
//!
//! These use `std::time` which is not available in `no_std` environments, so
//! they live here rather than in the core crate.

use std::thread;
use std::time::{Duration, Instant};

use thermograph::Periodic;
use thermograph::config::{DIAGNOSTICS_PERIOD_MS, SENSOR_PERIOD_MS};

/// Sensor sampling period.
pub const SENSOR_PERIOD: Duration = Duration::from_millis(SENSOR_PERIOD_MS);

/// Statistics report period.
pub const DIAGNOSTICS_PERIOD: Duration = Duration::from_millis(DIAGNOSTICS_PERIOD_MS);

/// Longest the window goes without processing events (~50 FPS).
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// How long the startup banner stays up.
pub const BANNER_TIME: Duration = Duration::from_secs(1);

/// Absolute-deadline sleeper: each deadline is exactly one period after the
/// previous one, however late the thread woke up.
pub struct Deadline {
    next: Instant,
    period: Duration,
}

impl Deadline {
    pub fn new(period: Duration) -> Self { Self::starting_at(Instant::now(), period) }

    /// First deadline one period after `start`.
    pub fn starting_at(
        start: Instant,
        period: Duration,
    ) -> Self {
        Self {
            next: start + period,
            period,
        }
    }

    /// Time left until the next deadline as of `now`, zero if it has passed.
    /// Advances the deadline by one period.
    fn advance(
        &mut self,
        now: Instant,
    ) -> Duration {
        let remaining = self.next.saturating_duration_since(now);
        self.next += self.period;
        remaining
    }

    /// Sleep until the next deadline, then advance it by one period.
    pub fn wait(&mut self) {
        let remaining = self.advance(Instant::now());
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
    }
}

/// Blocks the calling thread; each stage runs on its own.
impl Periodic for Deadline {
    async fn next(&mut self) { self.wait(); }
}

// =============================================================================
// Tests
// =============================================================================
