//! Fixed-capacity moving window of the most recent samples.
//!
//! Used twice in the pipeline: the average filter keeps the last
//! `FILTER_CAPACITY` raw samples, and the display keeps one averaged value per
//! graph column.
//!
//! The window is pre-filled with zeros, so it always holds exactly `N`
//! entries. Averages taken before `N` pushes include those zeros; the graph
//! and the filter both rely on this ramp-up behaviour.

use heapless::Deque;

/// Shift buffer holding the most recent `N` values, newest at the tail.
pub struct MovingWindow<const N: usize> {
    values: Deque<i32, N>,
}

impl<const N: usize> MovingWindow<N> {
    const CAPACITY_OK: () = assert!(N > 0, "MovingWindow capacity must be non-zero");

    /// Create a window filled with zeros.
    pub fn new() -> Self {
        let () = Self::CAPACITY_OK;

        let mut values = Deque::new();
        for _ in 0..N {
            values.push_back(0).ok();
        }
        Self { values }
    }

    /// Push a value, evicting the oldest one.
    pub fn push(
        &mut self,
        value: i32,
    ) {
        if self.values.is_full() {
            self.values.pop_front();
        }
        // Cannot fail: a slot was freed above
        self.values.push_back(value).ok();
    }

    /// Integer mean of the most recent `window` values.
    ///
    /// `window` is clamped to `1..=N`. The sum is divided with truncation
    /// toward zero, matching integer division on the target.
    pub fn average(
        &self,
        window: usize,
    ) -> i32 {
        let count = window.clamp(1, N);
        let sum: i64 = self.values.iter().rev().take(count).map(|&v| i64::from(v)).sum();
        (sum / count as i64) as i32
    }

    /// Most recently pushed value.
    #[inline]
    pub fn latest(&self) -> i32 { self.values.back().copied().unwrap_or(0) }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = i32> + '_ { self.values.iter().copied() }

    /// Fixed capacity (always equal to the number of stored values).
    #[inline]
    pub const fn capacity(&self) -> usize { N }
}

impl<const N: usize> Default for MovingWindow<N> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================
