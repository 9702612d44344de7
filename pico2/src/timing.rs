//! Absolute-deadline timer backed by `embassy_time::Ticker`.

use core::future::Future;

use embassy_time::{Duration, Ticker};
use thermograph::Periodic;

/// Fires every period; missed deadlines are caught up, not skipped.
pub struct PeriodTicker(Ticker);

impl PeriodTicker {
    pub fn every_ms(period_ms: u64) -> Self { Self(Ticker::every(Duration::from_millis(period_ms))) }
}

impl Periodic for PeriodTicker {
    fn next(&mut self) -> impl Future<Output = ()> { self.0.next() }
}
