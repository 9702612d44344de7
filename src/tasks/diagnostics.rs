//! Periodic statistics report.

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::{DIAGNOSTICS_TASK, Periodic, Pipeline};
use crate::fault::Fault;
use crate::profiling::monitor::TaskProbe;
use crate::profiling::report::{SerialPort, write_report};

/// Every period, snapshot the task monitor and send the table over `serial`.
///
/// `probe.run_time_ticks()` doubles as the total run-time counter the CPU
/// shares are computed against. Keeps reporting after another task halts, so
/// the halt line reaches the serial console.
pub async fn run_diagnostics<M, P, T, S>(
    pipeline: &Pipeline<M>,
    probe: &P,
    ticker: &mut T,
    serial: &mut S,
) -> Fault
where
    M: RawMutex,
    P: TaskProbe,
    T: Periodic,
    S: SerialPort,
{
    let mut ctx = match pipeline.start(probe, DIAGNOSTICS_TASK) {
        Ok(ctx) => ctx,
        Err(fault) => return fault,
    };

    loop {
        ticker.next().await;

        let started = ctx.begin_work();
        let stats = pipeline.monitor().snapshot();
        let total = probe.run_time_ticks();
        write_report(serial, &stats, total, pipeline.halted());
        ctx.end_work(started);

        if let Err(fault) = pipeline.check_stack(&mut ctx) {
            return fault;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    use super::*;
    use crate::profiling::monitor::tests::FakeProbe;
    use crate::profiling::report::tests::CaptureSerial;
    use crate::tasks::tests::Immediate;
    use crate::tasks::{AVERAGE_TASK, DISPLAY_TASK, SENSOR_TASK};

    /// Probe frozen at `ticks`, healthy for `checks` stack reads.
    fn frozen_probe(
        ticks: u64,
        checks: u32,
    ) -> FakeProbe {
        FakeProbe {
            ticks: Cell::new(ticks),
            tick_step: 0,
            ..FakeProbe::failing_after(checks)
        }
    }

    fn seed_stats(pipeline: &Pipeline<NoopRawMutex>) {
        let monitor = pipeline.monitor();
        for (name, run_time, stack) in [(SENSOR_TASK, 500, 210), (AVERAGE_TASK, 300, 190), (DISPLAY_TASK, 200, 170)] {
            let id = monitor.register(name).unwrap();
            monitor.add_run_time(id, run_time);
            monitor.observe_stack(id, stack);
        }
    }

    #[test]
    fn test_cpu_shares_reported() {
        let pipeline: Pipeline<NoopRawMutex> = Pipeline::new();
        seed_stats(&pipeline);
        let probe = frozen_probe(1000, 1);
        let mut serial = CaptureSerial::default();

        let fault = block_on(run_diagnostics(&pipeline, &probe, &mut Immediate, &mut serial));
        assert_eq!(fault, Fault::StackMargin);

        let text = serial.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("Sensor      50%"));
        assert!(lines[2].starts_with("Average     30%"));
        assert!(lines[3].starts_with("Display     20%"));
        // Frozen clock: the report itself costs no ticks
        assert!(lines[4].starts_with("Stats       <1%"));
    }

    #[test]
    fn test_small_share_shows_below_one() {
        let pipeline: Pipeline<NoopRawMutex> = Pipeline::new();
        let id = pipeline.monitor().register(SENSOR_TASK).unwrap();
        pipeline.monitor().add_run_time(id, 5);
        let probe = frozen_probe(1000, 1);
        let mut serial = CaptureSerial::default();

        block_on(run_diagnostics(&pipeline, &probe, &mut Immediate, &mut serial));
        assert!(serial.text().contains("Sensor      <1%"));
    }

    #[test]
    fn test_no_table_before_first_percent() {
        let pipeline: Pipeline<NoopRawMutex> = Pipeline::new();
        seed_stats(&pipeline);
        let probe = frozen_probe(99, 1);
        let mut serial = CaptureSerial::default();

        block_on(run_diagnostics(&pipeline, &probe, &mut Immediate, &mut serial));
        assert!(serial.bytes.is_empty());
    }

    #[test]
    fn test_reports_every_period_and_halt_line() {
        let pipeline: Pipeline<NoopRawMutex> = Pipeline::new();
        seed_stats(&pipeline);
        pipeline.faults().raise(2, Fault::StackMargin);
        let probe = frozen_probe(1000, 3);
        let mut serial = CaptureSerial::default();

        block_on(run_diagnostics(&pipeline, &probe, &mut Immediate, &mut serial));

        let text = serial.text();
        assert_eq!(text.matches("Task ").count(), 3);
        assert_eq!(text.matches("HALT Display STACK\r\n").count(), 3);
    }
}
