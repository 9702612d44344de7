//! Serial statistics report.
//!
//! One line per task with fixed-width columns:
//!
//! ```text
//! Task       CPU%  Stack      Ticks
//! Sensor      50%    212        500
//! Display     <1%    180          5
//! ```
//!
//! Numbers are never truncated: a CPU share above 999% shows as `>999`, and
//! a stack or tick count wider than its column widens the line instead.
//!
//! Lines are built in a stack buffer and pushed to the port one byte at a
//! time. No terminator byte follows a field.

use heapless::String;

use crate::config::TASK_NAME_LEN;
use crate::fault::Fault;
use crate::profiling::format::{Align, push_padded, push_radix, push_right};
use crate::profiling::monitor::TaskStat;

/// Blocking byte sink (UART on the target, stdout on the host).
pub trait SerialPort {
    fn write_byte(
        &mut self,
        byte: u8,
    );
}

const CPU_WIDTH: usize = 4;
const STACK_WIDTH: usize = 7;
const TICKS_WIDTH: usize = 11;

/// Digits in `u32::MAX` and `u64::MAX`.
const U32_DIGITS: usize = 10;
const U64_DIGITS: usize = 20;

/// Report line length, `\r\n` included, while every number fits its column.
pub const LINE_LEN: usize = TASK_NAME_LEN + CPU_WIDTH + 1 + STACK_WIDTH + TICKS_WIDTH + 2;

/// Longest possible line: widest stack and tick counts, each with a leading space.
const LINE_CAPACITY: usize = TASK_NAME_LEN + CPU_WIDTH + 1 + (U32_DIGITS + 1) + (U64_DIGITS + 1) + 2;

const _: () = assert!(LINE_CAPACITY >= LINE_LEN);

/// Shown in the CPU column when a task used less than one percent.
pub const BELOW_ONE_PERCENT: &str = "<1";

/// Largest share that fits the CPU column.
const MAX_CPU_PERCENT: u64 = 999;

/// Shown in the CPU column for shares above `MAX_CPU_PERCENT`.
pub const CPU_OVERFLOW: &str = ">999";

const _: () = assert!(CPU_OVERFLOW.len() == CPU_WIDTH);

type Line = String<LINE_CAPACITY>;

/// Write `text` to `serial` byte by byte.
pub fn send_str<S: SerialPort>(
    serial: &mut S,
    text: &str,
) {
    for byte in text.bytes() {
        serial.write_byte(byte);
    }
}

/// Whole-percent CPU share of `run_time` out of `total` ticks.
///
/// `None` while `total` is below 100 ticks: there is no percent unit yet.
pub fn cpu_percent(
    run_time: u64,
    total: u64,
) -> Option<u64> {
    let unit = total / 100;
    (unit > 0).then(|| run_time / unit)
}

fn push_number(
    line: &mut Line,
    val: u64,
    width: usize,
) {
    let mut digits: String<U64_DIGITS> = String::new();
    push_radix(&mut digits, val, 10);
    push_right(line, &digits, width);
}

fn header() -> Line {
    let mut line = Line::new();
    push_padded(&mut line, "Task", TASK_NAME_LEN, Align::Left);
    push_padded(&mut line, "CPU", CPU_WIDTH, Align::Right);
    line.push('%').ok();
    push_padded(&mut line, "Stack", STACK_WIDTH, Align::Right);
    push_padded(&mut line, "Ticks", TICKS_WIDTH, Align::Right);
    line.push_str("\r\n").ok();
    line
}

/// Format one task line.
pub fn format_task_line(
    stat: &TaskStat,
    total: u64,
) -> Line {
    let mut line = Line::new();
    push_padded(&mut line, stat.name, TASK_NAME_LEN, Align::Left);

    match cpu_percent(stat.run_time, total) {
        Some(0) | None => push_padded(&mut line, BELOW_ONE_PERCENT, CPU_WIDTH, Align::Right),
        Some(pct) if pct > MAX_CPU_PERCENT => {
            line.push_str(CPU_OVERFLOW).ok();
        }
        Some(pct) => push_number(&mut line, pct, CPU_WIDTH),
    }
    line.push('%').ok();

    if stat.min_free_stack == u32::MAX {
        // Never sampled
        push_padded(&mut line, "-", STACK_WIDTH, Align::Right);
    } else {
        push_number(&mut line, stat.min_free_stack.into(), STACK_WIDTH);
    }
    push_number(&mut line, stat.run_time, TICKS_WIDTH);

    line.push_str("\r\n").ok();
    line
}

/// Emit the statistics table, then the halt line if a task has faulted.
///
/// The table is skipped while `total / 100` is zero. Returns whether the
/// table was written.
pub fn write_report<S: SerialPort>(
    serial: &mut S,
    stats: &[TaskStat],
    total: u64,
    halted: Option<(&str, Fault)>,
) -> bool {
    let table = cpu_percent(0, total).is_some();
    if table {
        send_str(serial, &header());
        for stat in stats {
            send_str(serial, &format_task_line(stat, total));
        }
    }

    if let Some((task, fault)) = halted {
        send_str(serial, "HALT ");
        send_str(serial, task);
        send_str(serial, " ");
        send_str(serial, fault.as_str());
        send_str(serial, "\r\n");
    }

    table
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Serial port capturing every byte.
    #[derive(Default)]
    pub(crate) struct CaptureSerial {
        pub bytes: Vec<u8>,
        pub writes: usize,
    }

    impl CaptureSerial {
        pub fn text(&self) -> std::string::String { std::string::String::from_utf8(self.bytes.clone()).unwrap() }
    }

    impl SerialPort for CaptureSerial {
        fn write_byte(
            &mut self,
            byte: u8,
        ) {
            self.bytes.push(byte);
            self.writes += 1;
        }
    }

    fn stat(
        name: &'static str,
        run_time: u64,
        min_free_stack: u32,
    ) -> TaskStat {
        TaskStat {
            name,
            run_time,
            min_free_stack,
        }
    }

    #[test]
    fn test_cpu_percent_shares() {
        assert_eq!(cpu_percent(500, 1000), Some(50));
        assert_eq!(cpu_percent(300, 1000), Some(30));
        assert_eq!(cpu_percent(200, 1000), Some(20));
        assert_eq!(cpu_percent(5, 1000), Some(0));
        assert_eq!(cpu_percent(5, 99), None);
    }

    #[test]
    fn test_report_table() {
        let stats = [
            stat("Sensor", 500, 212),
            stat("Average", 300, 198),
            stat("Display", 200, 180),
            stat("Stats", 5, 150),
        ];
        let mut serial = CaptureSerial::default();
        assert!(write_report(&mut serial, &stats, 1000, None));

        let text = serial.text();
        let lines: Vec<&str> = text.split("\r\n").collect();
        assert_eq!(lines.len(), 6); // header, 4 tasks, trailing empty
        assert_eq!(lines[0], "Task       CPU%  Stack      Ticks");
        assert_eq!(lines[1], "Sensor      50%    212        500");
        assert_eq!(lines[2], "Average     30%    198        300");
        assert_eq!(lines[3], "Display     20%    180        200");
        assert_eq!(lines[4], "Stats       <1%    150          5");
        assert_eq!(lines[5], "");
    }

    #[test]
    fn test_bytes_sent_one_at_a_time_without_terminator() {
        let mut serial = CaptureSerial::default();
        send_str(&mut serial, "abc");
        assert_eq!(serial.writes, 3);
        assert_eq!(serial.bytes, b"abc");
    }

    #[test]
    fn test_table_skipped_below_one_percent_unit() {
        let stats = [stat("Sensor", 10, 200)];
        let mut serial = CaptureSerial::default();
        assert!(!write_report(&mut serial, &stats, 99, None));
        assert!(serial.bytes.is_empty());
    }

    #[test]
    fn test_halt_line_follows_table() {
        let stats = [stat("Display", 200, 20)];
        let mut serial = CaptureSerial::default();
        write_report(&mut serial, &stats, 1000, Some(("Display", Fault::StackMargin)));
        assert!(serial.text().ends_with("HALT Display STACK\r\n"));

        // Halt line is sent even without a table
        let mut serial = CaptureSerial::default();
        write_report(&mut serial, &[], 0, Some(("Sensor", Fault::ResourceExhaustion)));
        assert_eq!(serial.text(), "HALT Sensor NO MEM\r\n");
    }

    #[test]
    fn test_line_fields_fixed_width() {
        let line = format_task_line(&stat("Diagnostics", 9_999_999_999, u32::MAX), 1_000_000_000_000);
        assert_eq!(line.len(), LINE_LEN);
        // Name truncated to its column, unsampled stack shown as '-'
        assert_eq!(line.as_str(), "Diagnostic  <1%      - 9999999999\r\n");
    }

    #[test]
    fn test_cpu_overflow_marker() {
        let line = format_task_line(&stat("Sensor", 5_000_000, 100), 200);
        assert_eq!(line.as_str(), "Sensor    >999%    100    5000000\r\n");

        let line = format_task_line(&stat("Sensor", 999, 100), 100);
        assert_eq!(line.as_str(), "Sensor     999%    100        999\r\n");
    }

    #[test]
    fn test_wide_numbers_widen_the_line() {
        let line = format_task_line(&stat("Display", u64::MAX, 12_345_678), u64::MAX);
        assert_eq!(line.as_str(), "Display    100% 12345678 18446744073709551615\r\n");
        assert!(line.len() > LINE_LEN);
    }

    #[test]
    fn test_totals_past_32_bits() {
        // Two hours of microseconds, half of it in one task
        let total = 7_200_000_000;
        let line = format_task_line(&stat("Sensor", total / 2, 64), total);
        assert_eq!(line.as_str(), "Sensor      50%     64 3600000000\r\n");
    }
}
