//! Task profiling and the serial statistics report.
//!
//! - `monitor`: Per-task run time and stack high-water marks
//! - `format`: Radix conversion and fixed-width fields without `core::fmt`
//! - `report`: `SerialPort` sink and the statistics table

pub mod format;
pub mod monitor;
pub mod report;

pub use format::{format_radix, push_radix};
pub use monitor::{TaskContext, TaskId, TaskMonitor, TaskProbe, TaskStat};
pub use report::{SerialPort, cpu_percent, send_str, write_report};
