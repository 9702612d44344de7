//! UART sink for the statistics report.
//!
//! Wiring: UART0 TX on GPIO0, 115200 8N1.

use embedded_io::Write;
use thermograph::profiling::SerialPort;

/// Blocking byte writer over any `embedded_io` transmitter.
pub struct UartSerial<W> {
    tx: W,
}

impl<W: Write> UartSerial<W> {
    pub fn new(tx: W) -> Self { Self { tx } }
}

impl<W: Write> SerialPort for UartSerial<W> {
    fn write_byte(
        &mut self,
        byte: u8,
    ) {
        // Nothing to recover on a lost console byte
        self.tx.write_all(&[byte]).ok();
    }
}
