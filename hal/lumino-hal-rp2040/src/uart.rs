//! Buffered UART adapters
//!
//! The receive half is filled by the UART interrupt into the ring buffer
//! handed to `BufferedUart::new`; [`QueuedRx`] drains it without waiting.
//! [`BlockingTx`] waits for room in the transmit ring.

use embassy_rp::uart::{BufferedUartRx, BufferedUartTx, Error};
use embedded_io::{Read, ReadReady, Write};
use lumino_hal::{UartRx, UartTx};

/// Non-blocking view of a buffered UART receiver
pub struct QueuedRx(BufferedUartRx);

impl QueuedRx {
    pub fn new(rx: BufferedUartRx) -> Self {
        Self(rx)
    }
}

impl UartRx for QueuedRx {
    type Error = Error;

    fn available(&mut self) -> Result<bool, Error> {
        self.0.read_ready()
    }

    fn try_read_byte(&mut self) -> Result<Option<u8>, Error> {
        if !self.0.read_ready()? {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        // read_ready guarantees this returns without blocking
        match self.0.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

/// Blocking writer over a buffered UART transmitter
pub struct BlockingTx(BufferedUartTx);

impl BlockingTx {
    pub fn new(tx: BufferedUartTx) -> Self {
        Self(tx)
    }
}

impl UartTx for BlockingTx {
    type Error = Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Error> {
        self.0.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Error> {
        Write::flush(&mut self.0)
    }
}
