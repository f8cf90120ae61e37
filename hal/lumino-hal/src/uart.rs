//! UART serial communication abstractions
//!
//! The display link is a plain byte pipe. Transmit is synchronous; receive
//! is buffered by the peripheral interrupt into a queue that the main loop
//! drains without blocking.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been queued or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver backed by an interrupt-filled queue
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Check whether at least one byte is waiting in the receive queue
    fn available(&mut self) -> Result<bool, Self::Error>;

    /// Take one byte from the receive queue without blocking
    ///
    /// Returns `Ok(None)` when the queue is empty.
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error>;
}
