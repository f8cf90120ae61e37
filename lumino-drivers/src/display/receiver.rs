use lumino_hal::UartRx;
use lumino_protocol::{FrameError, FrameParser, ParserStats, VpUpdate};

/// Receive half of the display link
pub struct DwinReceiver<R> {
    rx: R,
    parser: FrameParser,
    read_errors: u16,
}

impl<R: UartRx> DwinReceiver<R> {
    /// `stall_polls` empty polls abandon a partial frame
    pub fn new(rx: R, stall_polls: u16) -> Self {
        Self {
            rx,
            parser: FrameParser::with_stall_limit(stall_polls),
            read_errors: 0,
        }
    }

    /// Drain every byte waiting in the receive queue
    ///
    /// `handle` sees each completed update and each framing error. When no
    /// byte was waiting the parser's stall counter advances instead.
    /// Returns the number of bytes consumed.
    pub fn poll<F>(&mut self, handle: F) -> usize
    where
        F: FnMut(Result<VpUpdate, FrameError>),
    {
        let rx = &mut self.rx;
        let read_errors = &mut self.read_errors;
        let bytes = core::iter::from_fn(|| {
            let next = match rx.available() {
                Ok(true) => rx.try_read_byte(),
                Ok(false) => Ok(None),
                Err(e) => Err(e),
            };
            next.unwrap_or_else(|_| {
                *read_errors = read_errors.saturating_add(1);
                None
            })
        });
        self.parser.poll(bytes, handle)
    }

    pub fn stats(&self) -> ParserStats {
        self.parser.stats()
    }

    /// Receive errors reported by the UART (overrun, framing, break)
    pub fn read_errors(&self) -> u16 {
        self.read_errors
    }
}
