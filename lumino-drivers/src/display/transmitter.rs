use embedded_hal::delay::DelayNs;
use lumino_core::config::DisplayTiming;
use lumino_core::traits::{DisplayDriver, DisplayError};
use lumino_hal::{UartRx, UartTx};
use lumino_protocol::{HostMessage, MAX_FRAME_SIZE};

use super::DwinReceiver;

/// Receive queue poll interval while waiting for a read response (µs)
pub const READ_POLL_US: u32 = 100;

/// Transmit half of the display link
///
/// Page and backlight changes are followed by a blocking settle delay;
/// the panel drops commands that arrive while it is redrawing.
pub struct DwinDisplay<T, D> {
    tx: T,
    delay: D,
    timing: DisplayTiming,
}

impl<T: UartTx, D: DelayNs> DwinDisplay<T, D> {
    pub fn new(tx: T, delay: D, timing: DisplayTiming) -> Self {
        Self { tx, delay, timing }
    }

    fn send(&mut self, message: HostMessage) -> Result<(), DisplayError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = message
            .encode(&mut buffer)
            .map_err(|_| DisplayError::Transport)?;
        self.tx
            .write_blocking(&buffer[..len])
            .map_err(|_| DisplayError::Transport)
    }

    /// Ask the display for one VP and wait for the answer
    ///
    /// Polls `rx` every [`READ_POLL_US`] for up to `timeout_ms`. Updates
    /// for other addresses arriving meanwhile are discarded. Returns
    /// `Err(DisplayError::Timeout)` when no answer arrives in time.
    pub fn read_vp<R: UartRx>(
        &mut self,
        rx: &mut DwinReceiver<R>,
        address: u16,
        timeout_ms: u32,
    ) -> Result<u16, DisplayError> {
        self.send(HostMessage::ReadVp { address, words: 1 })?;
        self.tx.flush().map_err(|_| DisplayError::Transport)?;

        let polls = timeout_ms.saturating_mul(1_000) / READ_POLL_US;
        for _ in 0..=polls {
            let mut value = None;
            rx.poll(|result| {
                if let Ok(update) = result {
                    if update.address == address {
                        value = Some(update.value);
                    }
                }
            });
            if let Some(value) = value {
                return Ok(value);
            }
            self.delay.delay_us(READ_POLL_US);
        }

        Err(DisplayError::Timeout)
    }
}

impl<T: UartTx, D: DelayNs> DisplayDriver for DwinDisplay<T, D> {
    fn write_vp(&mut self, address: u16, value: u16) -> Result<(), DisplayError> {
        self.send(HostMessage::WriteVp { address, value })
    }

    fn set_page(&mut self, page: u8) -> Result<(), DisplayError> {
        self.send(HostMessage::SetPage(page))?;
        self.delay.delay_us(self.timing.page_settle_us);
        Ok(())
    }

    fn set_backlight(&mut self, level: u8) -> Result<(), DisplayError> {
        self.send(HostMessage::SetBacklight(level))?;
        self.delay.delay_us(self.timing.backlight_settle_us);
        Ok(())
    }
}
