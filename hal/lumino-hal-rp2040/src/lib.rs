//! RP2040-specific HAL for the light controller firmware
//!
//! Implements the shared `lumino-hal` traits on top of embassy-rp:
//!
//! - Buffered UART halves as [`UartTx`](lumino_hal::UartTx) /
//!   [`UartRx`](lumino_hal::UartRx)
//! - The embassy time driver as a [`PulseTimer`](lumino_hal::PulseTimer)

#![no_std]

pub mod timer;
pub mod uart;

pub use timer::InstantTimer;
pub use uart::{BlockingTx, QueuedRx};
