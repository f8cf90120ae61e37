//! Lumino Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the fixture logic is written
//! against. Chip-specific crates implement them; host tests implement them
//! with in-memory mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (lumino-firmware, etc.)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lumino-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ lumino-hal-rp2040 │
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Byte transport to the display
//! - [`timer::PulseTimer`] - Edge-to-edge interval timer for IR capture
//!
//! PWM channels, the buzzer pin and blocking delays use the `embedded-hal`
//! 1.0 traits directly.

#![no_std]
#![deny(unsafe_code)]

pub mod timer;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use timer::{micros_to_ticks, PulseTimer, TICKS_PER_US};
pub use uart::{UartRx, UartTx};
