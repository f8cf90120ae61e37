//! Touch Display Serial Protocol
//!
//! This crate defines the UART protocol spoken by the touch display module.
//! The display exposes 16-bit "variable pointers" (VPs); the controller
//! writes VPs to update what is shown, and the display uploads VPs when the
//! user touches a control.
//!
//! # Protocol Overview
//!
//! All messages use a length-prefixed frame:
//! ```text
//! ┌──────┬──────┬────────┬─────────┬──────────────────┐
//! │ 0x5A │ 0xA5 │ LENGTH │ COMMAND │ BODY             │
//! │ 1B   │ 1B   │ 1B     │ 1B      │ LENGTH - 1 bytes │
//! └──────┴──────┴────────┴─────────┴──────────────────┘
//! ```
//!
//! There is no checksum. Recovery from garbled input relies on the header
//! pair, the bounded length field and a stall timeout in the parser.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{
    FrameError, FrameParser, ParseState, ParserStats, CMD_READ, CMD_WRITE, HEADER_HIGH,
    HEADER_LOW, MAX_FRAME_SIZE, MAX_LENGTH, MIN_LENGTH,
};
pub use messages::{HostMessage, VpUpdate};
