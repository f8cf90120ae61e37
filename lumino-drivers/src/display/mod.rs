//! Serial touch display link
//!
//! [`DwinDisplay`] owns the transmit half and implements
//! [`DisplayDriver`](lumino_core::traits::DisplayDriver).
//! [`DwinReceiver`] owns the receive half and the frame parser.

mod receiver;
mod transmitter;

pub use receiver::DwinReceiver;
pub use transmitter::{DwinDisplay, READ_POLL_US};
