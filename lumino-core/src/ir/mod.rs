//! Infrared remote reception
//!
//! Edge-to-edge intervals from the IR receiver are classified against
//! three pulse windows and collected into a [`PulseFrame`] by
//! [`PulseCapture`]. The capture runs in interrupt context; a completed
//! frame is handed to the main loop through an [`IrSlot`] and decoded
//! there into a [`NecFrame`].

pub mod capture;
pub mod handoff;
pub mod nec;
pub mod timing;

pub use capture::{CaptureEvent, PulseCapture, PulseFrame, FRAME_PULSES};
pub use handoff::{IrConsumer, IrProducer, IrSlot};
pub use nec::NecFrame;
pub use timing::{NecTiming, PulseClass, PulseWindow};
