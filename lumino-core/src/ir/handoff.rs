//! Interrupt to main-loop handoff for captured IR frames
//!
//! An [`IrSlot`] holds at most one completed [`PulseFrame`]. It is split
//! once into an [`IrProducer`] (edge handler, interrupt priority) and an
//! [`IrConsumer`] (controller loop). Neither half is `Clone`, so there is
//! exactly one writer and one reader.
//!
//! ```text
//!   producer                       consumer
//!   --------                       --------
//!   capture intervals
//!   copy frame into slot
//!   set `ready` (Release)  ----->  see `ready` (Acquire)
//!   stop listening                 copy frame out
//!   await release         <-----   clear `ready`, signal
//!   listen for edges again
//! ```
//!
//! While `ready` is set the producer neither touches the slot nor accepts
//! new intervals.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, Ordering};

use super::capture::{CaptureEvent, PulseCapture, PulseFrame};
use super::timing::NecTiming;

/// Shared storage for one captured frame
pub struct IrSlot {
    ready: AtomicBool,
    frame: Mutex<CriticalSectionRawMutex, Cell<PulseFrame>>,
    released: Signal<CriticalSectionRawMutex, ()>,
}

impl IrSlot {
    pub const fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            frame: Mutex::new(Cell::new(PulseFrame::EMPTY)),
            released: Signal::new(),
        }
    }

    /// Split into the producer and consumer halves
    ///
    /// Takes `&mut self` so the slot can only be split once for a given
    /// lifetime.
    pub fn split(&mut self, timing: NecTiming) -> (IrProducer<'_>, IrConsumer<'_>) {
        let slot: &IrSlot = self;
        (
            IrProducer {
                slot,
                capture: PulseCapture::new(timing),
            },
            IrConsumer { slot, timing },
        )
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

impl Default for IrSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt-side half: owns the pulse capture
pub struct IrProducer<'a> {
    slot: &'a IrSlot,
    capture: PulseCapture,
}

impl<'a> IrProducer<'a> {
    /// Feed one interval
    ///
    /// On [`CaptureEvent::Complete`] the frame has been published and the
    /// caller should stop listening until [`wait_released`] returns.
    ///
    /// [`wait_released`]: IrProducer::wait_released
    pub fn on_interval(&mut self, ticks: u16) -> CaptureEvent {
        if self.slot.is_ready() {
            return CaptureEvent::Ignored;
        }

        let event = self.capture.on_interval(ticks);
        if event == CaptureEvent::Complete {
            if let Some(frame) = self.capture.frame() {
                self.slot.frame.lock(|cell| cell.set(frame));
                self.slot.released.reset();
                self.slot.ready.store(true, Ordering::Release);
            }
            self.capture.release();
        }
        event
    }

    /// Wait until the consumer has taken the pending frame
    ///
    /// Returns immediately when nothing is pending.
    pub async fn wait_released(&self) {
        while self.slot.is_ready() {
            self.slot.released.wait().await;
        }
    }
}

/// Main-loop half: takes completed frames
pub struct IrConsumer<'a> {
    slot: &'a IrSlot,
    timing: NecTiming,
}

impl<'a> IrConsumer<'a> {
    /// Take the pending frame and re-enable capture
    pub fn take(&mut self) -> Option<PulseFrame> {
        if !self.slot.is_ready() {
            return None;
        }
        let frame = self.slot.frame.lock(Cell::get);
        self.slot.ready.store(false, Ordering::Release);
        self.slot.released.signal(());
        Some(frame)
    }

    /// Pulse windows used for decoding
    pub fn timing(&self) -> &NecTiming {
        &self.timing
    }
}
