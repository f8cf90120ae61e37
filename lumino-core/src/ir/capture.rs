//! Interrupt-side pulse capture
//!
//! [`PulseCapture`] is fed one interval per falling edge. It never blocks
//! and does a constant amount of work per call.

use super::nec::{NecFrame, NEC_BYTES};
use super::timing::{NecTiming, PulseClass};

/// Leader plus one interval per data bit
pub const FRAME_PULSES: usize = 1 + NEC_BYTES * 8;

/// A complete set of captured intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseFrame {
    intervals: [u16; FRAME_PULSES],
}

impl PulseFrame {
    pub const EMPTY: Self = Self {
        intervals: [0; FRAME_PULSES],
    };

    pub const fn from_intervals(intervals: [u16; FRAME_PULSES]) -> Self {
        Self { intervals }
    }

    /// The interval that started the capture
    pub fn leader(&self) -> u16 {
        self.intervals[0]
    }

    /// Decode the 32 data intervals, MSB first per byte
    ///
    /// Intervals in the logic-one window give a 1; anything else,
    /// including out-of-range intervals, gives a 0.
    pub fn decode(&self, timing: &NecTiming) -> NecFrame {
        let mut bytes = [0u8; NEC_BYTES];
        for (byte, bits) in bytes.iter_mut().zip(self.intervals[1..].chunks_exact(8)) {
            *byte = bits.iter().fold(0u8, |acc, &ticks| {
                (acc << 1) | u8::from(timing.classify(ticks) == PulseClass::One)
            });
        }
        NecFrame::from_bytes(bytes)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PulseFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "PulseFrame(leader={=u16})", self.leader())
    }
}

/// Capture progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum CaptureState {
    /// Waiting for a leader
    Idle,
    /// Leader seen, collecting data intervals
    Capturing,
    /// Buffer full, waiting to be released
    Ready,
}

/// Result of feeding one interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureEvent {
    /// Interval discarded (noise while idle, or a frame is pending)
    Ignored,
    /// Leader seen; capture (re)started
    Started,
    /// Data interval stored
    Stored,
    /// Last data interval stored; frame ready
    Complete,
}

/// Collects intervals into a [`PulseFrame`]
#[derive(Debug, Clone)]
pub struct PulseCapture {
    timing: NecTiming,
    state: CaptureState,
    index: usize,
    intervals: [u16; FRAME_PULSES],
}

impl PulseCapture {
    pub const fn new(timing: NecTiming) -> Self {
        Self {
            timing,
            state: CaptureState::Idle,
            index: 0,
            intervals: [0; FRAME_PULSES],
        }
    }

    fn is_ready(&self) -> bool {
        self.state == CaptureState::Ready
    }

    /// Feed the interval since the previous edge
    pub fn on_interval(&mut self, ticks: u16) -> CaptureEvent {
        if self.state == CaptureState::Ready {
            return CaptureEvent::Ignored;
        }

        if self.timing.classify(ticks) == PulseClass::Leader {
            // A leader always resynchronises, even mid-frame
            self.intervals[0] = ticks;
            self.index = 1;
            self.state = CaptureState::Capturing;
            return CaptureEvent::Started;
        }

        if self.state == CaptureState::Idle {
            return CaptureEvent::Ignored;
        }

        let Some(slot) = self.intervals.get_mut(self.index) else {
            self.state = CaptureState::Ready;
            return CaptureEvent::Complete;
        };
        *slot = ticks;
        self.index += 1;

        if self.index >= FRAME_PULSES {
            self.state = CaptureState::Ready;
            CaptureEvent::Complete
        } else {
            CaptureEvent::Stored
        }
    }

    /// The captured frame, once complete
    pub fn frame(&self) -> Option<PulseFrame> {
        self.is_ready()
            .then(|| PulseFrame::from_intervals(self.intervals))
    }

    /// Drop the captured frame and wait for the next leader
    pub fn release(&mut self) {
        self.state = CaptureState::Idle;
        self.index = 0;
    }
}
