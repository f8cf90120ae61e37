//! Pulse timer on the embassy time driver
//!
//! The RP2040 time driver counts in microseconds, so laps are converted
//! to 0.5 µs ticks with one-tick granularity lost.

use embassy_time::Instant;
use lumino_hal::{micros_to_ticks, PulseTimer};

/// [`PulseTimer`] backed by [`Instant::now`]
pub struct InstantTimer {
    last: Instant,
    running: bool,
}

impl InstantTimer {
    /// Start counting from now
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            running: true,
        }
    }
}

impl Default for InstantTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseTimer for InstantTimer {
    fn lap(&mut self) -> u16 {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        if !self.running {
            return u16::MAX;
        }
        micros_to_ticks(elapsed.as_micros())
    }

    fn halt(&mut self) {
        self.running = false;
    }

    fn resume(&mut self) {
        self.last = Instant::now();
        self.running = true;
    }
}
