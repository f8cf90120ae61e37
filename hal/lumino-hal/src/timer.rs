//! Pulse interval timer
//!
//! The IR receiver measures the time between consecutive falling edges.
//! The timer is read and restarted in the same call so that error never
//! accumulates across edges.

/// Timer ticks per microsecond (one tick is 0.5 µs)
pub const TICKS_PER_US: u32 = 2;

/// Free-running interval timer read from the edge handler
pub trait PulseTimer {
    /// Return the ticks elapsed since the previous call and restart counting
    ///
    /// Intervals longer than the counter can hold saturate at `u16::MAX`,
    /// which no pulse window accepts.
    fn lap(&mut self) -> u16;

    /// Stop counting until [`PulseTimer::resume`] is called
    fn halt(&mut self);

    /// Restart counting from zero
    fn resume(&mut self);
}

/// Convert a microsecond interval to saturated timer ticks
pub fn micros_to_ticks(micros: u64) -> u16 {
    let ticks = micros.saturating_mul(TICKS_PER_US as u64);
    if ticks > u16::MAX as u64 {
        u16::MAX
    } else {
        ticks as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micros_to_ticks() {
        assert_eq!(micros_to_ticks(0), 0);
        assert_eq!(micros_to_ticks(562), 1124);
        assert_eq!(micros_to_ticks(13_500), 27_000);
    }

    #[test]
    fn test_micros_to_ticks_saturates() {
        assert_eq!(micros_to_ticks(40_000), u16::MAX);
        assert_eq!(micros_to_ticks(u64::MAX), u16::MAX);
    }
}
