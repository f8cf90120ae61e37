//! NEC pulse windows
//!
//! All values are in timer ticks of 0.5 µs.

use crate::config::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inclusive tick range accepted for one pulse class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PulseWindow {
    pub min: u16,
    pub max: u16,
}

impl PulseWindow {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, ticks: u16) -> bool {
        self.min <= ticks && ticks <= self.max
    }

    fn overlaps(&self, other: &PulseWindow) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

/// Classification of a single interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseClass {
    Leader,
    One,
    Zero,
    /// Outside every window
    Unknown,
}

/// The three windows used to classify intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NecTiming {
    /// Leader burst plus space (nominally 13.5 ms)
    pub leader: PulseWindow,
    /// Logic one period (nominally 2.25 ms)
    pub one: PulseWindow,
    /// Logic zero period (nominally 1.125 ms)
    pub zero: PulseWindow,
}

impl NecTiming {
    pub const DEFAULT: Self = Self {
        leader: PulseWindow::new(18_000, 30_000),
        one: PulseWindow::new(3_000, 5_400),
        zero: PulseWindow::new(1_200, 2_700),
    };

    pub fn classify(&self, ticks: u16) -> PulseClass {
        if self.leader.contains(ticks) {
            PulseClass::Leader
        } else if self.one.contains(ticks) {
            PulseClass::One
        } else if self.zero.contains(ticks) {
            PulseClass::Zero
        } else {
            PulseClass::Unknown
        }
    }

    /// Windows must be non-empty and pairwise disjoint
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [self.leader, self.one, self.zero];
        if windows.iter().any(|w| w.min > w.max) {
            return Err(ConfigError::EmptyWindow);
        }
        if self.leader.overlaps(&self.one)
            || self.leader.overlaps(&self.zero)
            || self.one.overlaps(&self.zero)
        {
            return Err(ConfigError::OverlappingWindows);
        }
        Ok(())
    }
}

impl Default for NecTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_edges_of_windows() {
        let timing = NecTiming::DEFAULT;
        assert_eq!(timing.classify(18_000), PulseClass::Leader);
        assert_eq!(timing.classify(30_000), PulseClass::Leader);
        assert_eq!(timing.classify(30_001), PulseClass::Unknown);
        assert_eq!(timing.classify(3_000), PulseClass::One);
        assert_eq!(timing.classify(5_400), PulseClass::One);
        assert_eq!(timing.classify(2_700), PulseClass::Zero);
        assert_eq!(timing.classify(2_800), PulseClass::Unknown);
        assert_eq!(timing.classify(0), PulseClass::Unknown);
    }

    #[test]
    fn test_default_windows_valid() {
        assert_eq!(NecTiming::DEFAULT.validate(), Ok(()));
    }

    #[test]
    fn test_overlap_rejected() {
        let timing = NecTiming {
            zero: PulseWindow::new(1_200, 3_000),
            ..NecTiming::DEFAULT
        };
        assert_eq!(timing.validate(), Err(ConfigError::OverlappingWindows));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let timing = NecTiming {
            one: PulseWindow::new(5_400, 3_000),
            ..NecTiming::DEFAULT
        };
        assert_eq!(timing.validate(), Err(ConfigError::EmptyWindow));
    }
}
