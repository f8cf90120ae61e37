//! Light output trait

use crate::state::PwmLevels;

/// Errors from the light output stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// PWM peripheral rejected the duty cycle
    Pwm,
}

/// Trait for the two-channel dimmer
///
/// Implementations map brightness and colour temperature levels onto
/// hardware duty cycles.
pub trait LightOutput {
    /// Drive both channels to the given levels
    fn apply(&mut self, levels: PwmLevels) -> Result<(), OutputError>;
}
