//! Two-channel LUT dimmer
//!
//! Each level `0..=MAX_LEVEL` indexes a compare value measured against a
//! reference period of [`PWM_PERIOD`] counts. The ratio is rescaled onto
//! whatever `max_duty_cycle()` the PWM channel reports, so the same table
//! works on any timer width.

use embedded_hal::pwm::SetDutyCycle;
use lumino_core::config::MAX_LEVEL;
use lumino_core::state::PwmLevels;
use lumino_core::traits::{LightOutput, OutputError};

/// Reference period the lookup table is expressed in
pub const PWM_PERIOD: u16 = 0x0456;

/// Compare value per level
pub const PWM_LUT: [u16; MAX_LEVEL as usize + 1] =
    [0, 99, 199, 299, 399, 499, 599, 699, 799, 899, 999];

/// Duty cycle for `level` on a channel whose full scale is `max_duty`
///
/// Levels above the table clamp to the last entry.
pub fn duty_for_level(level: u8, max_duty: u16) -> u16 {
    let index = usize::from(level.min(MAX_LEVEL));
    let compare = u32::from(PWM_LUT[index]);
    (compare * u32::from(max_duty) / u32::from(PWM_PERIOD)) as u16
}

/// Dimmer driving a white and a warm channel
pub struct LutDimmer<W, Y> {
    white: W,
    warm: Y,
}

impl<W: SetDutyCycle, Y: SetDutyCycle> LutDimmer<W, Y> {
    /// Create a dimmer and drive both channels off
    pub fn new(white: W, warm: Y) -> Result<Self, OutputError> {
        let mut dimmer = Self { white, warm };
        dimmer.apply(PwmLevels::OFF)?;
        Ok(dimmer)
    }
}

impl<W: SetDutyCycle, Y: SetDutyCycle> LightOutput for LutDimmer<W, Y> {
    fn apply(&mut self, levels: PwmLevels) -> Result<(), OutputError> {
        let white = duty_for_level(levels.white, self.white.max_duty_cycle());
        let warm = duty_for_level(levels.warm, self.warm.max_duty_cycle());
        self.white
            .set_duty_cycle(white)
            .map_err(|_| OutputError::Pwm)?;
        self.warm
            .set_duty_cycle(warm)
            .map_err(|_| OutputError::Pwm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::pwm::{ErrorKind, ErrorType};

    /// Mock PWM channel with the reference period as full scale
    struct MockChannel {
        max: u16,
        duty: u16,
    }

    impl MockChannel {
        fn new(max: u16) -> Self {
            Self { max, duty: 0xFFFF }
        }
    }

    impl ErrorType for MockChannel {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockChannel {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }

    /// Channel that always fails
    struct BrokenChannel;

    impl ErrorType for BrokenChannel {
        type Error = ErrorKind;
    }

    impl SetDutyCycle for BrokenChannel {
        fn max_duty_cycle(&self) -> u16 {
            100
        }

        fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    #[test]
    fn test_lut_at_reference_period() {
        for (level, expected) in PWM_LUT.iter().enumerate() {
            assert_eq!(duty_for_level(level as u8, PWM_PERIOD), *expected);
        }
    }

    #[test]
    fn test_level_clamped() {
        assert_eq!(duty_for_level(200, PWM_PERIOD), 999);
    }

    #[test]
    fn test_rescaled_to_channel() {
        // 16-bit channel: 999/1110 of full scale
        assert_eq!(duty_for_level(10, u16::MAX), 58_981);
        assert_eq!(duty_for_level(0, u16::MAX), 0);
    }

    #[test]
    fn test_new_turns_off() {
        let dimmer =
            LutDimmer::new(MockChannel::new(PWM_PERIOD), MockChannel::new(PWM_PERIOD)).unwrap();
        assert_eq!(dimmer.white.duty, 0);
        assert_eq!(dimmer.warm.duty, 0);
    }

    #[test]
    fn test_apply_both_channels() {
        let mut dimmer =
            LutDimmer::new(MockChannel::new(PWM_PERIOD), MockChannel::new(PWM_PERIOD)).unwrap();
        dimmer.apply(PwmLevels { white: 7, warm: 3 }).unwrap();

        assert_eq!(dimmer.white.duty, 699);
        assert_eq!(dimmer.warm.duty, 299);
    }

    #[test]
    fn test_channel_error() {
        let result = LutDimmer::new(MockChannel::new(PWM_PERIOD), BrokenChannel);
        assert_eq!(result.err(), Some(OutputError::Pwm));
    }
}
