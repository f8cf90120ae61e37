//! Piezo buzzer on a GPIO pin

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Active-high buzzer
pub struct Buzzer<P> {
    pin: P,
}

impl<P: OutputPin> Buzzer<P> {
    /// Take the pin and make sure the buzzer is silent
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin })
    }

    /// Sound for `duration_us`, blocking
    pub fn beep<D: DelayNs>(&mut self, delay: &mut D, duration_us: u32) -> Result<(), P::Error> {
        self.pin.set_high()?;
        delay.delay_us(duration_us);
        self.pin.set_low()
    }
}
