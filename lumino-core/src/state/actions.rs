//! Output actions produced by the state machine

use heapless::Vec;

/// Most actions a single event can produce
pub const MAX_ACTIONS: usize = 8;

/// Ordered actions for one event
pub type Actions = Vec<Action, MAX_ACTIONS>;

/// Levels for the two PWM channels, both `0..=MAX_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmLevels {
    /// White channel
    pub white: u8,
    /// Warm channel
    pub warm: u8,
}

impl PwmLevels {
    pub const OFF: Self = Self { white: 0, warm: 0 };
}

/// Something the controller must do, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Re-derive the dimmer outputs
    UpdatePwm(PwmLevels),
    /// Write a value to a display variable
    WriteVp { address: u16, value: u16 },
    /// Switch the display page
    SetPage(u8),
    /// Set the display backlight (0-100)
    SetBacklight(u8),
}
