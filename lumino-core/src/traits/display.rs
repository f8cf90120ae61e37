//! Display driver trait for the serial touch display

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// UART write or read failed
    Transport,
    /// No response within the allotted time
    Timeout,
}

/// Trait for display communication
///
/// The display owns its own widgets; the controller only pushes variable
/// values and page switches. Implementations handle framing and any
/// settle delays the panel needs after a command.
pub trait DisplayDriver {
    /// Write one word to a variable pointer
    fn write_vp(&mut self, address: u16, value: u16) -> Result<(), DisplayError>;

    /// Switch to a page
    fn set_page(&mut self, page: u8) -> Result<(), DisplayError>;

    /// Set the backlight level (0-100)
    fn set_backlight(&mut self, level: u8) -> Result<(), DisplayError>;
}
