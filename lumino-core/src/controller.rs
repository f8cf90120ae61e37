//! Controller
//!
//! Ties the lighting state machine to a [`LightOutput`] and a
//! [`DisplayDriver`]. Both input paths (decoded IR frames and display
//! updates) end up here, on the main loop.

use lumino_protocol::VpUpdate;

use crate::config::LightingConfig;
use crate::ir::NecFrame;
use crate::state::{Action, Actions, Event, Lighting, RemoteKey};
use crate::traits::{DisplayDriver, DisplayError, LightOutput, OutputError};

/// Errors raised while carrying out actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    Display(DisplayError),
    Output(OutputError),
}

impl From<DisplayError> for ControllerError {
    fn from(e: DisplayError) -> Self {
        ControllerError::Display(e)
    }
}

impl From<OutputError> for ControllerError {
    fn from(e: OutputError) -> Self {
        ControllerError::Output(e)
    }
}

/// What happened to a decoded IR frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrOutcome {
    /// Key applied
    Applied(RemoteKey),
    /// Valid key, but the lighting is off
    Ignored(RemoteKey),
    /// Valid key that left the levels where they were
    Unchanged(RemoteKey),
    /// Valid frame with a command no key uses
    Unknown(u8),
    /// Command failed its inverted-copy check
    Rejected,
}

/// Counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerStats {
    /// IR frames that passed the checksum
    pub ir_accepted: u16,
    /// IR frames dropped by the checksum
    pub ir_rejected: u16,
    /// Display updates that changed something
    pub vp_applied: u16,
}

/// Lighting controller
pub struct Controller<L, D> {
    lighting: Lighting,
    output: L,
    display: D,
    stats: ControllerStats,
}

impl<L: LightOutput, D: DisplayDriver> Controller<L, D> {
    pub fn new(config: LightingConfig, output: L, display: D) -> Self {
        Self {
            lighting: Lighting::new(config),
            output,
            display,
            stats: ControllerStats::default(),
        }
    }

    /// Run the boot actions
    pub fn start(&mut self) -> Result<(), ControllerError> {
        let actions = self.lighting.startup();
        self.run(&actions)
    }

    /// Apply a decoded IR frame
    pub fn handle_ir(&mut self, frame: NecFrame) -> Result<IrOutcome, ControllerError> {
        let Some(code) = frame.command() else {
            self.stats.ir_rejected = self.stats.ir_rejected.wrapping_add(1);
            return Ok(IrOutcome::Rejected);
        };
        self.stats.ir_accepted = self.stats.ir_accepted.wrapping_add(1);

        let Some(key) = RemoteKey::from_code(code) else {
            return Ok(IrOutcome::Unknown(code));
        };

        let actions = self.lighting.apply(Event::Remote(key));
        if actions.is_empty() {
            return Ok(if self.lighting.is_on() {
                IrOutcome::Unchanged(key)
            } else {
                IrOutcome::Ignored(key)
            });
        }
        self.run(&actions)?;
        Ok(IrOutcome::Applied(key))
    }

    /// Apply a value uploaded by the display
    ///
    /// Returns whether anything changed.
    pub fn handle_vp(&mut self, update: VpUpdate) -> Result<bool, ControllerError> {
        let actions = self.lighting.apply(Event::Display(update));
        if actions.is_empty() {
            return Ok(false);
        }
        self.stats.vp_applied = self.stats.vp_applied.wrapping_add(1);
        self.run(&actions)?;
        Ok(true)
    }

    /// Carry out actions in order
    ///
    /// A failing action does not stop the rest; the first error is
    /// returned once all have been attempted.
    fn run(&mut self, actions: &Actions) -> Result<(), ControllerError> {
        let mut result = Ok(());
        for action in actions {
            let outcome = match *action {
                Action::UpdatePwm(levels) => self.output.apply(levels).map_err(ControllerError::from),
                Action::WriteVp { address, value } => self
                    .display
                    .write_vp(address, value)
                    .map_err(ControllerError::from),
                Action::SetPage(page) => self.display.set_page(page).map_err(ControllerError::from),
                Action::SetBacklight(level) => self
                    .display
                    .set_backlight(level)
                    .map_err(ControllerError::from),
            };
            if result.is_ok() {
                result = outcome;
            }
        }
        result
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// The display driver, for traffic outside the state machine
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}
