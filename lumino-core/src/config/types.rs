//! Configuration type definitions
//!
//! These types represent the fixture configuration. The firmware's build
//! script turns `fixture.toml` into a `const` of [`FixtureConfig`].

use crate::ir::NecTiming;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest level the PWM lookup table can express
pub const MAX_LEVEL: u8 = 10;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A maximum level exceeds [`MAX_LEVEL`]
    LevelOutOfRange,
    /// A power-on default exceeds its maximum
    DefaultOutOfRange,
    /// A preset exceeds the configured maximum levels
    PresetOutOfRange,
    /// A pulse window has `min > max`
    EmptyWindow,
    /// Two pulse windows share ticks
    OverlappingWindows,
    /// A timing value is zero where it must not be
    ZeroTiming,
}

/// Brightness / colour temperature pair applied by a preset key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Preset {
    pub brightness: u8,
    pub cct: u8,
}

impl Preset {
    pub const fn new(brightness: u8, cct: u8) -> Self {
        Self { brightness, cct }
    }
}

/// The four fixed presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PresetTable {
    pub memory_one: Preset,
    pub memory_two: Preset,
    pub endo: Preset,
    pub max: Preset,
}

impl PresetTable {
    pub const DEFAULT: Self = Self {
        memory_one: Preset::new(6, 4),
        memory_two: Preset::new(4, 7),
        endo: Preset::new(1, 1),
        max: Preset::new(MAX_LEVEL, MAX_LEVEL),
    };

    fn iter(&self) -> impl Iterator<Item = &Preset> {
        [&self.memory_one, &self.memory_two, &self.endo, &self.max].into_iter()
    }
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Lighting limits, power-on defaults and presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LightingConfig {
    /// Highest brightness level
    pub max_brightness: u8,
    /// Highest colour temperature level
    pub max_cct: u8,
    /// Brightness applied on power-on
    pub default_brightness: u8,
    /// Colour temperature applied on power-on
    pub default_cct: u8,
    /// When set, the CCT remote key rolls over to 0 past the maximum
    /// instead of clamping
    pub cct_key_wraps: bool,
    pub presets: PresetTable,
}

impl LightingConfig {
    pub const DEFAULT: Self = Self {
        max_brightness: MAX_LEVEL,
        max_cct: MAX_LEVEL,
        default_brightness: 7,
        default_cct: 3,
        cct_key_wraps: false,
        presets: PresetTable::DEFAULT,
    };

    /// The power-on brightness/colour pair
    pub fn defaults(&self) -> Preset {
        Preset::new(self.default_brightness, self.default_cct)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_brightness > MAX_LEVEL || self.max_cct > MAX_LEVEL {
            return Err(ConfigError::LevelOutOfRange);
        }
        if self.default_brightness > self.max_brightness || self.default_cct > self.max_cct {
            return Err(ConfigError::DefaultOutOfRange);
        }
        if self
            .presets
            .iter()
            .any(|p| p.brightness > self.max_brightness || p.cct > self.max_cct)
        {
            return Err(ConfigError::PresetOutOfRange);
        }
        Ok(())
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Display link timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayTiming {
    /// Empty polls a partial frame survives before the parser resets
    pub stall_polls: u16,
    /// Delay after a page switch (µs)
    pub page_settle_us: u32,
    /// Delay after a backlight change (µs)
    pub backlight_settle_us: u32,
    /// How long the boot probe waits for a read response (ms)
    pub probe_timeout_ms: u32,
}

impl DisplayTiming {
    pub const DEFAULT: Self = Self {
        stall_polls: 5000,
        page_settle_us: 5_000,
        backlight_settle_us: 100_000,
        probe_timeout_ms: 100,
    };
}

impl Default for DisplayTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Main loop pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoopTiming {
    /// Controller loop period (µs)
    pub period_us: u32,
    /// Pause after an accepted IR frame (µs)
    pub ir_debounce_us: u32,
}

impl LoopTiming {
    pub const DEFAULT: Self = Self {
        period_us: 100,
        ir_debounce_us: 1_000,
    };
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Boot buzzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuzzerConfig {
    /// Length of the boot beep (µs)
    pub beep_us: u32,
}

impl BuzzerConfig {
    pub const DEFAULT: Self = Self { beep_us: 2_000 };
}

impl Default for BuzzerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete fixture configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixtureConfig {
    pub lighting: LightingConfig,
    pub ir: NecTiming,
    pub display: DisplayTiming,
    pub timing: LoopTiming,
    pub buzzer: BuzzerConfig,
}

impl FixtureConfig {
    pub const DEFAULT: Self = Self {
        lighting: LightingConfig::DEFAULT,
        ir: NecTiming::DEFAULT,
        display: DisplayTiming::DEFAULT,
        timing: LoopTiming::DEFAULT,
        buzzer: BuzzerConfig::DEFAULT,
    };

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lighting.validate()?;
        self.ir.validate()?;
        if self.display.stall_polls == 0 || self.timing.period_us == 0 {
            return Err(ConfigError::ZeroTiming);
        }
        Ok(())
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
