//! Fixture configuration
//!
//! `fixture.toml` is validated and turned into [`FIXTURE`] by build.rs.
//! It is checked once more at boot against the core rules.

use defmt::*;
use lumino_core::config::{
    BuzzerConfig, DisplayTiming, FixtureConfig, LightingConfig, LoopTiming, Preset, PresetTable,
};
use lumino_core::ir::{NecTiming, PulseWindow};

include!(concat!(env!("OUT_DIR"), "/fixture_config.rs"));

/// The compiled-in configuration, or the defaults if it fails validation
pub fn load() -> FixtureConfig {
    match FIXTURE.validate() {
        Ok(()) => {
            info!(
                "Fixture config: max {}/{}, defaults {}/{}",
                FIXTURE.lighting.max_brightness,
                FIXTURE.lighting.max_cct,
                FIXTURE.lighting.default_brightness,
                FIXTURE.lighting.default_cct
            );
            FIXTURE
        }
        Err(e) => {
            error!("fixture.toml rejected ({:?}), using defaults", e);
            FixtureConfig::DEFAULT
        }
    }
}
