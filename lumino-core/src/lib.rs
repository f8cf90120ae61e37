//! Board-agnostic core logic for the light controller firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - IR pulse capture, NEC decoding and the interrupt/main-loop handoff
//! - Lighting state machine for remote keys and display updates
//! - Controller applying state machine actions to outputs
//! - Output traits (PWM dimmer, display)
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

// Host critical-section implementation for the test binaries
#[cfg(test)]
use critical_section as _;

pub mod config;
pub mod controller;
pub mod ir;
pub mod state;
pub mod traits;
