//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in lumino-core for the fixture's hardware:
//!
//! - Two-channel LUT dimmer over `embedded-hal` PWM channels
//! - Boot buzzer
//! - Serial touch display link (transmit, receive, read-back)

#![no_std]
#![deny(unsafe_code)]

// Host critical-section implementation for the test binaries
#[cfg(test)]
use critical_section as _;

pub mod buzzer;
pub mod display;
pub mod pwm;
