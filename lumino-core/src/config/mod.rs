//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware builds a
//! [`FixtureConfig`] from `fixture.toml` at compile time.

pub mod types;

pub use types::*;
