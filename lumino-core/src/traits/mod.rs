//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod display;
pub mod light;

pub use display::{DisplayDriver, DisplayError};
pub use light::{LightOutput, OutputError};
