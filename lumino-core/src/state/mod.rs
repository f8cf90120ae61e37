//! Lighting state machine
//!
//! Remote keys and display updates are turned into [`Action`]s by
//! [`Lighting::apply`]. The machine is deterministic and does no I/O.

pub mod actions;
pub mod events;
pub mod machine;

pub use actions::{Action, Actions, PwmLevels, MAX_ACTIONS};
pub use events::{Event, RemoteKey, Vp};
pub use machine::Lighting;
