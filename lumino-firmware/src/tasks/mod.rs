//! Embassy async tasks
//!
//! The IR edge task runs on the interrupt executor; the controller task
//! runs on the thread executor. They share only the IR slot.

pub mod controller;
pub mod ir_edge;

pub use controller::controller_task;
pub use ir_edge::ir_edge_task;
