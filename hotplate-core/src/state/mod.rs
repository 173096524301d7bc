//! Process lifecycle state machine
//!
//! The lifecycle is explicit, finite, and deterministic. Step sequencing
//! inside a run lives in [`crate::process`].

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{CoolingReason, SystemState};
