//! Reflow process sequencing
//!
//! [`ProcessController`] owns the single [`ProcessState`] and advances it
//! once per control tick.

pub mod context;
pub mod controller;

pub use context::{IdleField, ProcessState, StepAdvance, HELP_PAGES, HELP_STEP_TICKS};
pub use controller::{ProcessController, TickInput, TickOutput};
