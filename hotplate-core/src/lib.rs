//! Board-agnostic core logic for the reflow hotplate firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (thermocouple, heater relay, button, display)
//! - Reflow profile catalog and tunables
//! - Input decoding (button hold counter, quadrature encoder)
//! - Windowed PID duty-cycle controller
//! - Process state machine and per-tick controller

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod input;
pub mod process;
pub mod state;
pub mod traits;
