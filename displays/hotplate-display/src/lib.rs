//! Display abstraction and rendering for the reflow hotplate
//!
//! This crate provides:
//! - `DisplayBackend` trait for character displays
//! - `Screen`, a 16x2 text buffer with dirty tracking
//! - `Renderer`, which turns a `ProcessSnapshot` into screen lines
//!
//! The control loop renders into the screen every tick and only touches the
//! hardware when a line actually changed.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod renderer;
pub mod screen;

// Re-export key types
pub use backend::{draw_screen, DisplayBackend, DisplayError};
pub use renderer::Renderer;
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
