//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in hotplate-core and hotplate-display over `embedded-hal` 1.0:
//!
//! - Heater relay (active-high or active-low)
//! - MAX6675 thermocouple converter
//! - Push button on a GPIO input
//! - HD44780 16x2 character LCD in 4-bit mode

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod heater;
pub mod input;
pub mod sensor;

#[cfg(test)]
pub(crate) mod mock;
