//! Encoder push button on a GPIO input
//!
//! Sampled once per control tick, so switch bounce shorter than a tick
//! never reaches the hold decoder.

use embedded_hal::digital::InputPin;
use hotplate_core::traits::ButtonSource;

/// Push button
///
/// Active-low by default: the pin is pulled up and the switch pulls it to
/// ground.
pub struct GpioButton<P> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> GpioButton<P> {
    /// Button pulling the pin low when pressed
    pub fn new_active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }

    /// Button pulling the pin high when pressed
    pub fn new_active_high(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }
}

impl<P: InputPin> ButtonSource for GpioButton<P> {
    fn is_pressed(&mut self) -> bool {
        let level = if self.active_low {
            self.pin.is_low()
        } else {
            self.pin.is_high()
        };
        // A failed read counts as released
        level.unwrap_or(false)
    }
}
