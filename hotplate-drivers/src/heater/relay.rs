//! Relay heater output
//!
//! Switches the heating element through a relay or SSR on a GPIO pin.

use embedded_hal::digital::OutputPin;
use hotplate_core::traits::HeaterOutput;

/// Relay heater output
///
/// The pin can be configured as active-high (default) or active-low.
pub struct RelayHeater<P> {
    pin: P,
    /// If true, heater ON = pin LOW
    inverted: bool,
    /// Current logical state (true = heater on)
    on: bool,
}

impl<P: OutputPin> RelayHeater<P> {
    /// Create a new relay output
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin driving the relay
    /// - `inverted`: If true, heater is ON when pin is LOW (for active-low relay boards)
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut heater = Self {
            pin,
            inverted,
            on: false,
        };
        // Ensure heater starts off
        heater.set_on(false);
        heater
    }

    /// Create a relay output that closes on a high pin
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a relay output that closes on a low pin
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Release the pin
    pub fn release(mut self) -> P {
        self.set_on(false);
        self.pin
    }
}

impl<P: OutputPin> HeaterOutput for RelayHeater<P> {
    fn set_on(&mut self, on: bool) {
        self.on = on;

        // GPIO writes on the supported boards cannot fail
        let _ = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
