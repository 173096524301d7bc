//! Heater and temperature sensor traits

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Thermocouple disconnected (open circuit)
    OpenCircuit,
    /// Converter saturated at full scale
    OutOfRange,
    /// Bus transfer to the converter failed
    Bus,
}

/// Trait for temperature sensors
///
/// Called once per control tick; implementations must return without
/// blocking for longer than a bus transaction.
pub trait TemperatureSensor {
    /// Read the current temperature in tenths of a degree Celsius
    ///
    /// For example, 45.5°C is returned as 455. An `Err` marks the reading
    /// as invalid and makes the controller fail safe.
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError>;
}

/// Trait for heater output control
///
/// Implementations switch the heating element via a relay or SSR.
pub trait HeaterOutput {
    /// Turn the heater on or off
    fn set_on(&mut self, on: bool);

    /// Check if the heater is currently on
    fn is_on(&self) -> bool;
}
