//! Hardware abstraction traits
//!
//! These traits define the interface between the process controller
//! and hardware-specific implementations.

pub mod display;
pub mod heater;
pub mod input;

pub use display::{DisplaySink, ProcessSnapshot};
pub use heater::{HeaterOutput, SensorError, TemperatureSensor};
pub use input::ButtonSource;
