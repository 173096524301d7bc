//! Heater output drivers

pub mod relay;

pub use relay::RelayHeater;
