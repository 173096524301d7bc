//! Operator input drivers

pub mod button;

pub use button::GpioButton;
