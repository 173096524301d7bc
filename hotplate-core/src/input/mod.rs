//! Operator input decoding
//!
//! The hotplate has a single push-rotary encoder. The push switch is sampled
//! once per control tick and classified by hold length on release; the
//! rotary phases are decoded separately at a faster rate.

pub mod button;
pub mod encoder;

pub use button::{ButtonHold, Press, LONG_PRESS_BITS, VERY_LONG_PRESS_BITS};
pub use encoder::{QuadratureDecoder, Rotation};
