//! Operator input traits

/// Push switch of the encoder
pub trait ButtonSource {
    /// Sample the switch; true while pressed
    fn is_pressed(&mut self) -> bool;
}
