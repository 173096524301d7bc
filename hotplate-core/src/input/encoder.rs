//! Rotary encoder decoding
//!
//! Decodes the two quadrature phases of the encoder into detent events.
//! Phases idle high (pull-ups) and a detent is a full low/low excursion;
//! partial excursions are treated as bounce and dropped.

/// One encoder detent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// +1 for clockwise, -1 for counter-clockwise
    pub fn delta(self) -> i8 {
        match self {
            Rotation::Clockwise => 1,
            Rotation::CounterClockwise => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

/// Quadrature decoder state machine
#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    phase: Phase,
    last_a: bool,
    last_b: bool,
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadratureDecoder {
    /// Create a decoder assuming both phases idle high
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            last_a: true,
            last_b: true,
        }
    }

    /// Feed the current phase levels
    ///
    /// Returns a rotation once per completed detent.
    pub fn update(&mut self, a: bool, b: bool) -> Option<Rotation> {
        if a == self.last_a && b == self.last_b {
            return None;
        }
        self.last_a = a;
        self.last_b = b;

        // CW:  A falls first, (1,1) -> (0,1) -> (0,0) -> release
        // CCW: B falls first, (1,1) -> (1,0) -> (0,0) -> release
        match self.phase {
            Phase::Idle => {
                if !a && b {
                    self.phase = Phase::CwStep1;
                } else if a && !b {
                    self.phase = Phase::CcwStep1;
                }
                None
            }
            Phase::CwStep1 | Phase::CcwStep1 => {
                if !a && !b {
                    self.phase = if self.phase == Phase::CwStep1 {
                        Phase::CwStep2
                    } else {
                        Phase::CcwStep2
                    };
                } else if a && b {
                    self.phase = Phase::Idle;
                }
                None
            }
            Phase::CwStep2 | Phase::CcwStep2 => {
                if !(a || b) {
                    return None;
                }
                let rotation = if self.phase == Phase::CwStep2 {
                    Rotation::Clockwise
                } else {
                    Rotation::CounterClockwise
                };
                self.phase = Phase::Idle;
                Some(rotation)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(decoder: &mut QuadratureDecoder, levels: &[(bool, bool)]) -> i8 {
        levels
            .iter()
            .filter_map(|&(a, b)| decoder.update(a, b))
            .map(Rotation::delta)
            .sum()
    }

    const CW: [(bool, bool); 4] = [(false, true), (false, false), (true, false), (true, true)];
    const CCW: [(bool, bool); 4] = [(true, false), (false, false), (false, true), (true, true)];

    #[test]
    fn test_clockwise_detent() {
        let mut decoder = QuadratureDecoder::new();
        assert_eq!(feed(&mut decoder, &CW), 1);
    }

    #[test]
    fn test_counter_clockwise_detent() {
        let mut decoder = QuadratureDecoder::new();
        assert_eq!(feed(&mut decoder, &CCW), -1);
    }

    #[test]
    fn test_several_detents() {
        let mut decoder = QuadratureDecoder::new();
        let mut total = 0;
        for _ in 0..3 {
            total += feed(&mut decoder, &CW);
        }
        total += feed(&mut decoder, &CCW);
        assert_eq!(total, 2);
    }

    #[test]
    fn test_bounce_is_ignored() {
        let mut decoder = QuadratureDecoder::new();
        // A glitches low and back without B following
        let bounce = [(false, true), (true, true), (false, true), (true, true)];
        assert_eq!(feed(&mut decoder, &bounce), 0);
        assert_eq!(feed(&mut decoder, &CW), 1);
    }

    #[test]
    fn test_repeated_levels_ignored() {
        let mut decoder = QuadratureDecoder::new();
        assert_eq!(decoder.update(true, true), None);
        assert_eq!(decoder.update(true, true), None);
    }
}
