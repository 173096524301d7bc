//! Button hold decoder
//!
//! Turns one boolean sample per tick into a hold counter and a one-tick
//! release pulse. While the switch is held the counter grows by one per tick
//! (saturating). On the tick the switch opens, the counter keeps the final
//! hold length and `released` is set; on the following tick both clear.
//!
//! All duration predicates are only meaningful during the release tick.

/// Release after at least 2^3 = 8 ticks (1.6 s at 200 ms) is a long press
pub const LONG_PRESS_BITS: u8 = 3;

/// Release after at least 2^4 = 16 ticks (3.2 s at 200 ms) is a very long press
pub const VERY_LONG_PRESS_BITS: u8 = 4;

/// Press classification reported on release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Press {
    /// Shorter than a long press
    Short,
    /// At least 2^LONG_PRESS_BITS ticks
    Long,
    /// At least 2^VERY_LONG_PRESS_BITS ticks
    VeryLong,
}

/// Hold counter with a one-tick release pulse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonHold {
    count: u8,
    released: bool,
}

impl ButtonHold {
    /// Create a decoder with the button released
    pub const fn new() -> Self {
        Self {
            count: 0,
            released: false,
        }
    }

    /// Feed this tick's sample
    pub fn sample(&mut self, pressed: bool) {
        if self.released {
            self.count = 0;
            self.released = false;
        }

        if pressed {
            self.count = self.count.saturating_add(1);
        } else if self.count > 0 {
            self.released = true;
        }
    }

    /// Ticks the button has been (or was, on the release tick) held
    pub fn count(&self) -> u8 {
        self.count
    }

    /// True only on the tick the button was let go
    pub fn is_release_tick(&self) -> bool {
        self.released
    }

    /// Still pressed and held for at least `ticks` ticks
    pub fn is_held_for(&self, ticks: u8) -> bool {
        !self.released && self.count > 0 && self.count >= ticks
    }

    /// Released this tick after at least 2^n ticks
    pub fn held_at_least(&self, n: u8) -> bool {
        self.released && (self.count as u32) >= pow2(n)
    }

    /// Released this tick with a hold strictly between 2^n and 2^(n+1) ticks
    ///
    /// This is the duration band for `n`, not an inclusive upper bound.
    pub fn held_at_most(&self, n: u8) -> bool {
        let count = self.count as u32;
        self.released && count > pow2(n) && count < pow2(n.saturating_add(1))
    }

    /// Released this tick after any hold
    pub fn was_released(&self) -> bool {
        self.released && self.count > 0
    }

    /// Classify the press on the release tick
    pub fn press(&self) -> Option<Press> {
        if !self.was_released() {
            None
        } else if self.held_at_least(VERY_LONG_PRESS_BITS) {
            Some(Press::VeryLong)
        } else if self.held_at_least(LONG_PRESS_BITS) {
            Some(Press::Long)
        } else {
            Some(Press::Short)
        }
    }
}

/// 2^n, saturating beyond the counter width
fn pow2(n: u8) -> u32 {
    1u32.checked_shl(n as u32).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hold(decoder: &mut ButtonHold, ticks: usize) {
        for _ in 0..ticks {
            decoder.sample(true);
        }
        decoder.sample(false);
    }

    #[test]
    fn test_idle_reports_nothing() {
        let mut decoder = ButtonHold::new();
        for _ in 0..5 {
            decoder.sample(false);
            assert_eq!(decoder.count(), 0);
            assert!(!decoder.was_released());
            assert_eq!(decoder.press(), None);
        }
    }

    #[test]
    fn test_counter_grows_while_held() {
        let mut decoder = ButtonHold::new();
        decoder.sample(true);
        decoder.sample(true);
        decoder.sample(true);
        assert_eq!(decoder.count(), 3);
        assert!(decoder.is_held_for(3));
        assert!(!decoder.is_held_for(4));
        assert!(!decoder.was_released());
    }

    #[test]
    fn test_release_pulse_lasts_one_tick() {
        let mut decoder = ButtonHold::new();
        hold(&mut decoder, 5);
        assert!(decoder.was_released());
        assert_eq!(decoder.count(), 5);
        assert!(!decoder.is_held_for(1));

        decoder.sample(false);
        assert!(!decoder.was_released());
        assert_eq!(decoder.count(), 0);
    }

    #[test]
    fn test_press_right_after_release() {
        let mut decoder = ButtonHold::new();
        hold(&mut decoder, 2);
        decoder.sample(true);
        assert!(!decoder.was_released());
        assert_eq!(decoder.count(), 1);
    }

    #[test]
    fn test_counter_saturates() {
        let mut decoder = ButtonHold::new();
        hold(&mut decoder, 400);
        assert_eq!(decoder.count(), u8::MAX);
        assert!(decoder.held_at_least(7));
        assert!(!decoder.held_at_least(8));
        assert_eq!(decoder.press(), Some(Press::VeryLong));
    }

    #[test]
    fn test_press_classes() {
        let mut decoder = ButtonHold::new();
        hold(&mut decoder, 1);
        assert_eq!(decoder.press(), Some(Press::Short));

        decoder.sample(false);
        hold(&mut decoder, 8);
        assert_eq!(decoder.press(), Some(Press::Long));

        decoder.sample(false);
        hold(&mut decoder, 16);
        assert_eq!(decoder.press(), Some(Press::VeryLong));
    }

    #[test]
    fn test_duration_band() {
        let mut decoder = ButtonHold::new();
        hold(&mut decoder, 5);
        // 4 < 5 < 8
        assert!(decoder.held_at_most(2));
        assert!(!decoder.held_at_most(1));
        assert!(!decoder.held_at_most(3));

        decoder.sample(false);
        hold(&mut decoder, 4);
        // band boundaries are exclusive, 4 sits between bands 1 and 2
        assert!(!decoder.held_at_most(2));
        assert!(!decoder.held_at_most(1));

        decoder.sample(false);
        hold(&mut decoder, 3);
        assert!(decoder.held_at_most(1));
    }

    proptest! {
        #[test]
        fn prop_release_tick_classifies_hold(k in 1usize..300) {
            let mut decoder = ButtonHold::new();
            hold(&mut decoder, k);
            let count = k.min(u8::MAX as usize);

            prop_assert!(decoder.was_released());
            for n in 0u8..10 {
                if (1usize << n) <= count {
                    prop_assert!(decoder.held_at_least(n));
                } else {
                    prop_assert!(!decoder.held_at_least(n));
                }
            }

            decoder.sample(false);
            prop_assert_eq!(decoder.count(), 0);
            prop_assert!(!decoder.was_released());
        }
    }
}
