//! Windowed PID duty-cycle controller
//!
//! The heater is a relay, so the controller does time-proportioning: at
//! the start of each window it computes how long the relay stays closed,
//! holds that ON-time for the whole window, and keeps the relay on for the
//! first `output_ms` milliseconds of the window.
//!
//! Integer math only. Temperatures are tenths of a degree, times are
//! milliseconds, and the integral is accumulated in tenths-of-a-degree
//! times milliseconds.
//!
//! The control law computes ON-time per *base* window. Close to the
//! setpoint the effective window shrinks (down to the configured floor)
//! for finer duty resolution, and the ON-time is scaled with it so the duty
//! fraction is unchanged.

use crate::config::{ControlConfig, PidGains};
use crate::traits::SensorError;

/// Integral units per °C·s (tenths of a degree × ms)
const INTEGRAL_SCALE: i64 = 10 * 1000;

/// Values of the current control cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidState {
    /// Desired temperature (°C × 10)
    pub set_point_x10: i16,
    /// Last valid measured temperature (°C × 10)
    pub measured_x10: i16,
    /// Heater ON-time within the current window (ms)
    pub output_ms: u32,
}

/// Time-proportioning PID controller
#[derive(Debug, Clone)]
pub struct WindowedPid {
    gains: PidGains,
    sweet_spot_x10: i16,
    floor_ms: u32,
    max_ms: u32,
    /// Operator-configured window
    base_ms: u32,
    /// Window currently in use
    window_ms: u32,
    window_start_ms: u32,
    integral: i64,
    /// False until the first window after a reset has been computed
    primed: bool,
    state: PidState,
}

impl WindowedPid {
    /// Create a controller from the loop tunables
    pub fn new(config: &ControlConfig) -> Self {
        let base_ms = config
            .window_ms
            .clamp(config.window_floor_ms, config.window_max_ms);
        Self {
            gains: config.gains,
            sweet_spot_x10: config.sweet_spot_x10(),
            floor_ms: config.window_floor_ms,
            max_ms: config.window_max_ms,
            base_ms,
            window_ms: base_ms,
            window_start_ms: 0,
            integral: 0,
            primed: false,
            state: PidState::default(),
        }
    }

    /// Values of the current control cycle
    pub fn state(&self) -> &PidState {
        &self.state
    }

    /// ON-time within the current window (ms)
    pub fn output_ms(&self) -> u32 {
        self.state.output_ms
    }

    /// Effective window size (ms)
    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }

    /// Operator-configured window size (ms)
    pub fn base_window_ms(&self) -> u32 {
        self.base_ms
    }

    /// Start of the current window (ms)
    pub fn window_start_ms(&self) -> u32 {
        self.window_start_ms
    }

    /// Change the configured window
    ///
    /// A longer window takes effect at the next window boundary.
    pub fn set_base_window(&mut self, window_ms: u32) {
        self.base_ms = window_ms.clamp(self.floor_ms, self.max_ms);
        self.window_ms = self.window_ms.min(self.base_ms);
        self.state.output_ms = self.state.output_ms.min(self.window_ms);
    }

    /// Clear the accumulated state and start a fresh window at `now_ms`
    pub fn reset(&mut self, now_ms: u32) {
        self.integral = 0;
        self.primed = false;
        self.window_ms = self.base_ms;
        self.window_start_ms = now_ms;
        self.state.output_ms = 0;
    }

    /// Force the output to zero for the rest of the window
    pub fn force_off(&mut self) {
        self.state.output_ms = 0;
    }

    /// Whether the heater should be on at `now_ms`
    pub fn is_on(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.window_start_ms) < self.state.output_ms
    }

    /// Run one control tick
    ///
    /// Recomputes the ON-time when a window has elapsed (or right after a
    /// reset) and returns the heater command for `now_ms`. An invalid reading
    /// forces the output to zero.
    pub fn update(
        &mut self,
        now_ms: u32,
        set_point_x10: i16,
        measured: Result<i16, SensorError>,
    ) -> bool {
        let measured_x10 = match measured {
            Ok(t) => t,
            Err(_) => {
                self.force_off();
                return false;
            }
        };

        self.state.set_point_x10 = set_point_x10;
        self.state.measured_x10 = measured_x10;

        let elapsed = now_ms.wrapping_sub(self.window_start_ms);
        if !self.primed || elapsed >= self.window_ms {
            // The first window is integrated as if the current error had
            // persisted for a whole window.
            let dt_ms = if self.primed {
                elapsed.min(self.max_ms)
            } else {
                self.base_ms
            };
            self.window_start_ms = now_ms;
            self.primed = true;

            let error_x10 = set_point_x10 as i64 - measured_x10 as i64;
            self.adapt_window(error_x10);
            self.state.output_ms = self.compute(error_x10, dt_ms as i64);
        }

        self.is_on(now_ms)
    }

    /// Shrink the window near the setpoint, restore it away from it
    fn adapt_window(&mut self, error_x10: i64) {
        let band = self.sweet_spot_x10 as i64;
        let distance = error_x10.abs();

        if distance <= band {
            self.window_ms = (self.window_ms / 2).max(self.floor_ms);
        } else if distance > 2 * band {
            self.window_ms = self.base_ms;
        }
    }

    /// ON-time for the window that starts now
    fn compute(&mut self, error_x10: i64, dt_ms: i64) -> u32 {
        let kp = self.gains.kp as i64;
        let ki = self.gains.ki as i64;
        let km = self.gains.km as i64;
        let base = self.base_ms as i64;

        // Anti-windup: the integral alone may never ask for more than the
        // largest window.
        let limit = if ki * km > 0 {
            self.max_ms as i64 * INTEGRAL_SCALE / (ki * km)
        } else {
            0
        };
        let candidate = (self.integral + error_x10 * dt_ms).clamp(-limit, limit);

        let raw = km * (kp * error_x10 / 10 + ki * candidate / INTEGRAL_SCALE);

        // Hold the integral while saturated in the direction of the error
        let saturated = (raw > base && error_x10 > 0) || (raw < 0 && error_x10 < 0);
        if !saturated {
            self.integral = candidate;
        }

        let on_base = raw.clamp(0, base);
        (on_base * self.window_ms as i64 / base) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PID_WINDOW_FLOOR_MS, PID_WINDOW_MAX_MS, PID_WINDOW_MS};
    use proptest::prelude::*;

    fn config(kp: u16, ki: u16, km: u16) -> ControlConfig {
        ControlConfig {
            gains: PidGains { kp, ki, km },
            ..Default::default()
        }
    }

    #[test]
    fn test_cold_plate_heats_in_first_window() {
        let mut pid = WindowedPid::new(&ControlConfig::default());
        pid.reset(0);

        // 150°C target, 25°C plate: 125°C × 5 s × 5 ms/(°C·s) = 3125 ms
        assert!(pid.update(0, 1500, Ok(250)));
        assert_eq!(pid.output_ms(), 3125);
        assert_eq!(pid.window_ms(), PID_WINDOW_MS);
    }

    #[test]
    fn test_output_held_within_window() {
        let mut pid = WindowedPid::new(&ControlConfig::default());
        pid.reset(0);
        pid.update(0, 1500, Ok(250));
        let output = pid.output_ms();

        let mut on_ticks = 0;
        for now in (200..PID_WINDOW_MS).step_by(200) {
            // Measurement changes must not alter the ON-time mid-window
            if pid.update(now, 1500, Ok(1400)) {
                on_ticks += 1;
            }
            assert_eq!(pid.output_ms(), output);
        }
        // on for [0, 3125): ticks 200..=3000
        assert_eq!(on_ticks, 15);
        assert!(!pid.is_on(3200));
    }

    #[test]
    fn test_recompute_at_window_boundary() {
        let mut pid = WindowedPid::new(&ControlConfig::default());
        pid.reset(0);
        pid.update(0, 1500, Ok(250));
        pid.update(PID_WINDOW_MS, 1500, Ok(250));
        assert_eq!(pid.window_start_ms(), PID_WINDOW_MS);
        // Integral doubled, output saturates at the window
        assert_eq!(pid.output_ms(), PID_WINDOW_MS);
    }

    #[test]
    fn test_overshoot_gives_zero_duty() {
        let mut pid = WindowedPid::new(&config(20, 0, 1));
        pid.reset(0);
        assert!(!pid.update(0, 1500, Ok(1600)));
        assert_eq!(pid.output_ms(), 0);
    }

    #[test]
    fn test_proportional_term() {
        let mut pid = WindowedPid::new(&config(20, 0, 1));
        pid.reset(0);
        // 20 ms/°C × 50°C
        pid.update(0, 1500, Ok(1000));
        assert_eq!(pid.output_ms(), 1000);
    }

    #[test]
    fn test_invalid_reading_forces_off() {
        let mut pid = WindowedPid::new(&ControlConfig::default());
        pid.reset(0);
        assert!(pid.update(0, 1500, Ok(250)));
        assert!(!pid.update(200, 1500, Err(SensorError::OpenCircuit)));
        assert_eq!(pid.output_ms(), 0);
        // Last valid measurement is kept
        assert_eq!(pid.state().measured_x10, 250);
    }

    #[test]
    fn test_window_shrinks_near_setpoint() {
        let mut pid = WindowedPid::new(&ControlConfig::default());
        pid.reset(0);
        let mut now = 0;
        let mut windows = std::vec::Vec::new();
        for _ in 0..5 {
            pid.update(now, 1500, Ok(1490));
            windows.push(pid.window_ms());
            now += pid.window_ms();
        }
        assert_eq!(windows, [2_500, 1_250, 1_000, 1_000, 1_000]);

        // Far from the setpoint the base window comes back
        pid.update(now, 1500, Ok(1000));
        assert_eq!(pid.window_ms(), PID_WINDOW_MS);
    }

    #[test]
    fn test_shrunk_window_keeps_duty_fraction() {
        let mut pid = WindowedPid::new(&config(100, 0, 1));
        pid.reset(0);
        // 2°C below: 200 ms per 5 s base window = 4 %
        pid.update(0, 1500, Ok(1480));
        assert_eq!(pid.window_ms(), 2_500);
        assert_eq!(pid.output_ms(), 100);
    }

    #[test]
    fn test_integral_windup_is_bounded() {
        let mut pid = WindowedPid::new(&ControlConfig::default());
        pid.reset(0);
        let mut now = 0;
        // A plate that never heats keeps the controller saturated
        for _ in 0..200 {
            pid.update(now, 2450, Ok(250));
            now += PID_WINDOW_MS;
        }
        assert_eq!(pid.output_ms(), PID_WINDOW_MS);

        // Once above the setpoint the output must collapse within a few windows
        let mut windows = 0;
        while pid.output_ms() > 0 {
            pid.update(now, 2450, Ok(2600));
            now += pid.window_ms();
            windows += 1;
            assert!(windows < 10, "integral wound up");
        }
    }

    #[test]
    fn test_base_window_clamped() {
        let mut pid = WindowedPid::new(&ControlConfig::default());
        pid.set_base_window(100_000);
        assert_eq!(pid.base_window_ms(), PID_WINDOW_MAX_MS);
        pid.set_base_window(10);
        assert_eq!(pid.base_window_ms(), PID_WINDOW_FLOOR_MS);
    }

    proptest! {
        #[test]
        fn prop_output_within_window(
            steps in proptest::collection::vec(
                (1u32..8_000, 0i16..3000, 0i16..3000, any::<bool>(), 5_000u32..30_000),
                1..60,
            )
        ) {
            let mut pid = WindowedPid::new(&ControlConfig::default());
            pid.reset(0);
            let mut now = 0u32;
            for (dt, set_point, measured, valid, base) in steps {
                if base % 7 == 0 {
                    pid.set_base_window(base);
                }
                let reading = if valid { Ok(measured) } else { Err(SensorError::OpenCircuit) };
                pid.update(now, set_point, reading);

                prop_assert!(pid.output_ms() <= pid.window_ms());
                prop_assert!(pid.window_ms() >= PID_WINDOW_FLOOR_MS);
                prop_assert!(pid.window_ms() <= PID_WINDOW_MAX_MS);
                if !valid {
                    prop_assert_eq!(pid.output_ms(), 0);
                }
                now = now.wrapping_add(dt);
            }
        }
    }
}
