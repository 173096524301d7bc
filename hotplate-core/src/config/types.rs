//! Control loop tunables
//!
//! Defaults mirror the values the hotplate shipped with. Everything that the
//! control loop reads at runtime is grouped in [`ControlConfig`].

/// Control loop period (ms)
pub const TIME_INCREMENT_MS: u32 = 200;

/// Initial PID evaluation window (ms)
pub const PID_WINDOW_MS: u32 = 5_000;

/// Upper bound for the PID evaluation window (ms)
pub const PID_WINDOW_MAX_MS: u32 = 30_000;

/// Smallest window the controller shrinks to near the setpoint (ms)
pub const PID_WINDOW_FLOOR_MS: u32 = 1_000;

/// Step used when the operator adjusts the base window (ms)
pub const PID_WINDOW_STEP_MS: u32 = 1_000;

/// Tolerance band considered "at target" (°C)
pub const SWEET_SPOT_C: i16 = 3;

/// Plate temperature considered safe to handle after a run (°C)
pub const SAFE_HANDLING_C: i16 = 50;

/// Proportional gain (ms of ON-time per °C of error)
pub const PID_KP: u16 = 0;

/// Integral gain (ms of ON-time per °C·s of accumulated error)
pub const PID_KI: u16 = 5;

/// Output multiplier applied to the summed terms
pub const PID_KM: u16 = 1;

/// Share of a plateau step's duration that must be spent inside the band (%)
pub const PLATEAU_DWELL_PERCENT: u8 = 50;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick period is zero
    ZeroTick,
    /// Window bounds are not ordered floor <= base <= max
    WindowOrder,
    /// Window floor is shorter than one tick
    WindowBelowTick,
    /// Dwell percentage above 100
    DwellPercent,
    /// Sweet spot must be positive
    SweetSpot,
}

/// PID gains
///
/// Integer gains keep the controller free of floating point on Cortex-M0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidGains {
    /// Proportional gain (ms per °C)
    pub kp: u16,
    /// Integral gain (ms per °C·s)
    pub ki: u16,
    /// Output multiplier
    pub km: u16,
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            kp: PID_KP,
            ki: PID_KI,
            km: PID_KM,
        }
    }
}

/// Runtime tunables for the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlConfig {
    /// Period between controller ticks (ms)
    pub tick_ms: u32,
    /// Base PID window (ms), operator adjustable
    pub window_ms: u32,
    /// Upper bound for the base window (ms)
    pub window_max_ms: u32,
    /// Lower bound for the effective window (ms)
    pub window_floor_ms: u32,
    /// At-target tolerance (°C)
    pub sweet_spot_c: i16,
    /// Cooling ends below this temperature (°C)
    pub safe_handling_c: i16,
    /// PID gains
    pub gains: PidGains,
    /// Required in-band time for Soak and Reflow, as % of the step duration
    pub plateau_dwell_percent: u8,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tick_ms: TIME_INCREMENT_MS,
            window_ms: PID_WINDOW_MS,
            window_max_ms: PID_WINDOW_MAX_MS,
            window_floor_ms: PID_WINDOW_FLOOR_MS,
            sweet_spot_c: SWEET_SPOT_C,
            safe_handling_c: SAFE_HANDLING_C,
            gains: PidGains::default(),
            plateau_dwell_percent: PLATEAU_DWELL_PERCENT,
        }
    }
}

impl ControlConfig {
    /// Check that the tunables are consistent with each other
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if self.window_floor_ms > self.window_ms || self.window_ms > self.window_max_ms {
            return Err(ConfigError::WindowOrder);
        }
        if self.window_floor_ms < self.tick_ms {
            return Err(ConfigError::WindowBelowTick);
        }
        if self.plateau_dwell_percent > 100 {
            return Err(ConfigError::DwellPercent);
        }
        if self.sweet_spot_c <= 0 {
            return Err(ConfigError::SweetSpot);
        }
        Ok(())
    }

    /// Sweet spot in tenths of a degree
    pub fn sweet_spot_x10(&self) -> i16 {
        self.sweet_spot_c.saturating_mul(10)
    }

    /// Safe handling temperature in tenths of a degree
    pub fn safe_handling_x10(&self) -> i16 {
        self.safe_handling_c.saturating_mul(10)
    }

    /// Clamp a requested base window into the operator-adjustable range
    pub fn clamp_base_window(&self, window_ms: u32) -> u32 {
        window_ms.clamp(PID_WINDOW_MS.min(self.window_max_ms), self.window_max_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ControlConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_window_order_rejected() {
        let config = ControlConfig {
            window_ms: PID_WINDOW_MAX_MS + 1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WindowOrder));

        let config = ControlConfig {
            window_floor_ms: 6_000,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WindowOrder));
    }

    #[test]
    fn test_floor_below_tick_rejected() {
        let config = ControlConfig {
            window_floor_ms: 100,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WindowBelowTick));
    }

    #[test]
    fn test_clamp_base_window() {
        let config = ControlConfig::default();
        assert_eq!(config.clamp_base_window(1_000), PID_WINDOW_MS);
        assert_eq!(config.clamp_base_window(12_000), 12_000);
        assert_eq!(config.clamp_base_window(60_000), PID_WINDOW_MAX_MS);
    }
}
