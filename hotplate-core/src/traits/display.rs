//! Read-only view of the process for rendering

use crate::process::{IdleField, StepAdvance};
use crate::state::{CoolingReason, SystemState};
use crate::traits::SensorError;

/// Everything a display needs to draw one frame
///
/// Built by the controller after each tick. Labels borrow from the
/// `'static` profile catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProcessSnapshot {
    pub system_state: SystemState,
    pub profile_index: u8,
    pub profile_name: &'static str,
    pub step_index: u8,
    pub step_name: &'static str,
    /// Current setpoint (°C × 10)
    pub desired_x10: i16,
    /// Last valid measurement (°C × 10)
    pub measured_x10: Option<i16>,
    /// Set while the latest reading is invalid
    pub sensor_fault: Option<SensorError>,
    pub heater_on: bool,
    /// Heater ON-time in the current window (ms)
    pub output_ms: u32,
    /// Effective PID window (ms)
    pub window_ms: u32,
    /// Operator-configured PID window (ms)
    pub base_window_ms: u32,
    /// Seconds until the current step times out
    pub step_remaining_s: u32,
    pub cooling_reason: Option<CoolingReason>,
    pub last_advance: Option<StepAdvance>,
    /// Setting the rotary encoder changes while idle
    pub edit_field: IdleField,
    pub contrast: u8,
    pub verbosity: u8,
    /// Index of the idle hint currently shown
    pub help_page: u8,
}

/// Consumer of process snapshots
///
/// Implementations must not block the control tick on display completion.
pub trait DisplaySink {
    type Error;

    /// Present a new snapshot
    fn show(&mut self, snapshot: &ProcessSnapshot) -> Result<(), Self::Error>;
}
