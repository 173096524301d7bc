//! Runtime state of the hotplate

use crate::config::{
    profile, ControlConfig, ReflowProfile, ReflowStep, Settings, StepKind, PROFILES,
    STEPS_PER_PROFILE,
};
use crate::control::WindowedPid;
use crate::input::ButtonHold;
use crate::state::{CoolingReason, SystemState};
use crate::traits::SensorError;

/// Ticks between idle hint changes
pub const HELP_STEP_TICKS: u32 = 10;

/// Number of idle hints
pub const HELP_PAGES: u8 = 3;

/// How the last step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepAdvance {
    /// Measured temperature held the band for the required dwell
    AtTemperature,
    /// Step deadline passed first
    Timeout,
}

/// Setting adjusted by the encoder while idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdleField {
    #[default]
    Profile,
    Contrast,
    Window,
}

impl IdleField {
    /// Field selected by the next short press
    pub fn next(self) -> Self {
        match self {
            IdleField::Profile => IdleField::Contrast,
            IdleField::Contrast => IdleField::Window,
            IdleField::Window => IdleField::Profile,
        }
    }
}

/// Aggregate process state
///
/// Exactly one instance exists, owned by the controller. It is written only
/// from the control tick.
#[derive(Debug, Clone)]
pub struct ProcessState {
    pub system_state: SystemState,
    /// State before the current tick, for entry/exit edges
    pub last_state: SystemState,
    pub active_profile_index: u8,
    pub active_step_index: u8,
    /// Current setpoint (°C × 10), zero while idle
    pub desired_x10: i16,
    /// Last valid measurement (°C × 10)
    pub measured_x10: Option<i16>,
    /// Error of the latest reading, if it was invalid
    pub sensor_fault: Option<SensorError>,
    pub step_started_ms: u32,
    /// Step ends here regardless of temperature
    pub step_deadline_ms: u32,
    /// Start of the current uninterrupted stay inside the band
    pub in_band_since_ms: Option<u32>,
    /// RampUp start temperature (°C × 10)
    pub ramp_from_x10: i16,
    pub pid: WindowedPid,
    pub button: ButtonHold,
    /// Last heater command
    pub heater_on: bool,
    pub edit_field: IdleField,
    pub contrast: u8,
    pub verbosity: u8,
    pub help_page: u8,
    pub ticks: u32,
    /// Time since power-up, advanced by the tick period
    pub uptime_ms: u32,
    /// Time of the latest tick
    pub now_ms: u32,
    pub cooling_reason: Option<CoolingReason>,
    pub last_advance: Option<StepAdvance>,
}

impl ProcessState {
    /// Initial state from the tunables and the persisted settings
    pub fn new(config: &ControlConfig, settings: &Settings) -> Self {
        let mut pid = WindowedPid::new(config);
        pid.set_base_window(config.clamp_base_window(settings.window_ms));

        Self {
            system_state: SystemState::Idle,
            last_state: SystemState::Idle,
            active_profile_index: settings.profile_index,
            active_step_index: 0,
            desired_x10: 0,
            measured_x10: None,
            sensor_fault: None,
            step_started_ms: 0,
            step_deadline_ms: 0,
            in_band_since_ms: None,
            ramp_from_x10: 0,
            pid,
            button: ButtonHold::new(),
            heater_on: false,
            edit_field: IdleField::Profile,
            contrast: settings.contrast,
            verbosity: settings.verbosity,
            help_page: 0,
            ticks: 0,
            uptime_ms: 0,
            now_ms: 0,
            cooling_reason: None,
            last_advance: None,
        }
    }

    /// Selected profile
    pub fn active_profile(&self) -> &'static ReflowProfile {
        profile(usize::from(self.active_profile_index)).unwrap_or(&PROFILES[0])
    }

    /// Step being driven (step 0 while idle)
    pub fn active_step(&self) -> &'static ReflowStep {
        let profile = self.active_profile();
        profile
            .step(usize::from(self.active_step_index))
            .unwrap_or(&profile.steps[STEPS_PER_PROFILE - 1])
    }

    pub fn active_profile_name(&self) -> &'static str {
        self.active_profile().name
    }

    pub fn active_step_name(&self) -> &'static str {
        self.active_step().kind.name()
    }

    /// Whether the lifecycle state changed on the latest tick
    pub fn state_changed(&self) -> bool {
        self.system_state != self.last_state
    }

    /// Time spent in the current step (ms)
    pub fn step_elapsed_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.step_started_ms)
    }

    /// Time left before the current step times out (ms)
    pub fn step_remaining_ms(&self, now_ms: u32) -> u32 {
        if !self.system_state.is_running() {
            return 0;
        }
        self.active_step()
            .duration_ms()
            .saturating_sub(self.step_elapsed_ms(now_ms))
    }

    /// Setpoint for the current step at `now_ms`
    ///
    /// RampUp moves linearly from `ramp_from_x10` to the step target over
    /// the step duration; the other kinds hold their target.
    pub fn setpoint_x10(&self, now_ms: u32) -> i16 {
        let step = self.active_step();
        let target = step.temperature_x10();
        let duration = step.duration_ms();

        if step.kind != StepKind::RampUp || duration == 0 {
            return target;
        }

        let elapsed = self.step_elapsed_ms(now_ms).min(duration) as i64;
        let from = self.ramp_from_x10 as i64;
        let span = target as i64 - from;
        (from + span * elapsed / duration as i64) as i16
    }

    /// Enter step `index` of the active profile
    pub(crate) fn enter_step(&mut self, now_ms: u32, index: u8, ramp_from_x10: i16) {
        self.active_step_index = index;
        self.step_started_ms = now_ms;
        self.step_deadline_ms = now_ms.wrapping_add(self.active_step().duration_ms());
        self.in_band_since_ms = None;
        self.ramp_from_x10 = ramp_from_x10;
        self.desired_x10 = self.setpoint_x10(now_ms);
    }

    /// Drop the run bookkeeping
    pub(crate) fn clear_run(&mut self) {
        self.active_step_index = 0;
        self.desired_x10 = 0;
        self.in_band_since_ms = None;
        self.heater_on = false;
        self.pid.force_off();
    }
}
