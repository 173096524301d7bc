//! Per-tick process controller
//!
//! Each tick runs, in order:
//!
//! 1. Sample the button into the hold decoder and record the reading
//! 2. Turn a completed press or encoder detents into an operator action
//! 3. Advance the lifecycle: drive the current step while running, watch
//!    the plate temperature while cooling
//! 4. Decide the heater command
//!
//! At most one lifecycle transition happens per tick. When an operator
//! action changes the state, process evaluation resumes on the next tick.

use crate::config::{
    ControlConfig, Settings, CONTRAST_STEP, PID_WINDOW_STEP_MS, PROFILES_NUM, STEPS_PER_PROFILE,
    VERBOSITY_MAX,
};
use crate::input::Press;
use crate::state::{CoolingReason, Event, SystemState};
use crate::traits::{
    ButtonSource, DisplaySink, HeaterOutput, ProcessSnapshot, SensorError, TemperatureSensor,
};

use super::context::{IdleField, ProcessState, StepAdvance, HELP_PAGES, HELP_STEP_TICKS};

/// Times a failed settings write is offered again before giving up
pub const SAVE_RETRIES: u8 = 3;

/// Samples gathered for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickInput {
    /// Button level this tick
    pub pressed: bool,
    /// Thermocouple reading (°C × 10)
    pub reading: Result<i16, SensorError>,
    /// Net encoder detents since the previous tick
    pub detents: i8,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutput {
    /// Heater command
    pub heater_on: bool,
    /// Lifecycle event applied this tick
    pub event: Option<Event>,
    /// Settings to persist
    pub save: Option<Settings>,
}

/// Process controller
pub struct ProcessController {
    config: ControlConfig,
    /// Last settings handed out for persisting
    settings: Settings,
    state: ProcessState,
    /// A failed write is waiting to be offered again
    retry_save: bool,
    save_retries: u8,
}

impl ProcessController {
    /// Create a controller in idle
    pub fn new(config: ControlConfig, mut settings: Settings) -> Self {
        settings.sanitize();
        let state = ProcessState::new(&config, &settings);
        Self {
            config,
            settings,
            state,
            retry_save: false,
            save_retries: 0,
        }
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn state(&self) -> &ProcessState {
        &self.state
    }

    /// Settings as last handed out for persisting
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one control tick
    pub fn tick(&mut self, now_ms: u32, input: TickInput) -> TickOutput {
        let mut out = TickOutput::default();

        {
            let st = &mut self.state;
            st.last_state = st.system_state;
            st.now_ms = now_ms;
            st.ticks = st.ticks.wrapping_add(1);
            st.uptime_ms = st.uptime_ms.wrapping_add(self.config.tick_ms);

            match input.reading {
                Ok(t) => {
                    st.measured_x10 = Some(t);
                    st.sensor_fault = None;
                }
                Err(e) => st.sensor_fault = Some(e),
            }

            st.button.sample(input.pressed);
        }

        if let Some(press) = self.state.button.press() {
            out.event = self.on_press(now_ms, press, &mut out.save);
        }
        if input.detents != 0 {
            self.on_rotate(input.detents);
        }

        if out.event.is_none() {
            out.event = match self.state.system_state {
                SystemState::Idle => {
                    self.step_help();
                    None
                }
                SystemState::InProcess => self.run_step(now_ms, input.reading),
                SystemState::Cooling => self.watch_cooling(now_ms, input.reading),
            };
        }

        if self.retry_save && out.save.is_none() && self.state.system_state == SystemState::Idle {
            self.retry_save = false;
            out.save = Some(self.settings);
        }

        if !self.state.system_state.heater_allowed() {
            self.state.pid.force_off();
            self.state.heater_on = false;
        }
        out.heater_on = self.state.heater_on;
        out
    }

    /// Sample the collaborators, run a tick and drive the heater
    pub fn poll<S, B, H>(
        &mut self,
        now_ms: u32,
        sensor: &mut S,
        button: &mut B,
        heater: &mut H,
        detents: i8,
    ) -> TickOutput
    where
        S: TemperatureSensor,
        B: ButtonSource,
        H: HeaterOutput,
    {
        let input = TickInput {
            pressed: button.is_pressed(),
            reading: sensor.read_celsius_x10(),
            detents,
        };
        let out = self.tick(now_ms, input);
        heater.set_on(out.heater_on);
        out
    }

    /// Apply a lifecycle event
    ///
    /// Returns the event if it was accepted in the current state.
    pub fn handle_event(&mut self, now_ms: u32, event: Event) -> Option<Event> {
        let current = self.state.system_state;
        let next = current.transition(event);
        if next == current && event != Event::Reset {
            return None;
        }

        let st = &mut self.state;
        st.system_state = next;

        match event {
            Event::Start => {
                st.cooling_reason = None;
                st.last_advance = None;
                st.pid.reset(now_ms);
                let from = st.measured_x10.unwrap_or(0);
                st.enter_step(now_ms, 0, from);
            }
            Event::Abort | Event::ProfileComplete | Event::SensorFault => {
                st.cooling_reason = CoolingReason::from_event(event);
                st.heater_on = false;
                st.pid.force_off();
            }
            Event::CooledDown | Event::Acknowledge => {
                st.clear_run();
            }
            Event::Reset => {
                st.clear_run();
                st.cooling_reason = None;
            }
        }

        Some(event)
    }

    /// Report that persisting `record` failed
    ///
    /// The record is offered again from an idle tick, up to [`SAVE_RETRIES`]
    /// times. A record already superseded by a newer one is ignored.
    pub fn save_failed(&mut self, record: &Settings) {
        if *record != self.settings || self.save_retries >= SAVE_RETRIES {
            return;
        }
        self.save_retries += 1;
        self.retry_save = true;
    }

    /// Select a profile by catalog index
    ///
    /// Only possible while idle.
    pub fn select_profile(&mut self, index: usize) -> bool {
        if self.state.system_state != SystemState::Idle || index >= PROFILES_NUM {
            return false;
        }
        self.state.active_profile_index = index as u8;
        true
    }

    /// Change the LCD contrast by `delta` steps
    pub fn adjust_contrast(&mut self, delta: i8) {
        let contrast = i16::from(self.state.contrast) + i16::from(delta) * i16::from(CONTRAST_STEP);
        self.state.contrast = contrast.clamp(0, u8::MAX as i16) as u8;
    }

    /// Set the operator-configured PID window
    pub fn set_base_window(&mut self, window_ms: u32) {
        let window_ms = self.config.clamp_base_window(window_ms);
        self.state.pid.set_base_window(window_ms);
    }

    /// Current view for the display
    pub fn snapshot(&self) -> ProcessSnapshot {
        let st = &self.state;
        ProcessSnapshot {
            system_state: st.system_state,
            profile_index: st.active_profile_index,
            profile_name: st.active_profile_name(),
            step_index: st.active_step_index,
            step_name: st.active_step_name(),
            desired_x10: st.desired_x10,
            measured_x10: st.measured_x10,
            sensor_fault: st.sensor_fault,
            heater_on: st.heater_on,
            output_ms: st.pid.output_ms(),
            window_ms: st.pid.window_ms(),
            base_window_ms: st.pid.base_window_ms(),
            step_remaining_s: st.step_remaining_ms(st.now_ms).div_ceil(1000),
            cooling_reason: st.cooling_reason,
            last_advance: st.last_advance,
            edit_field: st.edit_field,
            contrast: st.contrast,
            verbosity: st.verbosity,
            help_page: st.help_page,
        }
    }

    /// Hand the current snapshot to a display
    pub fn render<D: DisplaySink>(&self, display: &mut D) -> Result<(), D::Error> {
        display.show(&self.snapshot())
    }

    /// Settings reflecting the current operator choices
    pub fn current_settings(&self) -> Settings {
        Settings {
            profile_index: self.state.active_profile_index,
            contrast: self.state.contrast,
            verbosity: self.state.verbosity,
            window_ms: self.state.pid.base_window_ms(),
            ..Settings::new()
        }
    }

    fn on_press(&mut self, now_ms: u32, press: Press, save: &mut Option<Settings>) -> Option<Event> {
        if press == Press::VeryLong {
            return self.handle_event(now_ms, Event::Reset);
        }

        match (self.state.system_state, press) {
            (SystemState::Idle, Press::Short) => {
                self.state.edit_field = self.state.edit_field.next();
                *save = self.persist_if_changed();
                None
            }
            (SystemState::Idle, _) => {
                *save = self.persist_if_changed();
                self.handle_event(now_ms, Event::Start)
            }
            (SystemState::InProcess, Press::Short) => {
                self.state.verbosity = (self.state.verbosity + 1) % (VERBOSITY_MAX + 1);
                None
            }
            (SystemState::InProcess, _) => self.handle_event(now_ms, Event::Abort),
            (SystemState::Cooling, _) => self.handle_event(now_ms, Event::Acknowledge),
        }
    }

    fn on_rotate(&mut self, detents: i8) {
        if self.state.system_state != SystemState::Idle {
            return;
        }

        match self.state.edit_field {
            IdleField::Profile => {
                let count = PROFILES_NUM as i16;
                let index = (i16::from(self.state.active_profile_index) + i16::from(detents))
                    .rem_euclid(count);
                self.select_profile(index as usize);
            }
            IdleField::Contrast => self.adjust_contrast(detents),
            IdleField::Window => {
                let step = i64::from(detents) * i64::from(PID_WINDOW_STEP_MS);
                let window = (i64::from(self.state.pid.base_window_ms()) + step).max(0);
                self.set_base_window(window as u32);
            }
        }
    }

    fn persist_if_changed(&mut self) -> Option<Settings> {
        let mut current = self.current_settings();
        let persisted = &self.settings;
        if current.profile_index == persisted.profile_index
            && current.contrast == persisted.contrast
            && current.verbosity == persisted.verbosity
            && current.window_ms == persisted.window_ms
        {
            return None;
        }
        current.update_crc();
        self.settings = current;
        self.retry_save = false;
        self.save_retries = 0;
        Some(current)
    }

    fn step_help(&mut self) {
        if self.state.ticks % HELP_STEP_TICKS == 0 {
            self.state.help_page = (self.state.help_page + 1) % HELP_PAGES;
        }
    }

    /// Drive the active step
    fn run_step(&mut self, now_ms: u32, reading: Result<i16, SensorError>) -> Option<Event> {
        let measured_x10 = match reading {
            Ok(t) => t,
            Err(_) => {
                self.state.pid.force_off();
                self.state.heater_on = false;
                return self.handle_event(now_ms, Event::SensorFault);
            }
        };

        let sweet_spot_x10 = i32::from(self.config.sweet_spot_x10());
        let dwell_percent = u32::from(self.config.plateau_dwell_percent);
        let st = &mut self.state;

        // 1. setpoint
        st.desired_x10 = st.setpoint_x10(now_ms);

        // 2. heater duty
        st.heater_on = st.pid.update(now_ms, st.desired_x10, Ok(measured_x10));

        // 3. step completion
        let step = st.active_step();
        let target_x10 = step.temperature_x10();
        let duration_ms = step.duration_ms();

        let in_band = (i32::from(measured_x10) - i32::from(target_x10)).abs() <= sweet_spot_x10;
        if in_band {
            st.in_band_since_ms.get_or_insert(now_ms);
        } else {
            st.in_band_since_ms = None;
        }

        let dwell_ms = if step.kind.is_plateau() {
            duration_ms / 100 * dwell_percent
        } else {
            0
        };

        let advance = match st.in_band_since_ms {
            Some(since) if now_ms.wrapping_sub(since) >= dwell_ms => {
                Some(StepAdvance::AtTemperature)
            }
            _ if st.step_elapsed_ms(now_ms) >= duration_ms => Some(StepAdvance::Timeout),
            _ => None,
        };

        let how = advance?;
        st.last_advance = Some(how);

        let next = usize::from(st.active_step_index) + 1;
        if next >= STEPS_PER_PROFILE {
            st.heater_on = false;
            return self.handle_event(now_ms, Event::ProfileComplete);
        }

        // 4. labels follow the new index
        st.enter_step(now_ms, next as u8, target_x10);
        None
    }

    fn watch_cooling(&mut self, now_ms: u32, reading: Result<i16, SensorError>) -> Option<Event> {
        match reading {
            Ok(t) if t < self.config.safe_handling_x10() => {
                self.handle_event(now_ms, Event::CooledDown)
            }
            _ => None,
        }
    }
}
