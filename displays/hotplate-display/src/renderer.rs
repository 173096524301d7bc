//! Process renderer
//!
//! Lays out a [`ProcessSnapshot`] on the 16x2 screen:
//!
//! ```text
//! Idle         SAC305   25.0C
//!              Hold: start
//! Running      Pre-heat  58s *
//!               25.0/ 150.0C
//! Cooling      Cool: Done    T
//!              201.5C  Click:ok
//! ```
//!
//! `T` marks a step that ended on its timeout rather than at temperature:
//! the previous step while running, the reflow step once done.

use core::convert::Infallible;
use core::fmt::Write;

use heapless::String;
use hotplate_core::process::{IdleField, StepAdvance};
use hotplate_core::state::{CoolingReason, SystemState};
use hotplate_core::traits::{DisplaySink, ProcessSnapshot};

use crate::screen::Screen;

/// Idle hints, cycled by the help stepper
const HINTS: [&str; 3] = ["Turn: profile", "Hold: start", "Click: settings"];

/// Column of the timeout marker on the top line
const TIMEOUT_COL: usize = 14;

/// Line scratch buffer, longer than a row so formatting never fails early
type Line = String<32>;

/// Renders snapshots into a [`Screen`]
#[derive(Default)]
pub struct Renderer {
    screen: Screen,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Lay out a snapshot
    pub fn render(&mut self, snapshot: &ProcessSnapshot) {
        let (top, bottom) = match snapshot.system_state {
            SystemState::Idle => idle_lines(snapshot),
            SystemState::InProcess => running_lines(snapshot),
            SystemState::Cooling => cooling_lines(snapshot),
        };
        self.screen.set_line(0, &top);
        self.screen.set_line(1, &bottom);
    }
}

impl DisplaySink for Renderer {
    type Error = Infallible;

    fn show(&mut self, snapshot: &ProcessSnapshot) -> Result<(), Infallible> {
        self.render(snapshot);
        Ok(())
    }
}

fn idle_lines(s: &ProcessSnapshot) -> (Line, Line) {
    let mut top = Line::new();
    let _ = write!(top, "{:<8}{:>8}", s.profile_name, Temperature::of(s));

    let mut bottom = Line::new();
    let _ = match s.edit_field {
        IdleField::Profile => {
            let hint = HINTS[usize::from(s.help_page) % HINTS.len()];
            bottom.push_str(hint).map_err(|_| core::fmt::Error)
        }
        IdleField::Contrast => write!(bottom, "Contrast {:>7}", s.contrast),
        IdleField::Window => write!(bottom, "Window {:>8}s", s.base_window_ms / 1000),
    };

    (top, bottom)
}

fn running_lines(s: &ProcessSnapshot) -> (Line, Line) {
    let mut top = Line::new();
    let advance = if timed_out(s) { 'T' } else { ' ' };
    let heater = if s.heater_on { '*' } else { ' ' };
    let _ = write!(
        top,
        "{:<9}{:>4}s{}{}",
        s.step_name, s.step_remaining_s, advance, heater
    );

    let mut bottom = Line::new();
    if s.verbosity == 0 {
        let _ = write!(
            bottom,
            "{:>6}/{:>6}C",
            Tenths(s.measured_x10),
            Tenths(Some(s.desired_x10))
        );
    } else {
        let _ = write!(bottom, "{:>5}/{:<5}ms", s.output_ms, s.window_ms);
    }

    (top, bottom)
}

fn cooling_lines(s: &ProcessSnapshot) -> (Line, Line) {
    let mut top = Line::new();
    let reason = s.cooling_reason.map_or("", |r| r.label());
    let _ = write!(top, "Cool: {}", reason);
    if s.cooling_reason == Some(CoolingReason::Completed) && timed_out(s) {
        while top.len() < TIMEOUT_COL {
            let _ = top.push(' ');
        }
        let _ = top.push('T');
    }

    let mut bottom = Line::new();
    let _ = write!(bottom, "{:<8}Click:ok", Temperature::of(s));

    (top, bottom)
}

fn timed_out(s: &ProcessSnapshot) -> bool {
    s.last_advance == Some(StepAdvance::Timeout)
}

/// Tenths of a degree as `123.4`, or `---` when unknown
struct Tenths(Option<i16>);

impl core::fmt::Display for Tenths {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut buf: String<8> = String::new();
        match self.0 {
            Some(t) => {
                let t = i32::from(t);
                let sign = if t < 0 { "-" } else { "" };
                let _ = write!(buf, "{}{}.{}", sign, t.abs() / 10, t.abs() % 10);
            }
            None => {
                let _ = buf.push_str("---");
            }
        }
        f.pad(&buf)
    }
}

/// Measured temperature with unit, or a fault marker
struct Temperature {
    value: Option<i16>,
    fault: bool,
}

impl Temperature {
    fn of(s: &ProcessSnapshot) -> Self {
        Self {
            value: s.measured_x10,
            fault: s.sensor_fault.is_some(),
        }
    }
}

impl core::fmt::Display for Temperature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut buf: String<10> = String::new();
        if self.fault {
            let _ = buf.push_str("TC ERR");
        } else {
            let _ = write!(buf, "{}C", Tenths(self.value));
        }
        f.pad(&buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotplate_core::config::{ControlConfig, Settings};
    use hotplate_core::process::{ProcessController, TickInput};
    use hotplate_core::state::Event;
    use hotplate_core::traits::SensorError;

    fn controller() -> ProcessController {
        ProcessController::new(ControlConfig::default(), Settings::default())
    }

    fn tick(ctl: &mut ProcessController, now: u32, reading: Result<i16, SensorError>) {
        ctl.tick(
            now,
            TickInput {
                pressed: false,
                reading,
                detents: 0,
            },
        );
    }

    fn rendered(ctl: &ProcessController) -> Renderer {
        let mut renderer = Renderer::new();
        ctl.render(&mut renderer).unwrap();
        renderer
    }

    #[test]
    fn test_idle_screen() {
        let mut ctl = controller();
        tick(&mut ctl, 200, Ok(250));
        let r = rendered(&ctl);
        assert_eq!(r.screen().get_line(0), Some("SAC305     25.0C"));
        assert_eq!(r.screen().get_line(1), Some("Turn: profile"));
    }

    #[test]
    fn test_idle_shows_sensor_fault() {
        let mut ctl = controller();
        tick(&mut ctl, 200, Err(SensorError::OpenCircuit));
        let r = rendered(&ctl);
        assert_eq!(r.screen().get_line(0), Some("SAC305    TC ERR"));
    }

    #[test]
    fn test_idle_edit_fields() {
        let mut snapshot = controller().snapshot();
        let mut r = Renderer::new();

        snapshot.edit_field = IdleField::Contrast;
        r.render(&snapshot);
        assert_eq!(r.screen().get_line(1), Some("Contrast      96"));

        snapshot.edit_field = IdleField::Window;
        r.render(&snapshot);
        assert_eq!(r.screen().get_line(1), Some("Window        5s"));
    }

    #[test]
    fn test_running_screen() {
        let mut ctl = controller();
        ctl.handle_event(0, Event::Start);
        tick(&mut ctl, 200, Ok(250));

        let r = rendered(&ctl);
        assert_eq!(r.screen().get_line(0), Some("Pre-heat   60s *"));
        assert_eq!(r.screen().get_line(1), Some("  25.0/ 150.0C"));

        let mut snapshot = ctl.snapshot();
        snapshot.verbosity = 1;
        let mut r = Renderer::new();
        r.render(&snapshot);
        assert_eq!(r.screen().get_line(1), Some(" 3125/5000 ms"));
    }

    #[test]
    fn test_cooling_screen() {
        let mut ctl = controller();
        ctl.handle_event(0, Event::Start);
        tick(&mut ctl, 200, Ok(2015));
        ctl.handle_event(400, Event::Abort);

        let snapshot = ctl.snapshot();
        assert_eq!(snapshot.cooling_reason, Some(CoolingReason::Aborted));
        let r = rendered(&ctl);
        assert_eq!(r.screen().get_line(0), Some("Cool: Aborted"));
        assert_eq!(r.screen().get_line(1), Some("201.5C  Click:ok"));
    }

    /// Soak step just entered, heater off
    fn soak_snapshot(last_advance: StepAdvance) -> ProcessSnapshot {
        let mut snapshot = controller().snapshot();
        snapshot.system_state = SystemState::InProcess;
        snapshot.step_index = 1;
        snapshot.step_name = "Soak";
        snapshot.step_remaining_s = 90;
        snapshot.heater_on = false;
        snapshot.last_advance = Some(last_advance);
        snapshot
    }

    #[test]
    fn test_running_screen_marks_timeout() {
        let mut r = Renderer::new();

        r.render(&soak_snapshot(StepAdvance::AtTemperature));
        assert_eq!(r.screen().get_line(0), Some("Soak       90s  "));

        r.render(&soak_snapshot(StepAdvance::Timeout));
        assert_eq!(r.screen().get_line(0), Some("Soak       90sT "));

        let mut heating = soak_snapshot(StepAdvance::Timeout);
        heating.heater_on = true;
        r.render(&heating);
        assert_eq!(r.screen().get_line(0), Some("Soak       90sT*"));
    }

    #[test]
    fn test_cooling_screen_marks_timed_out_completion() {
        let mut snapshot = soak_snapshot(StepAdvance::AtTemperature);
        snapshot.system_state = SystemState::Cooling;
        snapshot.cooling_reason = Some(CoolingReason::Completed);
        let mut r = Renderer::new();

        r.render(&snapshot);
        assert_eq!(r.screen().get_line(0), Some("Cool: Done"));

        snapshot.last_advance = Some(StepAdvance::Timeout);
        r.render(&snapshot);
        assert_eq!(r.screen().get_line(0), Some("Cool: Done    T"));

        snapshot.cooling_reason = Some(CoolingReason::Aborted);
        r.render(&snapshot);
        assert_eq!(r.screen().get_line(0), Some("Cool: Aborted"));
    }

    #[test]
    fn test_negative_tenths() {
        let mut buf: String<16> = String::new();
        write!(buf, "{}", Tenths(Some(-5))).unwrap();
        assert_eq!(buf.as_str(), "-0.5");
        buf.clear();
        write!(buf, "{:>5}", Tenths(None)).unwrap();
        assert_eq!(buf.as_str(), "  ---");
    }
}
