//! State machine definition
//!
//! Heater permission is a function of the current state alone.

use super::events::Event;

/// Process lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemState {
    /// Waiting for the operator, heater off
    #[default]
    Idle,
    /// Running a profile
    InProcess,
    /// Run over, heater off until the plate is safe to handle
    Cooling,
}

/// Why the process entered cooling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoolingReason {
    /// Reflow step completed
    Completed,
    /// Operator aborted the run
    Aborted,
    /// Thermocouple reading became invalid
    SensorFault,
}

impl CoolingReason {
    /// Cooling reason carried by a transition event, if any
    pub fn from_event(event: Event) -> Option<Self> {
        match event {
            Event::ProfileComplete => Some(Self::Completed),
            Event::Abort => Some(Self::Aborted),
            Event::SensorFault => Some(Self::SensorFault),
            _ => None,
        }
    }

    /// Short label for the display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "Done",
            Self::Aborted => "Aborted",
            Self::SensorFault => "TC fault",
        }
    }
}

impl SystemState {
    /// Check if this state allows heater operation
    pub fn heater_allowed(&self) -> bool {
        matches!(self, SystemState::InProcess)
    }

    /// Check if a profile is being driven
    pub fn is_running(&self) -> bool {
        matches!(self, SystemState::InProcess)
    }

    /// Short label for the display
    pub fn label(&self) -> &'static str {
        match self {
            SystemState::Idle => "Idle",
            SystemState::InProcess => "Run",
            SystemState::Cooling => "Cool",
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use SystemState::*;

        match (self, event) {
            // Reset is always accepted
            (_, Reset) => Idle,

            (Idle, Start) => InProcess,

            (InProcess, ProfileComplete) => Cooling,
            (InProcess, Abort) => Cooling,
            (InProcess, SensorFault) => Cooling,

            (Cooling, CooledDown) => Idle,
            (Cooling, Acknowledge) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [SystemState; 3] = [
        SystemState::Idle,
        SystemState::InProcess,
        SystemState::Cooling,
    ];

    const ALL_EVENTS: [Event; 7] = [
        Event::Start,
        Event::Abort,
        Event::Reset,
        Event::Acknowledge,
        Event::ProfileComplete,
        Event::SensorFault,
        Event::CooledDown,
    ];

    #[test]
    fn test_start_from_idle() {
        assert_eq!(
            SystemState::Idle.transition(Event::Start),
            SystemState::InProcess
        );
    }

    #[test]
    fn test_start_ignored_outside_idle() {
        assert_eq!(
            SystemState::InProcess.transition(Event::Start),
            SystemState::InProcess
        );
        assert_eq!(
            SystemState::Cooling.transition(Event::Start),
            SystemState::Cooling
        );
    }

    #[test]
    fn test_running_exits_to_cooling() {
        for event in [Event::ProfileComplete, Event::Abort, Event::SensorFault] {
            assert_eq!(
                SystemState::InProcess.transition(event),
                SystemState::Cooling
            );
        }
    }

    #[test]
    fn test_cooling_exits_to_idle() {
        for event in [Event::CooledDown, Event::Acknowledge] {
            assert_eq!(SystemState::Cooling.transition(event), SystemState::Idle);
        }
    }

    #[test]
    fn test_reset_from_any_state() {
        for state in ALL_STATES {
            assert_eq!(state.transition(Event::Reset), SystemState::Idle);
        }
    }

    #[test]
    fn test_heater_only_while_running() {
        // Every reachable state other than InProcess keeps the heater off
        for state in ALL_STATES {
            for event in ALL_EVENTS {
                let next = state.transition(event);
                assert_eq!(next.heater_allowed(), next == SystemState::InProcess);
            }
        }
    }

    #[test]
    fn test_cooling_reason_from_event() {
        assert_eq!(
            CoolingReason::from_event(Event::Abort),
            Some(CoolingReason::Aborted)
        );
        assert_eq!(
            CoolingReason::from_event(Event::SensorFault),
            Some(CoolingReason::SensorFault)
        );
        assert_eq!(CoolingReason::from_event(Event::Start), None);
    }
}
