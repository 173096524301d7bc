//! Reflow profile catalog
//!
//! Profiles are compiled in and never change while the firmware runs, so
//! labels handed to the display are plain `&'static str` borrowed from here.

/// Number of profiles in the catalog
pub const PROFILES_NUM: usize = 3;

/// Steps per profile
pub const STEPS_PER_PROFILE: usize = 4;

/// Maximum profile name length (characters)
pub const MAX_PROFILE_NAME_LEN: usize = 7;

/// Phase of a reflow profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepKind {
    /// Bring the board up to the activation temperature
    Preheat,
    /// Hold while the flux activates and the board equalises
    Soak,
    /// Climb from the soak plateau to the reflow plateau
    RampUp,
    /// Hold above liquidus
    Reflow,
}

impl StepKind {
    /// Label shown on the display
    pub const fn name(self) -> &'static str {
        match self {
            StepKind::Preheat => "Pre-heat",
            StepKind::Soak => "Soak",
            StepKind::RampUp => "Ramp up",
            StepKind::Reflow => "Reflow",
        }
    }

    /// Steps that hold a temperature rather than move towards one
    pub const fn is_plateau(self) -> bool {
        matches!(self, StepKind::Soak | StepKind::Reflow)
    }
}

/// One phase of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReflowStep {
    /// Target temperature (°C)
    pub temperature_c: u16,
    /// Hard time limit for the step (seconds)
    pub duration_s: u16,
    /// Phase
    pub kind: StepKind,
}

impl ReflowStep {
    const fn new(temperature_c: u16, duration_s: u16, kind: StepKind) -> Self {
        Self {
            temperature_c,
            duration_s,
            kind,
        }
    }

    /// Target temperature in tenths of a degree
    pub const fn temperature_x10(&self) -> i16 {
        (self.temperature_c * 10) as i16
    }

    /// Step duration in milliseconds
    pub const fn duration_ms(&self) -> u32 {
        self.duration_s as u32 * 1000
    }
}

/// A named four-step recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReflowProfile {
    /// Display name (at most 7 characters)
    pub name: &'static str,
    /// Pre-heat, soak, ramp-up, reflow in that order
    pub steps: [ReflowStep; STEPS_PER_PROFILE],
}

impl ReflowProfile {
    /// Sum of all step durations (seconds)
    pub fn total_duration_s(&self) -> u32 {
        self.steps.iter().map(|s| s.duration_s as u32).sum()
    }

    /// Step by index
    pub fn step(&self, index: usize) -> Option<&ReflowStep> {
        self.steps.get(index)
    }
}

/// Built-in profiles
pub static PROFILES: [ReflowProfile; PROFILES_NUM] = [
    ReflowProfile {
        name: "SAC305",
        steps: [
            ReflowStep::new(150, 60, StepKind::Preheat),
            ReflowStep::new(180, 90, StepKind::Soak),
            ReflowStep::new(220, 30, StepKind::RampUp),
            ReflowStep::new(245, 45, StepKind::Reflow),
        ],
    },
    ReflowProfile {
        name: "Sn63Pb",
        steps: [
            ReflowStep::new(100, 60, StepKind::Preheat),
            ReflowStep::new(150, 90, StepKind::Soak),
            ReflowStep::new(183, 30, StepKind::RampUp),
            ReflowStep::new(215, 30, StepKind::Reflow),
        ],
    },
    ReflowProfile {
        name: "Sn42Bi",
        steps: [
            ReflowStep::new(90, 60, StepKind::Preheat),
            ReflowStep::new(130, 90, StepKind::Soak),
            ReflowStep::new(158, 30, StepKind::RampUp),
            ReflowStep::new(175, 30, StepKind::Reflow),
        ],
    },
];

/// Look up a profile by catalog index
pub fn profile(index: usize) -> Option<&'static ReflowProfile> {
    PROFILES.get(index)
}
