//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Operator events
    /// Run the selected profile (long press in idle)
    Start,
    /// Stop the run and let the plate cool (long press while running)
    Abort,
    /// Return to idle from anywhere (very long press)
    Reset,
    /// Dismiss the cooling screen
    Acknowledge,

    // Process events
    /// Reflow step finished
    ProfileComplete,
    /// Thermocouple reading invalid
    SensorFault,
    /// Plate is below the safe handling temperature
    CooledDown,
}

impl Event {
    /// Check if this event is a fault
    pub fn is_fault(&self) -> bool {
        matches!(self, Event::SensorFault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_sensor_fault_is_a_fault() {
        assert!(Event::SensorFault.is_fault());
        assert!(!Event::Abort.is_fault());
        assert!(!Event::ProfileComplete.is_fault());
        assert!(!Event::CooledDown.is_fault());
    }
}
