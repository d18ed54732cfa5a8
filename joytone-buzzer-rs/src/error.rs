//! Error types for PWM settings.

use core::fmt;

/// Reasons a frequency cannot be produced by one PWM slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError {
    /// Frequency was zero, negative or not finite.
    InvalidFrequency,
    /// Needs a divider above [`MAX_DIVIDER`](crate::MAX_DIVIDER).
    FrequencyTooLow,
    /// Period would be shorter than [`MIN_WRAP`](crate::MIN_WRAP) ticks.
    FrequencyTooHigh,
}

impl fmt::Display for PwmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PwmError::InvalidFrequency => write!(f, "Invalid PWM frequency"),
            PwmError::FrequencyTooLow => write!(f, "Frequency too low for PWM divider"),
            PwmError::FrequencyTooHigh => write!(f, "Frequency too high for PWM resolution"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PwmError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            PwmError::InvalidFrequency => defmt::write!(f, "Invalid PWM frequency"),
            PwmError::FrequencyTooLow => defmt::write!(f, "Frequency too low"),
            PwmError::FrequencyTooHigh => defmt::write!(f, "Frequency too high"),
        }
    }
}
