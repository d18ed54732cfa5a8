//! Error types for the tone driver and the control loop.

use core::fmt;

/// Errors from [`ToneDriver`](crate::ToneDriver) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneError<E> {
    /// Requested frequency was zero, negative or not finite. Nothing was
    /// changed.
    InvalidFrequency,
    /// The square-wave output rejected the frequency.
    Output(E),
}

// Allow ergonomic `?` propagation from raw output errors.
impl<E> From<E> for ToneError<E> {
    fn from(error: E) -> Self {
        ToneError::Output(error)
    }
}

impl<E: fmt::Debug> fmt::Display for ToneError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ToneError::InvalidFrequency => write!(f, "Invalid tone frequency"),
            ToneError::Output(e) => write!(f, "Tone output error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for ToneError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ToneError::InvalidFrequency => defmt::write!(f, "Invalid tone frequency"),
            ToneError::Output(e) => defmt::write!(f, "Tone output error: {}", e),
        }
    }
}

/// Errors from one [`ControlLoop::step`](crate::ControlLoop::step).
///
/// Generic over the ADC error `A` and the tone output error `T`. None of
/// these are fatal; the loop logs them and carries on next period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError<A, T> {
    /// Reading a joystick axis failed.
    Sample(A),
    /// Driving the buzzer failed.
    Tone(ToneError<T>),
}

impl<A, T> From<ToneError<T>> for ControlError<A, T> {
    fn from(error: ToneError<T>) -> Self {
        ControlError::Tone(error)
    }
}

impl<A: fmt::Debug, T: fmt::Debug> fmt::Display for ControlError<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ControlError::Sample(e) => write!(f, "Joystick sample error: {:?}", e),
            ControlError::Tone(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<A: defmt::Format, T: defmt::Format> defmt::Format for ControlError<A, T> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ControlError::Sample(e) => defmt::write!(f, "Joystick sample error: {}", e),
            ControlError::Tone(e) => defmt::write!(f, "{}", e),
        }
    }
}
