//! Square-wave tone driver.
//!
//! [`ToneDriver`] owns a [`ToneOutput`] (in the firmware, one PWM channel
//! wired to a passive buzzer) and the [`ToneState`] describing it. Two
//! ways of sounding a note are supported:
//!
//! - **Continuous**: [`start()`](ToneDriver::start) /
//!   [`stop()`](ToneDriver::stop). Non-blocking; calling `start` while a
//!   tone is already playing retunes the output in place, without
//!   switching it off, so there is no audible gap between notes.
//! - **Timed**: [`play()`](ToneDriver::play) sounds a note for a fixed
//!   duration, awaiting the supplied delay, then silences.

use embedded_hal_async::delay::DelayNs;

use crate::error::ToneError;

/// Hardware square-wave generator behind the [`ToneDriver`].
pub trait ToneOutput {
    type Error;

    /// Retune the generator. Must not change whether it is enabled.
    fn set_frequency(&mut self, frequency_hz: f32) -> Result<(), Self::Error>;

    /// Start emitting the square wave at the last set frequency.
    fn enable(&mut self);

    /// Silence the output.
    fn disable(&mut self);
}

/// Selects how the control loop sounds each note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneMode {
    /// Hold the tone and retune it every loop iteration.
    #[default]
    Continuous,
    /// Play a fixed-length beep per loop iteration.
    Timed { duration_ms: u32 },
}

/// What the buzzer is currently doing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneState {
    pub is_active: bool,
    /// Last frequency the output was tuned to. Kept after `stop()`.
    pub frequency: f32,
}

/// Start/stop/timed-play control over a [`ToneOutput`].
pub struct ToneDriver<T> {
    output: T,
    state: ToneState,
}

impl<T> ToneDriver<T>
where
    T: ToneOutput,
{
    /// Take ownership of `output` and make sure it is silent.
    pub fn new(mut output: T) -> Self {
        output.disable();
        Self {
            output,
            state: ToneState::default(),
        }
    }

    pub fn state(&self) -> ToneState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    /// Begin, or retune, a continuous tone.
    ///
    /// Retuning to the frequency already playing does not touch the
    /// output.
    ///
    /// # Errors
    ///
    /// * [`ToneError::InvalidFrequency`] for `<= 0`, NaN or infinite
    ///   input; state is unchanged.
    /// * [`ToneError::Output`] if the generator cannot produce the
    ///   frequency; any tone already playing keeps playing.
    pub fn start(&mut self, frequency_hz: f32) -> Result<(), ToneError<T::Error>> {
        validate(frequency_hz)?;

        if self.state.is_active && self.state.frequency == frequency_hz {
            return Ok(());
        }

        self.output.set_frequency(frequency_hz)?;
        if !self.state.is_active {
            self.output.enable();
        }
        self.state = ToneState {
            is_active: true,
            frequency: frequency_hz,
        };
        Ok(())
    }

    /// Silence the tone. No-op when already silent.
    pub fn stop(&mut self) {
        if !self.state.is_active {
            return;
        }
        self.output.disable();
        self.state.is_active = false;
    }

    /// Sound `frequency_hz` for `duration_ms`, then silence.
    ///
    /// Blocks the calling task for the whole duration.
    pub async fn play<D>(
        &mut self,
        frequency_hz: f32,
        duration_ms: u32,
        delay: &mut D,
    ) -> Result<(), ToneError<T::Error>>
    where
        D: DelayNs,
    {
        self.start(frequency_hz)?;
        delay.delay_ms(duration_ms).await;
        self.stop();
        Ok(())
    }

    pub fn output(&self) -> &T {
        &self.output
    }

    /// Give the output back, silenced.
    pub fn release(mut self) -> T {
        self.stop();
        self.output
    }
}

fn validate<E>(frequency_hz: f32) -> Result<(), ToneError<E>> {
    if frequency_hz.is_finite() && frequency_hz > 0.0 {
        Ok(())
    } else {
        Err(ToneError::InvalidFrequency)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
