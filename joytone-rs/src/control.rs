//! The joystick → note control loop.
//!
//! [`ControlLoop`] owns the joystick sampler, the [`ToneDriver`] and the
//! optional gate button, and reads the shared [`OctaveState`]. Each
//! iteration ([`step()`](ControlLoop::step)):
//!
//! 1. Polls the gate button. Released → stop the tone, skip sampling.
//! 2. Reads both joystick axes.
//! 3. Maps them to a [`PolarSample`](crate::PolarSample).
//! 4. Inside the dead-zone → stop the tone.
//! 5. Otherwise quantises the angle to a note, applies the octave
//!    offset, looks the frequency up (clamped) and sounds it.
//!
//! [`run()`](ControlLoop::run) repeats this forever, sleeping one full
//! period after every iteration; processing time is not subtracted, so
//! the real rate is at most `update_frequency_hz`.
//!
//! The gate button is polled rather than edge-driven on purpose: it
//! gates the tone at loop cadence, it does not latch.

use core::fmt;

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use crate::error::ControlError;
use crate::notes::{
    self, NoteTable, DEFAULT_BASE_FREQUENCY_HZ, DEFAULT_BASE_OCTAVE, DEFAULT_NOTE_COUNT,
    PITCH_CLASS_C,
};
use crate::octave::OctaveState;
use crate::tone::{ToneDriver, ToneMode, ToneOutput};
use crate::vector::{self, PolarSample};

/// Normalised magnitude the stick must exceed before a note sounds.
pub const DEFAULT_DEAD_ZONE: f32 = 0.45;

/// Control loop rate.
pub const DEFAULT_UPDATE_FREQUENCY_HZ: u32 = 60;

/// Note index played at angle 0 with no octave offset (C4 on the default
/// table).
pub const DEFAULT_BASE_NOTE_OFFSET: i32 = 36;

/// Beep length used by [`ToneMode::Timed`] in [`Features::timed()`].
pub const DEFAULT_TIMED_DURATION_MS: u32 = 150;

// ── Collaborators ────────────────────────────────────────────────────────

/// Joystick axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
}

/// Source of raw 12-bit joystick samples.
///
/// Implementations must be initialised before the first `read`. Values
/// are expected in `[0, 4095]`; larger values are clamped by the mapper.
pub trait AxisReader {
    type Error;

    fn read(&mut self, axis: Axis) -> Result<u16, Self::Error>;
}

// ── Configuration ────────────────────────────────────────────────────────

/// Optional parts of the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Features {
    /// Publish each step to the OLED display task.
    pub display: bool,
    /// Require the gate button to be held for sound.
    pub gate_button: bool,
    pub tone_mode: ToneMode,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            display: true,
            gate_button: true,
            tone_mode: ToneMode::Continuous,
        }
    }
}

impl Features {
    /// The minimal variant: no display, no gate, fixed-length beeps.
    pub fn timed() -> Self {
        Self {
            display: false,
            gate_button: false,
            tone_mode: ToneMode::Timed {
                duration_ms: DEFAULT_TIMED_DURATION_MS,
            },
        }
    }
}

/// Configuration for the control loop.
///
/// [`ControlConfig::default()`] reproduces the hardware design: 60 Hz,
/// 0.45 dead-zone, C1-based 96-note table, stick at 0° plays C4.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlConfig {
    /// Loop rate in Hz. Default: 60.
    pub update_frequency_hz: u32,
    /// Dead-zone threshold on normalised magnitude. Default: 0.45.
    pub dead_zone: f32,
    /// Table index of sector 0 at octave offset 0. Default: 36.
    pub base_note_offset: i32,
    /// Frequency of table index 0. Default: C1, 32.703 Hz.
    pub base_frequency_hz: f32,
    /// Pitch class of table index 0 (0 = C, 9 = A). Must match
    /// `base_frequency_hz` for note names to be right. Default: 0.
    pub base_pitch_class: usize,
    /// Octave number of table index 0. Default: 1.
    pub base_octave: i32,
    pub features: Features,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            update_frequency_hz: DEFAULT_UPDATE_FREQUENCY_HZ,
            dead_zone: DEFAULT_DEAD_ZONE,
            base_note_offset: DEFAULT_BASE_NOTE_OFFSET,
            base_frequency_hz: DEFAULT_BASE_FREQUENCY_HZ,
            base_pitch_class: PITCH_CLASS_C,
            base_octave: DEFAULT_BASE_OCTAVE,
            features: Features::default(),
        }
    }
}

impl ControlConfig {
    /// Sleep between iterations in microseconds: `1_000_000 / hz`.
    pub fn update_period_us(&self) -> u32 {
        1_000_000 / self.update_frequency_hz.max(1)
    }
}

// ── Step results ─────────────────────────────────────────────────────────

/// Everything one above-dead-zone sample resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoteReadout {
    pub magnitude: f32,
    /// Radians in `[0, 2π)`.
    pub angle: f32,
    /// Table index after clamping.
    pub note_index: usize,
    pub frequency_hz: f32,
    /// Pitch class, e.g. `"C#"`.
    pub note_name: &'static str,
    /// Octave number, e.g. `4` for C4.
    pub octave: i32,
    /// Octave offset in semitones at the time of the sample.
    pub octave_offset: i32,
}

impl NoteReadout {
    pub fn angle_in_pi(&self) -> f32 {
        self.angle / core::f32::consts::PI
    }
}

/// Diagnostic line: `<magnitude>, <angle/π> pi rad (note <index>, freq <hz> Hz)`.
impl fmt::Display for NoteReadout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:.4}, {:.4} pi rad (note {}, freq {:.2} Hz)",
            self.magnitude,
            self.angle_in_pi(),
            self.note_index,
            self.frequency_hz
        )
    }
}

/// Result of one control loop iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// Gate button released; joystick not sampled, tone stopped.
    Gated,
    /// Stick inside the dead-zone; tone stopped.
    #[default]
    Centered,
    /// A note is sounding (or was just played, in timed mode).
    Playing(NoteReadout),
}

// ── ControlLoop ──────────────────────────────────────────────────────────

/// Joystick → note → buzzer loop.
///
/// # Type parameters
///
/// * `J`: joystick sampler.
/// * `T`: square-wave output driven through a [`ToneDriver`].
/// * `G`: gate button, active-low.
/// * `N`: number of entries in the note table.
pub struct ControlLoop<'a, J, T, G, const N: usize = DEFAULT_NOTE_COUNT> {
    joystick: J,
    tone: ToneDriver<T>,
    gate: Option<G>,
    octave: &'a OctaveState,
    notes: NoteTable<N>,
    config: ControlConfig,
}

impl<'a, J, T, G, const N: usize> ControlLoop<'a, J, T, G, N>
where
    J: AxisReader,
    T: ToneOutput,
    G: InputPin,
{
    /// Build the loop and its note table. The tone output is silenced.
    ///
    /// `gate` is only consulted when `config.features.gate_button` is
    /// set; with the feature on and no pin given, the gate counts as
    /// always held.
    pub fn new(
        joystick: J,
        output: T,
        gate: Option<G>,
        octave: &'a OctaveState,
        config: ControlConfig,
    ) -> Self {
        Self {
            joystick,
            tone: ToneDriver::new(output),
            gate,
            octave,
            notes: NoteTable::with_base_note(
                config.base_frequency_hz,
                config.base_pitch_class,
                config.base_octave,
            ),
            config,
        }
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn notes(&self) -> &NoteTable<N> {
        &self.notes
    }

    pub fn tone(&self) -> &ToneDriver<T> {
        &self.tone
    }

    pub fn joystick_mut(&mut self) -> &mut J {
        &mut self.joystick
    }

    pub fn gate_mut(&mut self) -> Option<&mut G> {
        self.gate.as_mut()
    }

    /// Quantise a sample to a note using the current octave offset.
    pub fn resolve(&self, sample: PolarSample) -> NoteReadout {
        let octave_offset = self.octave.offset();
        let index = notes::note_index(self.config.base_note_offset, octave_offset, sample.angle);
        let note_index = self.notes.clamp_index(index);

        NoteReadout {
            magnitude: sample.magnitude,
            angle: sample.angle,
            note_index,
            frequency_hz: self.notes.frequencies()[note_index],
            note_name: self.notes.note_name(note_index),
            octave: self.notes.octave_of(note_index),
            octave_offset,
        }
    }

    /// Run one iteration of the loop. Does not sleep afterwards.
    ///
    /// In [`ToneMode::Timed`] this awaits `delay` for the beep length.
    ///
    /// # Errors
    ///
    /// * [`ControlError::Sample`] if either axis read fails; the tone is
    ///   left as it was.
    /// * [`ControlError::Tone`] if the buzzer rejects the frequency.
    pub async fn step<D>(
        &mut self,
        delay: &mut D,
    ) -> Result<StepOutcome, ControlError<J::Error, T::Error>>
    where
        D: DelayNs,
    {
        if !self.gate_held() {
            self.tone.stop();
            return Ok(StepOutcome::Gated);
        }

        let raw_x = self.joystick.read(Axis::X).map_err(ControlError::Sample)?;
        let raw_y = self.joystick.read(Axis::Y).map_err(ControlError::Sample)?;
        let sample = vector::map(raw_x, raw_y);

        if sample.magnitude <= self.config.dead_zone {
            self.tone.stop();
            return Ok(StepOutcome::Centered);
        }

        let readout = self.resolve(sample);
        match self.config.features.tone_mode {
            ToneMode::Continuous => self.tone.start(readout.frequency_hz)?,
            ToneMode::Timed { duration_ms } => {
                self.tone.play(readout.frequency_hz, duration_ms, delay).await?
            }
        }

        Ok(StepOutcome::Playing(readout))
    }

    /// Run the loop forever at `update_frequency_hz`.
    ///
    /// `on_step` sees every successful outcome (the firmware uses it to
    /// publish state to the display task). Step errors are logged and
    /// the loop carries on.
    pub async fn run<D, F>(&mut self, delay: &mut D, mut on_step: F) -> !
    where
        D: DelayNs,
        F: FnMut(&StepOutcome),
        J::Error: fmt::Debug,
        T::Error: fmt::Debug,
    {
        let period_us = self.config.update_period_us();

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Control loop running: period={}us, dead_zone={}, mode={}",
            period_us,
            self.config.dead_zone,
            self.config.features.tone_mode
        );

        loop {
            match self.step(delay).await {
                Ok(outcome) => {
                    #[cfg(feature = "defmt")]
                    {
                        if let StepOutcome::Playing(r) = &outcome {
                            defmt::info!(
                                "{}, {} pi rad (note {}, freq {} Hz)",
                                r.magnitude,
                                r.angle_in_pi(),
                                r.note_index,
                                r.frequency_hz
                            );
                        }
                    }
                    on_step(&outcome);
                }
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Control step failed: {}", defmt::Debug2Format(&_e));
                }
            }

            delay.delay_us(period_us).await;
        }
    }

    fn gate_held(&mut self) -> bool {
        if !self.config.features.gate_button {
            return true;
        }
        match self.gate.as_mut() {
            // Active-low; a read error counts as released.
            Some(pin) => pin.is_low().unwrap_or(false),
            None => true,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::tests::{MockDelay, MockOutput};
    use core::convert::Infallible;
    use core::f32::consts::TAU;
    use core::fmt::Write;
    use embassy_futures::block_on;
    use embassy_futures::select::{select, Either};
    use embedded_hal::digital::ErrorType;

    const MID: u16 = 2048;

    #[derive(Debug, Default)]
    struct MockJoystick {
        x: u16,
        y: u16,
        reads: u32,
        fail: bool,
        /// Reads left to fail before the stick answers.
        fail_first: u32,
    }

    impl MockJoystick {
        fn at(x: u16, y: u16) -> Self {
            Self {
                x,
                y,
                ..Self::default()
            }
        }

        fn set(&mut self, x: u16, y: u16) {
            self.x = x;
            self.y = y;
        }
    }

    impl AxisReader for MockJoystick {
        type Error = &'static str;

        fn read(&mut self, axis: Axis) -> Result<u16, &'static str> {
            if self.fail {
                return Err("adc timeout");
            }
            if self.fail_first > 0 {
                self.fail_first -= 1;
                return Err("adc timeout");
            }
            self.reads += 1;
            Ok(match axis {
                Axis::X => self.x,
                Axis::Y => self.y,
            })
        }
    }

    /// Active-low button.
    struct MockGate {
        pressed: bool,
    }

    impl ErrorType for MockGate {
        type Error = Infallible;
    }

    impl InputPin for MockGate {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(!self.pressed)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(self.pressed)
        }
    }

    type TestLoop<'a> = ControlLoop<'a, MockJoystick, MockOutput, MockGate>;

    /// Records every sleep, then never wakes from the `park_after`-th one.
    struct ParkingDelay {
        calls: u32,
        total_ns: u64,
        park_after: u32,
    }

    impl DelayNs for ParkingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.calls += 1;
            self.total_ns += u64::from(ns);
            if self.calls >= self.park_after {
                core::future::pending::<()>().await;
            }
        }
    }

    fn no_gate_config() -> ControlConfig {
        ControlConfig {
            features: Features {
                gate_button: false,
                ..Features::default()
            },
            ..ControlConfig::default()
        }
    }

    fn make(octave: &OctaveState, x: u16, y: u16, config: ControlConfig) -> TestLoop<'_> {
        ControlLoop::new(
            MockJoystick::at(x, y),
            MockOutput::default(),
            Some(MockGate { pressed: true }),
            octave,
            config,
        )
    }

    fn step(cl: &mut TestLoop<'_>) -> StepOutcome {
        let mut delay = MockDelay::default();
        block_on(cl.step(&mut delay)).unwrap()
    }

    fn playing(outcome: StepOutcome) -> NoteReadout {
        match outcome {
            StepOutcome::Playing(r) => r,
            other => panic!("expected Playing, got {:?}", other),
        }
    }

    /// Raw sample pair at `magnitude` (normalised) and `angle`.
    fn raw_at(magnitude: f32, angle: f32) -> (u16, u16) {
        let x = 2048.0 + magnitude * 2048.0 * libm::cosf(angle);
        let y = 2048.0 + magnitude * 2048.0 * libm::sinf(angle);
        (libm::roundf(x) as u16, libm::roundf(y) as u16)
    }

    // ── Configuration ────────────────────────────────────────────────

    #[test]
    fn default_config_values() {
        let c = ControlConfig::default();
        assert_eq!(c.update_frequency_hz, 60);
        assert_eq!(c.dead_zone, 0.45);
        assert_eq!(c.base_note_offset, 36);
        assert_eq!(c.base_octave, 1);
        assert_eq!(c.base_pitch_class, 0);
        assert!(c.features.display);
        assert!(c.features.gate_button);
        assert_eq!(c.features.tone_mode, ToneMode::Continuous);
    }

    #[test]
    fn update_period_60hz() {
        assert_eq!(ControlConfig::default().update_period_us(), 16_666);
    }

    #[test]
    fn update_period_never_divides_by_zero() {
        let c = ControlConfig {
            update_frequency_hz: 0,
            ..ControlConfig::default()
        };
        assert_eq!(c.update_period_us(), 1_000_000);
    }

    // ── Note resolution ──────────────────────────────────────────────

    #[test]
    fn full_right_plays_base_note() {
        let octave = OctaveState::new(0);
        let mut cl = make(&octave, 4095, MID, ControlConfig::default());

        let r = playing(step(&mut cl));

        assert!((r.magnitude - 2047.0 / 2048.0).abs() < 1e-5);
        assert_eq!(r.angle, 0.0);
        assert_eq!(r.note_index, 36);
        assert_eq!(r.frequency_hz, cl.notes().lookup(36));
        assert_eq!(r.note_name, "C");
        assert_eq!(r.octave, 4);

        let out = cl.tone().output();
        assert!(out.enabled);
        assert_eq!(out.frequency, Some(r.frequency_hz));
    }

    #[test]
    fn angle_selects_sector() {
        let octave = OctaveState::new(0);
        // 105°, inside sector 3.
        let (x, y) = raw_at(0.5, 105.0_f32.to_radians());
        let mut cl = make(&octave, x, y, ControlConfig::default());

        let r = playing(step(&mut cl));
        assert_eq!(r.note_index, 39);
        assert_eq!(r.note_name, "D#");
    }

    #[test]
    fn octave_offset_shifts_note() {
        let octave = OctaveState::new(0);
        let mut cl = make(&octave, 4095, MID, ControlConfig::default());

        octave.shift_up();
        let r = playing(step(&mut cl));
        assert_eq!(r.note_index, 48);
        assert_eq!(r.octave, 5);
        assert_eq!(r.octave_offset, 12);

        octave.shift_down();
        octave.shift_down();
        let r = playing(step(&mut cl));
        assert_eq!(r.note_index, 24);
    }

    #[test]
    fn out_of_range_index_clamps_to_table() {
        let octave = OctaveState::new(12 * 20);
        let mut cl = make(&octave, 4095, MID, ControlConfig::default());
        let r = playing(step(&mut cl));
        assert_eq!(r.note_index, DEFAULT_NOTE_COUNT - 1);
        assert_eq!(r.frequency_hz, cl.notes().lookup(DEFAULT_NOTE_COUNT as i32 + 5));

        let octave = OctaveState::new(-12 * 20);
        let mut cl = make(&octave, 4095, MID, ControlConfig::default());
        let r = playing(step(&mut cl));
        assert_eq!(r.note_index, 0);
    }

    // ── Dead-zone ────────────────────────────────────────────────────

    #[test]
    fn centred_stick_is_silent() {
        let octave = OctaveState::new(0);
        let mut cl = make(&octave, MID, MID, ControlConfig::default());
        assert_eq!(step(&mut cl), StepOutcome::Centered);
        assert_eq!(cl.tone().output().enable_calls, 0);
    }

    #[test]
    fn below_dead_zone_never_starts_tone_at_any_angle() {
        let octave = OctaveState::new(0);
        let mut cl = make(&octave, MID, MID, ControlConfig::default());

        for i in 0..72 {
            let angle = TAU * i as f32 / 72.0;
            for magnitude in [0.1, 0.3, 0.44] {
                let (x, y) = raw_at(magnitude, angle);
                cl.joystick_mut().set(x, y);
                assert_eq!(step(&mut cl), StepOutcome::Centered);
            }
        }
        assert_eq!(cl.tone().output().enable_calls, 0);
        assert_eq!(cl.tone().output().set_calls, 0);
    }

    #[test]
    fn returning_to_centre_stops_tone() {
        let octave = OctaveState::new(0);
        let mut cl = make(&octave, 4095, MID, ControlConfig::default());

        playing(step(&mut cl));
        assert!(cl.tone().is_active());

        cl.joystick_mut().set(MID + 20, MID - 15);
        assert_eq!(step(&mut cl), StepOutcome::Centered);
        assert!(!cl.tone().is_active());
        assert!(!cl.tone().output().enabled);
    }

    #[test]
    fn moving_between_notes_retunes_without_gap() {
        let octave = OctaveState::new(0);
        let mut cl = make(&octave, 4095, MID, ControlConfig::default());

        playing(step(&mut cl));
        let (x, y) = raw_at(0.9, 200.0_f32.to_radians());
        cl.joystick_mut().set(x, y);
        let r = playing(step(&mut cl));

        let out = cl.tone().output();
        assert_eq!(out.enable_calls, 1);
        assert_eq!(out.frequency, Some(r.frequency_hz));
    }

    // ── Gate button ──────────────────────────────────────────────────

    #[test]
    fn released_gate_skips_sampling_and_silences() {
        let octave = OctaveState::new(0);
        let mut cl = make(&octave, 4095, MID, ControlConfig::default());

        playing(step(&mut cl));
        let reads_before = cl.joystick_mut().reads;

        if let Some(gate) = cl.gate_mut() {
            gate.pressed = false;
        }
        assert_eq!(step(&mut cl), StepOutcome::Gated);
        assert_eq!(cl.joystick_mut().reads, reads_before);
        assert!(!cl.tone().output().enabled);
    }

    #[test]
    fn gate_ignored_when_feature_off() {
        let octave = OctaveState::new(0);
        let mut cl = make(&octave, 4095, MID, no_gate_config());
        if let Some(gate) = cl.gate_mut() {
            gate.pressed = false;
        }
        playing(step(&mut cl));
    }

    #[test]
    fn missing_gate_pin_counts_as_held() {
        let octave = OctaveState::new(0);
        let mut cl: TestLoop<'_> = ControlLoop::new(
            MockJoystick::at(4095, MID),
            MockOutput::default(),
            None,
            &octave,
            ControlConfig::default(),
        );
        playing(step(&mut cl));
    }

    // ── Tone modes ───────────────────────────────────────────────────

    #[test]
    fn timed_mode_beeps_for_duration() {
        let octave = OctaveState::new(0);
        let config = ControlConfig {
            features: Features::timed(),
            ..ControlConfig::default()
        };
        let mut cl = make(&octave, 4095, MID, config);
        let mut delay = MockDelay::default();

        let outcome = block_on(cl.step(&mut delay)).unwrap();

        assert!(matches!(outcome, StepOutcome::Playing(_)));
        assert_eq!(delay.total_ns, u64::from(DEFAULT_TIMED_DURATION_MS) * 1_000_000);
        let out = cl.tone().output();
        assert_eq!(out.enable_calls, 1);
        assert!(!out.enabled);
    }

    #[test]
    fn continuous_mode_does_not_wait() {
        let octave = OctaveState::new(0);
        let mut cl = make(&octave, 4095, MID, ControlConfig::default());
        let mut delay = MockDelay::default();
        block_on(cl.step(&mut delay)).unwrap();
        assert_eq!(delay.total_ns, 0);
    }

    // ── Errors ───────────────────────────────────────────────────────

    #[test]
    fn sample_error_is_reported_and_tone_left_alone() {
        let octave = OctaveState::new(0);
        let mut cl = make(&octave, 4095, MID, ControlConfig::default());
        playing(step(&mut cl));

        cl.joystick_mut().fail = true;
        let mut delay = MockDelay::default();
        let result = block_on(cl.step(&mut delay));

        assert_eq!(result, Err(ControlError::Sample("adc timeout")));
        assert!(cl.tone().is_active());
    }

    #[test]
    fn tone_error_is_reported() {
        let octave = OctaveState::new(0);
        let mut cl: TestLoop<'_> = ControlLoop::new(
            MockJoystick::at(4095, MID),
            MockOutput {
                max_hz: Some(100.0),
                ..MockOutput::default()
            },
            None,
            &octave,
            ControlConfig::default(),
        );
        let mut delay = MockDelay::default();
        let result = block_on(cl.step(&mut delay));
        assert_eq!(
            result,
            Err(ControlError::Tone(crate::error::ToneError::Output(())))
        );
    }

    // ── Run loop ─────────────────────────────────────────────────────

    #[test]
    fn run_survives_errors_and_sleeps_full_period() {
        let octave = OctaveState::new(0);
        let mut cl = make(&octave, 4095, MID, ControlConfig::default());
        cl.joystick_mut().fail_first = 2;
        let mut delay = ParkingDelay {
            calls: 0,
            total_ns: 0,
            park_after: 3,
        };
        let mut seen = 0;
        let mut played = 0;

        let result = block_on(select(
            cl.run(&mut delay, |outcome| {
                seen += 1;
                if matches!(outcome, StepOutcome::Playing(_)) {
                    played += 1;
                }
            }),
            core::future::ready(()),
        ));

        // Two failed steps and one good one, each followed by a sleep.
        assert!(matches!(result, Either::Second(())));
        assert_eq!(delay.calls, 3);
        assert_eq!(delay.total_ns, 3 * 16_666 * 1_000);
        assert_eq!(seen, 1);
        assert_eq!(played, 1);
        assert!(cl.tone().is_active());
    }

    #[test]
    fn run_hands_every_outcome_to_callback() {
        let octave = OctaveState::new(0);
        let mut cl = make(&octave, MID, MID, no_gate_config());
        let mut delay = ParkingDelay {
            calls: 0,
            total_ns: 0,
            park_after: 4,
        };
        let mut centered = 0;

        let result = block_on(select(
            cl.run(&mut delay, |outcome| {
                if *outcome == StepOutcome::Centered {
                    centered += 1;
                }
            }),
            core::future::ready(()),
        ));

        assert!(matches!(result, Either::Second(())));
        assert_eq!(delay.calls, 4);
        assert_eq!(centered, 4);
        assert!(!cl.tone().is_active());
    }

    #[test]
    fn a_based_config_labels_notes_from_a() {
        let octave = OctaveState::new(0);
        let config = ControlConfig {
            base_frequency_hz: 440.0,
            base_pitch_class: crate::notes::PITCH_CLASS_A,
            base_octave: 4,
            base_note_offset: 0,
            features: Features {
                gate_button: false,
                ..Features::default()
            },
            ..ControlConfig::default()
        };
        let mut cl = make(&octave, 4095, MID, config);

        let r = playing(step(&mut cl));

        assert_eq!(r.note_index, 0);
        assert_eq!(r.frequency_hz, 440.0);
        assert_eq!((r.note_name, r.octave), ("A", 4));
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    #[test]
    fn diagnostic_line_reports_all_fields() {
        let octave = OctaveState::new(0);
        let mut cl = make(&octave, 0, MID, ControlConfig::default());
        let r = playing(step(&mut cl));

        let mut line: heapless::String<64> = heapless::String::new();
        write!(line, "{}", r).unwrap();

        assert_eq!(r.note_index, 42);
        assert!(line.starts_with("1.0000, 1.0000 pi rad (note 42, freq "));
        assert!(line.ends_with(" Hz)"));
    }
}
