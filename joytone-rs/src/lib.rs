//! Joystick-to-note mapping and tone control for the joytone firmware.
//!
//! This crate holds everything in the instrument that is not a hardware
//! wrapper. It is `no_std`, allocation-free and host-testable; the
//! firmware crate supplies the ADC, PWM and GPIO adapters through the
//! traits defined here.
//!
//! # Data flow
//!
//! ```text
//! ADC ──► vector::map ──► (angle, magnitude) ──► notes::note_index ──► NoteTable ──► ToneDriver
//!                                                      ▲
//! GPIO edge ──► Debouncer ──► OctaveState ─────────────┘
//! ```
//!
//! - [`vector`]: raw 12-bit samples → [`PolarSample`].
//! - [`notes`]: equal-tempered [`NoteTable`] and angle → note index.
//! - [`octave`]: the lock-free [`OctaveState`] shared with the button task.
//! - [`debounce`]: per-pin time-window debouncing.
//! - [`tone`]: [`ToneDriver`] over any [`ToneOutput`] square-wave source.
//! - [`control`]: the [`ControlLoop`] tying it all together.
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging and [`defmt::Format`] on public types.

#![no_std]

pub mod control;
pub mod debounce;
pub mod error;
pub mod notes;
pub mod octave;
pub mod tone;
pub mod vector;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use control::{
    Axis, AxisReader, ControlConfig, ControlLoop, Features, NoteReadout, StepOutcome,
};
pub use debounce::{DebounceState, Debouncer, DEBOUNCE_WINDOW_US};
pub use error::{ControlError, ToneError};
pub use notes::{NoteTable, DEFAULT_NOTE_COUNT, NOTES_PER_OCTAVE, PITCH_CLASS_A, PITCH_CLASS_C};
pub use octave::{ButtonAction, OctaveButton, OctaveState};
pub use tone::{ToneDriver, ToneMode, ToneOutput, ToneState};
pub use vector::{PolarSample, Vector2};
