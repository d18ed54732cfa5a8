//! Equal-tempered note table and angle → note quantisation.
//!
//! The joystick circle is split into [`NOTES_PER_OCTAVE`] sectors of 30°
//! each, sector 0 starting at angle 0 and running counter-clockwise. The
//! sector is added to a base note offset and the current octave offset to
//! give an index into a [`NoteTable`].
//!
//! ```text
//!              sector 3 (90°)
//!                   │
//!   sector 6 ───────┼─────── sector 0 (0°)
//!                   │
//!              sector 9 (270°)
//! ```
//!
//! Index 0 of a table carries a pitch class and an octave number. Names
//! and octave numbers of later indices count up from there, with the
//! octave number rolling over at each C as in scientific pitch notation.

use core::f32::consts::TAU;

/// Pitch class of C in [`NOTE_NAMES`].
pub const PITCH_CLASS_C: usize = 0;

/// Pitch class of A in [`NOTE_NAMES`].
pub const PITCH_CLASS_A: usize = 9;

/// Semitones per octave.
pub const NOTES_PER_OCTAVE: usize = 12;

/// Number of table entries modelled by the firmware (8 octaves).
pub const DEFAULT_NOTE_COUNT: usize = 96;

/// C1, the lowest note of the default table.
pub const DEFAULT_BASE_FREQUENCY_HZ: f32 = 32.703_197;

/// Octave number of index 0 in the default table.
pub const DEFAULT_BASE_OCTAVE: i32 = 1;

/// Pitch-class names, indexed by `index % 12`.
pub const NOTE_NAMES: [&str; NOTES_PER_OCTAVE] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Compute `N` equal-tempered frequencies starting at `base_frequency_hz`.
///
/// Entry `i` is `base_frequency_hz * 2^(i / 12)`.
pub fn build<const N: usize>(base_frequency_hz: f32) -> [f32; N] {
    core::array::from_fn(|i| {
        base_frequency_hz * libm::powf(2.0, i as f32 / NOTES_PER_OCTAVE as f32)
    })
}

/// Which of the 12 angular sectors an angle falls into.
///
/// `angle` is expected in `[0, 2π)`; values outside are clamped into the
/// first or last sector.
pub fn sector(angle: f32) -> usize {
    let s = libm::floorf(angle / TAU * NOTES_PER_OCTAVE as f32);
    if s <= 0.0 {
        0
    } else {
        (s as usize).min(NOTES_PER_OCTAVE - 1)
    }
}

/// Unclamped note index for an angle.
///
/// `base_offset + octave_offset + sector(angle)`. The result may fall
/// outside any particular table; [`NoteTable::lookup`] clamps it.
pub fn note_index(base_offset: i32, octave_offset: i32, angle: f32) -> i32 {
    base_offset
        .saturating_add(octave_offset)
        .saturating_add(sector(angle) as i32)
}

/// Immutable lookup table of `N` chromatic frequencies.
///
/// Built once at startup. Lookups fail closed: an index past either end
/// of the table resolves to the nearest valid entry.
///
/// # Examples
///
/// ```
/// use joytone::NoteTable;
///
/// // A4 = 440 Hz at index 0.
/// let table = NoteTable::<24>::with_base_note(440.0, 9, 4);
/// assert_eq!(table.lookup(12), 880.0);
/// assert_eq!(table.lookup(100), table.lookup(23));
/// assert_eq!((table.note_name(0), table.octave_of(0)), ("A", 4));
/// assert_eq!((table.note_name(3), table.octave_of(3)), ("C", 5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NoteTable<const N: usize> {
    frequencies: [f32; N],
    base_pitch_class: usize,
    base_octave: i32,
}

impl<const N: usize> NoteTable<N> {
    const NON_EMPTY: () = assert!(N > 0, "NoteTable needs at least one entry");

    /// Build a table whose index 0 is `base_frequency_hz`, labelled as the
    /// C of octave [`DEFAULT_BASE_OCTAVE`].
    ///
    /// Frequencies are correct for any base; the labels are only right
    /// when the base really is that C. Use [`with_base_note`] otherwise.
    ///
    /// [`with_base_note`]: Self::with_base_note
    pub fn new(base_frequency_hz: f32) -> Self {
        Self::with_base_octave(base_frequency_hz, DEFAULT_BASE_OCTAVE)
    }

    /// Build a table whose index 0 is the C of `base_octave`.
    pub fn with_base_octave(base_frequency_hz: f32, base_octave: i32) -> Self {
        Self::with_base_note(base_frequency_hz, PITCH_CLASS_C, base_octave)
    }

    /// Build a table whose index 0 is pitch class `base_pitch_class`
    /// (an index into [`NOTE_NAMES`], taken modulo 12) of `base_octave`.
    pub fn with_base_note(
        base_frequency_hz: f32,
        base_pitch_class: usize,
        base_octave: i32,
    ) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;
        Self {
            frequencies: build(base_frequency_hz),
            base_pitch_class: base_pitch_class % NOTES_PER_OCTAVE,
            base_octave,
        }
    }

    /// Pitch class of index 0, in `0..12`.
    pub const fn base_pitch_class(&self) -> usize {
        self.base_pitch_class
    }

    /// Number of entries.
    pub const fn len(&self) -> usize {
        N
    }

    /// Always `false`; empty tables are rejected at compile time.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// All frequencies, lowest first.
    pub fn frequencies(&self) -> &[f32; N] {
        &self.frequencies
    }

    /// Clamp a computed index into `[0, N - 1]`.
    pub fn clamp_index(&self, index: i32) -> usize {
        if index <= 0 {
            0
        } else {
            (index as usize).min(N - 1)
        }
    }

    /// Frequency at `index`, clamped to the table bounds.
    pub fn lookup(&self, index: i32) -> f32 {
        self.frequencies[self.clamp_index(index)]
    }

    /// Pitch-class name of a (clamped) table index.
    pub fn note_name(&self, index: usize) -> &'static str {
        NOTE_NAMES[(self.base_pitch_class + index % NOTES_PER_OCTAVE) % NOTES_PER_OCTAVE]
    }

    /// Octave number of a (clamped) table index, in scientific pitch
    /// notation. Rolls over at C, not at index 0.
    pub fn octave_of(&self, index: usize) -> i32 {
        let octaves = index / NOTES_PER_OCTAVE
            + (self.base_pitch_class + index % NOTES_PER_OCTAVE) / NOTES_PER_OCTAVE;
        self.base_octave + octaves as i32
    }
}

impl Default for NoteTable<DEFAULT_NOTE_COUNT> {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_FREQUENCY_HZ)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
