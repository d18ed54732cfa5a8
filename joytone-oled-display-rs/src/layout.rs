//! Display layout types and rendering logic.
//!
//! [`DisplayState`] is an immutable snapshot of what one frame shows,
//! built from the control loop's latest [`StepOutcome`] and the current
//! octave offset. [`render_display`] draws it with `embedded-graphics`.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Alignment, Text},
};
use heapless::String;

use joytone::{StepOutcome, NOTES_PER_OCTAVE};

/// Shown in the header of every frame.
pub const TITLE: &str = "joytone";

/// Body text while the stick rests in the dead-zone.
pub const IDLE_TEXT: &str = "Move stick";

/// Body text while the gate button is released.
pub const GATED_TEXT: &str = "Hold to play";

// ── DisplayConfig ────────────────────────────────────────────────────────

/// Refresh rate and layout geometry.
///
/// [`DisplayConfig::default()`] matches a 128×64 panel at 30 Hz.
pub struct DisplayConfig {
    /// Display refresh rate in Hz. Default: 30. Max: 60.
    pub update_frequency_hz: u32,

    // ── Layout geometry ──────────────────────────────────────────────
    /// Total display width in pixels. Default: 128.
    pub display_width: u32,
    /// Total display height in pixels. Default: 64.
    pub display_height: u32,
    /// Baseline of the title text. Default: 10.
    pub header_y: i32,
    /// Baseline of the large note name (or idle text). Default: 34.
    pub note_y: i32,
    /// Baseline of the frequency line. Default: 48.
    pub frequency_y: i32,
    /// Baseline of the octave shift line. Default: 62.
    pub octave_y: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            update_frequency_hz: 30,
            display_width: 128,
            display_height: 64,
            header_y: 10,
            note_y: 34,
            frequency_y: 48,
            octave_y: 62,
        }
    }
}

impl DisplayConfig {
    /// Timer period in milliseconds: `1000 / update_frequency_hz`.
    pub fn update_period_ms(&self) -> u64 {
        1000 / self.update_frequency_hz.max(1) as u64
    }
}

// ── DisplayState ─────────────────────────────────────────────────────────

/// What the body of the frame shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayStatus {
    #[default]
    Idle,
    Gated,
    Playing,
}

/// Snapshot of everything one frame needs.
///
/// Frequencies are kept in tenths of a hertz so that two snapshots
/// compare equal exactly when they render identically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub status: DisplayStatus,
    /// Pitch class, null-padded UTF-8 (max 3 chars).
    pub note_name: [u8; 4],
    pub octave: i32,
    /// Frequency in 0.1 Hz units.
    pub frequency_dhz: u32,
    /// Octave offset in whole octaves.
    pub octave_shift: i32,
}

impl DisplayState {
    /// Build from the latest control loop outcome.
    ///
    /// `octave_offset` is the current offset in semitones. It is shown
    /// even while idle so octave button presses are visible immediately.
    pub fn from_outcome(outcome: &StepOutcome, octave_offset: i32) -> Self {
        let mut state = Self {
            octave_shift: octave_offset / NOTES_PER_OCTAVE as i32,
            ..Self::default()
        };

        match outcome {
            StepOutcome::Centered => state.status = DisplayStatus::Idle,
            StepOutcome::Gated => state.status = DisplayStatus::Gated,
            StepOutcome::Playing(readout) => {
                state.status = DisplayStatus::Playing;
                let bytes = readout.note_name.as_bytes();
                let len = bytes.len().min(3);
                state.note_name[..len].copy_from_slice(&bytes[..len]);
                state.octave = readout.octave;
                state.frequency_dhz = (readout.frequency_hz * 10.0 + 0.5) as u32;
            }
        }

        state
    }

    /// Pitch class as `&str`.
    pub fn note_name(&self) -> &str {
        let end = self
            .note_name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.note_name.len());
        core::str::from_utf8(&self.note_name[..end]).unwrap_or("")
    }

    /// Large body text: `"C#4"` while playing, otherwise the idle or
    /// gated prompt.
    pub fn body_line(&self) -> String<16> {
        let mut buf = String::new();
        let _ = match self.status {
            DisplayStatus::Idle => write!(buf, "{}", IDLE_TEXT),
            DisplayStatus::Gated => write!(buf, "{}", GATED_TEXT),
            DisplayStatus::Playing => write!(buf, "{}{}", self.note_name(), self.octave),
        };
        buf
    }

    /// `"261.6 Hz"`, or empty when nothing is playing.
    pub fn frequency_line(&self) -> String<16> {
        let mut buf = String::new();
        if self.status == DisplayStatus::Playing {
            let _ = write!(
                buf,
                "{}.{} Hz",
                self.frequency_dhz / 10,
                self.frequency_dhz % 10
            );
        }
        buf
    }

    /// `"Oct +1"`, `"Oct 0"`, `"Oct -2"`.
    pub fn octave_line(&self) -> String<16> {
        let mut buf = String::new();
        let _ = if self.octave_shift > 0 {
            write!(buf, "Oct +{}", self.octave_shift)
        } else {
            write!(buf, "Oct {}", self.octave_shift)
        };
        buf
    }
}

// ── Frame skipping ───────────────────────────────────────────────────────

/// Remembers the last frame that reached the panel.
///
/// A frame is due when nothing has been shown yet or the new state
/// differs from the shown one. Only a successful flush updates the
/// record, so a failed frame is retried on the next cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCache {
    shown: Option<DisplayState>,
}

impl FrameCache {
    pub const fn new() -> Self {
        Self { shown: None }
    }

    pub fn is_due(&self, next: &DisplayState) -> bool {
        self.shown.as_ref() != Some(next)
    }

    /// Record `state` as on the panel.
    pub fn mark_shown(&mut self, state: DisplayState) {
        self.shown = Some(state);
    }

    pub fn shown(&self) -> Option<&DisplayState> {
        self.shown.as_ref()
    }
}

// ── Rendering ────────────────────────────────────────────────────────────

/// Render a [`DisplayState`] with `embedded-graphics`.
///
/// # Layout
///
/// ```text
/// ┌──────────────────────────────┐
/// │           joytone            │  ← header_y
/// │                              │
/// │             C#4              │  ← note_y (10×20 font)
/// │           277.2 Hz           │  ← frequency_y
/// │            Oct +1            │  ← octave_y
/// └──────────────────────────────┘
/// ```
pub fn render_display<D>(
    display: &mut D,
    state: &DisplayState,
    config: &DisplayConfig,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let large = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
    let centre_x = config.display_width as i32 / 2;

    Text::with_alignment(TITLE, Point::new(centre_x, config.header_y), small, Alignment::Center)
        .draw(display)?;

    let body = state.body_line();
    let body_style = if state.status == DisplayStatus::Playing {
        large
    } else {
        small
    };
    Text::with_alignment(
        body.as_str(),
        Point::new(centre_x, config.note_y),
        body_style,
        Alignment::Center,
    )
    .draw(display)?;

    let frequency = state.frequency_line();
    if !frequency.is_empty() {
        Text::with_alignment(
            frequency.as_str(),
            Point::new(centre_x, config.frequency_y),
            small,
            Alignment::Center,
        )
        .draw(display)?;
    }

    Text::with_alignment(
        state.octave_line().as_str(),
        Point::new(centre_x, config.octave_y),
        small,
        Alignment::Center,
    )
    .draw(display)?;

    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────
