//! Octave offset shared between the button tasks and the control loop.
//!
//! [`OctaveState`] is a single atomic word. The button side only ever
//! adds or subtracts 12; the control loop only ever loads it. Relaxed
//! ordering is enough: the loop needs to see a press eventually, not in
//! any particular order relative to other memory.
//!
//! The offset itself is unbounded. The resulting note index is clamped
//! when the note table is looked up, so pressing past the top or bottom
//! of the range is harmless.

use core::sync::atomic::{AtomicI32, Ordering};

use crate::debounce::Debouncer;
use crate::notes::NOTES_PER_OCTAVE;

/// What an accepted button edge does to the octave offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    OctaveUp,
    OctaveDown,
}

impl ButtonAction {
    /// Signed semitone shift: `+12` or `-12`.
    pub const fn semitones(self) -> i32 {
        match self {
            ButtonAction::OctaveUp => NOTES_PER_OCTAVE as i32,
            ButtonAction::OctaveDown => -(NOTES_PER_OCTAVE as i32),
        }
    }
}

/// Lock-free octave offset in semitones.
///
/// Usable directly in a `static`:
///
/// ```
/// use joytone::OctaveState;
///
/// static OCTAVE: OctaveState = OctaveState::new(0);
///
/// OCTAVE.shift_up();
/// assert_eq!(OCTAVE.offset(), 12);
/// ```
#[derive(Debug)]
pub struct OctaveState {
    offset: AtomicI32,
}

impl OctaveState {
    pub const fn new(initial: i32) -> Self {
        Self {
            offset: AtomicI32::new(initial),
        }
    }

    /// Current offset in semitones.
    pub fn offset(&self) -> i32 {
        self.offset.load(Ordering::Relaxed)
    }

    /// Raise by one octave. Returns the new offset.
    pub fn shift_up(&self) -> i32 {
        self.apply(ButtonAction::OctaveUp)
    }

    /// Lower by one octave. Returns the new offset.
    pub fn shift_down(&self) -> i32 {
        self.apply(ButtonAction::OctaveDown)
    }

    /// Apply a button action. Returns the new offset.
    pub fn apply(&self, action: ButtonAction) -> i32 {
        let delta = action.semitones();
        self.offset.fetch_add(delta, Ordering::Relaxed) + delta
    }
}

impl Default for OctaveState {
    fn default() -> Self {
        Self::new(0)
    }
}

/// One octave button: its debounce state plus the action it triggers.
///
/// Each button gets its own instance, owned by its own edge task, so an
/// edge on one button can never be lost while the other is handled. Both
/// apply accepted edges straight to the shared [`OctaveState`].
///
/// ```
/// use joytone::{ButtonAction, OctaveButton, OctaveState, DEBOUNCE_WINDOW_US};
///
/// let octave = OctaveState::new(0);
/// let mut up = OctaveButton::new(5, ButtonAction::OctaveUp, DEBOUNCE_WINDOW_US, &octave);
///
/// assert_eq!(up.on_falling_edge(1_000_000, true), Some(ButtonAction::OctaveUp));
/// assert_eq!(up.on_falling_edge(1_000_050, true), None); // bounce
/// assert_eq!(octave.offset(), 12);
/// ```
pub struct OctaveButton<'a> {
    debouncer: Debouncer<1>,
    pin: u8,
    action: ButtonAction,
    octave: &'a OctaveState,
}

impl<'a> OctaveButton<'a> {
    pub const fn new(
        pin: u8,
        action: ButtonAction,
        window_us: u64,
        octave: &'a OctaveState,
    ) -> Self {
        Self {
            debouncer: Debouncer::new([pin], window_us),
            pin,
            action,
            octave,
        }
    }

    /// GPIO number this button is wired to.
    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn action(&self) -> ButtonAction {
        self.action
    }

    /// Handle a falling edge seen at `now_us` with the pin reading
    /// `pressed`.
    ///
    /// Returns the applied action when the edge passed the debouncer,
    /// `None` when it was dropped.
    pub fn on_falling_edge(&mut self, now_us: u64, pressed: bool) -> Option<ButtonAction> {
        if !self.debouncer.on_falling_edge(self.pin, now_us, pressed) {
            return None;
        }
        self.octave.apply(self.action);
        Some(self.action)
    }

    /// Last accepted edge, if any.
    pub fn last_accepted_us(&self) -> Option<u64> {
        self.debouncer.last_accepted_us(self.pin)
    }

    pub fn octave(&self) -> &'a OctaveState {
        self.octave
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::DEBOUNCE_WINDOW_US;

    const UP: u8 = 5;
    const DOWN: u8 = 6;

    #[test]
    fn up_then_down_round_trips() {
        let octave = OctaveState::new(-12);
        assert_eq!(octave.shift_up(), 0);
        assert_eq!(octave.shift_down(), -12);
        assert_eq!(octave.offset(), -12);
    }

    #[test]
    fn offset_is_not_clamped_on_mutation() {
        let octave = OctaveState::default();
        for _ in 0..20 {
            octave.shift_up();
        }
        assert_eq!(octave.offset(), 240);
    }

    #[test]
    fn semitones_per_action() {
        assert_eq!(ButtonAction::OctaveUp.semitones(), 12);
        assert_eq!(ButtonAction::OctaveDown.semitones(), -12);
    }

    fn buttons(octave: &OctaveState) -> (OctaveButton<'_>, OctaveButton<'_>) {
        (
            OctaveButton::new(UP, ButtonAction::OctaveUp, DEBOUNCE_WINDOW_US, octave),
            OctaveButton::new(DOWN, ButtonAction::OctaveDown, DEBOUNCE_WINDOW_US, octave),
        )
    }

    #[test]
    fn buttons_apply_accepted_edges() {
        let octave = OctaveState::new(0);
        let (mut up, mut down) = buttons(&octave);

        assert_eq!(up.on_falling_edge(1_000_000, true), Some(ButtonAction::OctaveUp));
        assert_eq!(octave.offset(), 12);

        assert_eq!(down.on_falling_edge(1_000_010, true), Some(ButtonAction::OctaveDown));
        assert_eq!(octave.offset(), 0);
    }

    #[test]
    fn simultaneous_edges_on_both_buttons_both_count() {
        let octave = OctaveState::new(0);
        let (mut up, mut down) = buttons(&octave);

        // Same timestamp, either order: neither edge is swallowed.
        assert!(down.on_falling_edge(2_000_000, true).is_some());
        assert!(up.on_falling_edge(2_000_000, true).is_some());
        assert_eq!(octave.offset(), 0);
        assert_eq!(up.last_accepted_us(), Some(2_000_000));
        assert_eq!(down.last_accepted_us(), Some(2_000_000));

        // A second up press inside the window is a bounce; down still works.
        assert!(up.on_falling_edge(2_100_000, true).is_none());
        assert!(down.on_falling_edge(2_300_000, true).is_some());
        assert_eq!(octave.offset(), -12);
    }

    #[test]
    fn one_button_bouncing_does_not_block_the_other() {
        let octave = OctaveState::new(0);
        let (mut up, mut down) = buttons(&octave);

        for t in [500_000, 500_200, 501_000, 540_000] {
            up.on_falling_edge(t, true);
            down.on_falling_edge(t + 100, true);
        }
        assert_eq!(octave.offset(), 0);
        assert_eq!(up.last_accepted_us(), Some(500_000));
        assert_eq!(down.last_accepted_us(), Some(500_100));
    }

    #[test]
    fn bouncing_button_shifts_once() {
        let octave = OctaveState::new(0);
        let (mut up, _) = buttons(&octave);

        for t in [500_000, 500_200, 501_000, 540_000] {
            up.on_falling_edge(t, true);
        }
        assert_eq!(octave.offset(), 12);
    }

    #[test]
    fn released_level_does_nothing() {
        let octave = OctaveState::new(0);
        let (mut up, down) = buttons(&octave);

        assert_eq!(up.on_falling_edge(1_000_000, false), None);
        assert_eq!(up.last_accepted_us(), None);
        assert_eq!(octave.offset(), 0);
        assert_eq!((down.pin(), down.action()), (DOWN, ButtonAction::OctaveDown));
    }
}
