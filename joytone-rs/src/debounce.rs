//! Time-window debouncing for edge-triggered buttons.
//!
//! A mechanical button produces a burst of edges for every press. An edge
//! is accepted only if the pin still reads pressed and more than the
//! debounce window has elapsed since the last accepted edge **on the same
//! pin**; everything else is dropped. There is no other hysteresis.
//!
//! All timestamps are monotonic microseconds supplied by the caller, so
//! this module never touches a clock and is safe to call from any context.

/// Minimum spacing between two accepted edges on one pin.
pub const DEBOUNCE_WINDOW_US: u64 = 200_000;

/// Debounce state for a single pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceState {
    last_accepted_us: Option<u64>,
}

impl DebounceState {
    pub const fn new() -> Self {
        Self {
            last_accepted_us: None,
        }
    }

    /// Decide whether an edge at `now_us` is a real press.
    ///
    /// Records `now_us` as the last accepted edge when it returns `true`.
    /// The first pressed edge on a pin is always accepted.
    pub fn accept(&mut self, now_us: u64, pressed: bool, window_us: u64) -> bool {
        if !pressed {
            return false;
        }
        if let Some(last) = self.last_accepted_us {
            if now_us.saturating_sub(last) <= window_us {
                return false;
            }
        }
        self.last_accepted_us = Some(now_us);
        true
    }

    /// Timestamp of the last accepted edge, if any.
    pub fn last_accepted_us(&self) -> Option<u64> {
        self.last_accepted_us
    }
}

/// Fixed-size table of [`DebounceState`]s keyed by GPIO number.
///
/// # Examples
///
/// ```
/// use joytone::Debouncer;
///
/// let mut d = Debouncer::new([5, 6], 200_000);
/// assert!(d.on_falling_edge(5, 1_000_000, true));
/// assert!(!d.on_falling_edge(5, 1_050_000, true)); // bounce
/// assert!(d.on_falling_edge(6, 1_050_000, true)); // other pin
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer<const N: usize> {
    pins: [u8; N],
    states: [DebounceState; N],
    window_us: u64,
}

impl<const N: usize> Debouncer<N> {
    pub const fn new(pins: [u8; N], window_us: u64) -> Self {
        Self {
            pins,
            states: [DebounceState::new(); N],
            window_us,
        }
    }

    /// Feed a falling edge seen on `pin`.
    ///
    /// `pressed` is the logical level read at the time of the edge
    /// (active-low pins report `true` when electrically low). Edges on
    /// pins not in the table are never accepted.
    pub fn on_falling_edge(&mut self, pin: u8, now_us: u64, pressed: bool) -> bool {
        match self.slot(pin) {
            Some(i) => self.states[i].accept(now_us, pressed, self.window_us),
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Edge on unregistered pin {}", pin);
                false
            }
        }
    }

    /// Last accepted edge on `pin`, or `None` if never accepted or unknown.
    pub fn last_accepted_us(&self, pin: u8) -> Option<u64> {
        self.slot(pin)
            .and_then(|i| self.states[i].last_accepted_us())
    }

    pub fn window_us(&self) -> u64 {
        self.window_us
    }

    fn slot(&self, pin: u8) -> Option<usize> {
        self.pins.iter().position(|&p| p == pin)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
