//! Frequency → PWM slice settings.
//!
//! [`PwmSettings`] picks the smallest integer divider that lets the period
//! fit in the 16-bit counter, which leaves the most counter resolution
//! for the period and so the closest match to the requested frequency.

use crate::error::PwmError;
use crate::limits::{MAX_DIVIDER, MAX_TOP, MIN_WRAP};

/// Number of distinct counter values (`MAX_TOP + 1`).
const COUNTER_RANGE: u32 = MAX_TOP as u32 + 1;

/// Divider, wrap and compare values for a 50% duty square wave.
///
/// # Example
///
/// ```
/// use buzzer_driver::{PwmSettings, RP2350_SYS_CLK_HZ};
///
/// let s = PwmSettings::for_frequency(RP2350_SYS_CLK_HZ, 261.63).unwrap();
/// assert_eq!(s.compare, (s.top + 1) / 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmSettings {
    /// Integer clock divider, `1..=255`.
    pub divider: u8,
    /// Counter wrap value; the period is `top + 1` ticks.
    pub top: u16,
    /// Output high while the counter is below this value.
    pub compare: u16,
}

impl PwmSettings {
    /// Compute settings for `frequency_hz` on a slice clocked at
    /// `sys_clk_hz`.
    ///
    /// # Errors
    ///
    /// * [`PwmError::InvalidFrequency`] for `<= 0`, NaN or infinite input.
    /// * [`PwmError::FrequencyTooLow`] if even the largest divider cannot
    ///   stretch the period far enough.
    /// * [`PwmError::FrequencyTooHigh`] if the period would be shorter
    ///   than [`MIN_WRAP`] ticks.
    pub fn for_frequency(sys_clk_hz: u32, frequency_hz: f32) -> Result<Self, PwmError> {
        if !(frequency_hz.is_finite() && frequency_hz > 0.0) {
            return Err(PwmError::InvalidFrequency);
        }

        // Clock cycles per output period: divider * (top + 1).
        let cycles = sys_clk_hz as f32 / frequency_hz;

        let divider = libm::ceilf(cycles / COUNTER_RANGE as f32).max(1.0);
        if divider > MAX_DIVIDER as f32 {
            return Err(PwmError::FrequencyTooLow);
        }

        let wrap = libm::roundf(cycles / divider);
        if wrap < MIN_WRAP as f32 {
            return Err(PwmError::FrequencyTooHigh);
        }
        let wrap = (wrap as u32).min(COUNTER_RANGE);

        Ok(Self {
            divider: divider as u8,
            top: (wrap - 1) as u16,
            compare: (wrap / 2) as u16,
        })
    }

    /// Frequency these settings actually produce at `sys_clk_hz`.
    pub fn actual_frequency(&self, sys_clk_hz: u32) -> f32 {
        sys_clk_hz as f32 / (self.divider as f32 * (self.top as f32 + 1.0))
    }

    /// Lowest frequency any setting can produce at `sys_clk_hz`.
    pub fn min_frequency(sys_clk_hz: u32) -> f32 {
        sys_clk_hz as f32 / (MAX_DIVIDER as f32 * COUNTER_RANGE as f32)
    }

    /// Highest frequency accepted by [`for_frequency()`](Self::for_frequency)
    /// at `sys_clk_hz`.
    pub fn max_frequency(sys_clk_hz: u32) -> f32 {
        sys_clk_hz as f32 / MIN_WRAP as f32
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::{RP2040_SYS_CLK_HZ, RP2350_SYS_CLK_HZ};

    fn assert_within_half_percent(sys_clk_hz: u32, hz: f32) {
        let s = PwmSettings::for_frequency(sys_clk_hz, hz).unwrap();
        let actual = s.actual_frequency(sys_clk_hz);
        let error = (actual - hz).abs() / hz;
        assert!(
            error < 0.005,
            "{} Hz at {} Hz clock came out as {} Hz",
            hz,
            sys_clk_hz,
            actual
        );
    }

    #[test]
    fn a4_on_rp2350() {
        let s = PwmSettings::for_frequency(RP2350_SYS_CLK_HZ, 440.0).unwrap();
        assert_eq!(s.divider, 6);
        assert_eq!(s.top, 56_817);
        assert_eq!(s.compare, 28_409);
    }

    #[test]
    fn every_table_note_is_accurate() {
        for clk in [RP2350_SYS_CLK_HZ, RP2040_SYS_CLK_HZ] {
            for i in 0..96 {
                let hz = 32.703_197 * libm::powf(2.0, i as f32 / 12.0);
                assert_within_half_percent(clk, hz);
            }
        }
    }

    #[test]
    fn duty_cycle_is_half() {
        for hz in [55.0, 261.63, 1000.0, 7902.13] {
            let s = PwmSettings::for_frequency(RP2350_SYS_CLK_HZ, hz).unwrap();
            assert_eq!(s.compare, ((s.top as u32 + 1) / 2) as u16);
        }
    }

    #[test]
    fn smallest_divider_is_chosen() {
        // 150 MHz / 65536 ≈ 2289 Hz: the highest frequency with divider 1
        // still filling the counter.
        let s = PwmSettings::for_frequency(RP2350_SYS_CLK_HZ, 3000.0).unwrap();
        assert_eq!(s.divider, 1);
        assert_eq!(s.top, 49_999);

        let s = PwmSettings::for_frequency(RP2350_SYS_CLK_HZ, 2000.0).unwrap();
        assert_eq!(s.divider, 2);
    }

    #[test]
    fn too_low_is_rejected() {
        let min = PwmSettings::min_frequency(RP2350_SYS_CLK_HZ);
        assert_eq!(
            PwmSettings::for_frequency(RP2350_SYS_CLK_HZ, min * 0.9),
            Err(PwmError::FrequencyTooLow)
        );
        assert!(PwmSettings::for_frequency(RP2350_SYS_CLK_HZ, min * 1.01).is_ok());
    }

    #[test]
    fn too_high_is_rejected() {
        let max = PwmSettings::max_frequency(RP2350_SYS_CLK_HZ);
        assert_eq!(
            PwmSettings::for_frequency(RP2350_SYS_CLK_HZ, max * 1.1),
            Err(PwmError::FrequencyTooHigh)
        );
        assert!(PwmSettings::for_frequency(RP2350_SYS_CLK_HZ, max * 0.9).is_ok());
    }

    #[test]
    fn invalid_input_is_rejected() {
        for hz in [0.0, -440.0, f32::NAN, f32::INFINITY] {
            assert_eq!(
                PwmSettings::for_frequency(RP2350_SYS_CLK_HZ, hz),
                Err(PwmError::InvalidFrequency)
            );
        }
    }
}
