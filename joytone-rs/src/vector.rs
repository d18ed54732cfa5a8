//! Joystick vector mapping.
//!
//! Turns one pair of raw ADC samples into a [`PolarSample`]: each axis is
//! centred on the ADC midpoint, normalised by the half-range, and the
//! resulting vector is expressed as an angle in `[0, 2π)` plus a
//! Euclidean magnitude in `[0, ~1.41]`.

use core::f32::consts::{PI, TAU};

/// Largest value the 12-bit ADC produces.
pub const ADC_MAX: u16 = 4095;

/// ADC midpoint. Also used as the half-range divisor, so a full
/// deflection normalises to roughly `±1.0`.
pub const ADC_MIDPOINT: f32 = 2048.0;

/// Centred and normalised joystick vector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    /// Centre and normalise a pair of raw samples.
    ///
    /// Samples above [`ADC_MAX`] are clamped first.
    pub fn from_raw(raw_x: u16, raw_y: u16) -> Self {
        Self {
            x: normalize(raw_x),
            y: normalize(raw_y),
        }
    }

    /// Euclidean norm of the vector.
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y)
    }

    /// Angle of the vector in radians, wrapped into `[0, 2π)`.
    pub fn angle(&self) -> f32 {
        let mut angle = libm::atan2f(self.y, self.x);
        if angle < 0.0 {
            angle += TAU;
        }
        // A tiny negative atan2 result plus 2π can round up to exactly 2π.
        if angle >= TAU {
            angle = 0.0;
        }
        angle
    }
}

/// Joystick position in polar form.
///
/// `angle` is always in `[0, 2π)`; `magnitude` is `0.0` at rest and
/// about `1.0` at full deflection along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PolarSample {
    /// Radians, counter-clockwise from the +X axis.
    pub angle: f32,
    pub magnitude: f32,
}

impl PolarSample {
    /// The angle expressed in units of π, as printed in diagnostics.
    pub fn angle_in_pi(&self) -> f32 {
        self.angle / PI
    }
}

impl From<Vector2> for PolarSample {
    fn from(v: Vector2) -> Self {
        Self {
            angle: v.angle(),
            magnitude: v.magnitude(),
        }
    }
}

/// Map raw joystick samples to a [`PolarSample`].
///
/// Total over every `u16` input; never fails.
///
/// # Examples
///
/// ```
/// use joytone::vector::map;
///
/// let sample = map(4095, 2048);
/// assert_eq!(sample.angle, 0.0);
/// assert!((sample.magnitude - 0.9995).abs() < 1e-3);
/// ```
pub fn map(raw_x: u16, raw_y: u16) -> PolarSample {
    Vector2::from_raw(raw_x, raw_y).into()
}

fn normalize(raw: u16) -> f32 {
    let raw = f32::from(raw.min(ADC_MAX));
    (raw - ADC_MIDPOINT) / ADC_MIDPOINT
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const MID: u16 = 2048;
    const EPS: f32 = 1e-5;

    #[test]
    fn midpoint_has_zero_magnitude() {
        let s = map(MID, MID);
        assert!(s.magnitude.abs() < EPS);
    }

    #[test]
    fn positive_x_axis_is_angle_zero() {
        for x in [MID + 1, 2500, 3000, ADC_MAX] {
            assert_eq!(map(x, MID).angle, 0.0, "x = {}", x);
        }
    }

    #[test]
    fn positive_y_axis_is_half_pi() {
        for y in [MID + 1, 2500, 3000, ADC_MAX] {
            let s = map(MID, y);
            assert!((s.angle - PI / 2.0).abs() < EPS, "y = {}", y);
        }
    }

    #[test]
    fn negative_axes_wrap_to_positive_angles() {
        let s = map(0, MID);
        assert!((s.angle - PI).abs() < EPS);

        let s = map(MID, 0);
        assert!((s.angle - 3.0 * PI / 2.0).abs() < EPS);
    }

    #[test]
    fn angle_always_in_range_over_adc_domain() {
        for x in (0..=ADC_MAX).step_by(13) {
            for y in (0..=ADC_MAX).step_by(13) {
                let a = map(x, y).angle;
                assert!(a >= 0.0 && a < TAU, "({}, {}) -> {}", x, y, a);
            }
        }
        // Edges of the grid the stride may miss.
        for (x, y) in [(ADC_MAX, MID - 1), (ADC_MAX, 0), (0, 0), (ADC_MAX, ADC_MAX)] {
            let a = map(x, y).angle;
            assert!(a >= 0.0 && a < TAU);
        }
    }

    #[test]
    fn full_deflection_normalises_near_one() {
        let v = Vector2::from_raw(ADC_MAX, MID);
        assert!((v.x - 2047.0 / 2048.0).abs() < EPS);
        assert_eq!(v.y, 0.0);

        let v = Vector2::from_raw(0, MID);
        assert_eq!(v.x, -1.0);
    }

    #[test]
    fn diagonal_magnitude_exceeds_one() {
        let s = map(0, 0);
        assert!((s.magnitude - core::f32::consts::SQRT_2).abs() < EPS);
    }

    #[test]
    fn out_of_range_samples_are_clamped() {
        assert_eq!(map(u16::MAX, MID), map(ADC_MAX, MID));
    }

    #[test]
    fn angle_in_pi_units() {
        let s = map(0, MID);
        assert!((s.angle_in_pi() - 1.0).abs() < EPS);
    }
}
