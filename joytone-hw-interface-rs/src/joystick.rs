//! Two-axis analog joystick on the RP2350 ADC.

use embassy_rp::adc::{self, Adc, Blocking, Channel};
use joytone::{Axis, AxisReader};

/// Joystick wired to two ADC inputs, read with blocking conversions.
///
/// A single conversion takes about 2 µs, far below the control loop
/// period, so there is nothing to gain from the async ADC.
pub struct AdcJoystick<'d> {
    adc: Adc<'d, Blocking>,
    x: Channel<'d>,
    y: Channel<'d>,
}

impl<'d> AdcJoystick<'d> {
    pub fn new(adc: Adc<'d, Blocking>, x: Channel<'d>, y: Channel<'d>) -> Self {
        Self { adc, x, y }
    }
}

impl AxisReader for AdcJoystick<'_> {
    type Error = adc::Error;

    fn read(&mut self, axis: Axis) -> Result<u16, adc::Error> {
        let channel = match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        };
        self.adc.blocking_read(channel)
    }
}
