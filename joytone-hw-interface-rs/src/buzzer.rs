//! Passive buzzer on one PWM channel.

use buzzer_driver::{PwmError, PwmSettings};
use embassy_rp::pwm::{Config, Pwm};
use joytone::ToneOutput;

/// Square-wave [`ToneOutput`] on channel B of a PWM slice.
///
/// Silence is `compare_b = 0`; the slice itself keeps running so that
/// retuning and re-enabling only rewrite registers.
pub struct PwmBuzzer<'d> {
    pwm: Pwm<'d>,
    config: Config,
    sys_clk_hz: u32,
    /// 50% duty compare for the current frequency.
    compare: u16,
    enabled: bool,
}

impl<'d> PwmBuzzer<'d> {
    pub fn new(pwm: Pwm<'d>, sys_clk_hz: u32) -> Self {
        let mut config = Config::default();
        config.compare_b = 0;

        let mut buzzer = Self {
            pwm,
            config,
            sys_clk_hz,
            compare: 0,
            enabled: false,
        };
        buzzer.apply();
        buzzer
    }

    fn apply(&mut self) {
        self.config.compare_b = if self.enabled { self.compare } else { 0 };
        self.pwm.set_config(&self.config);
    }
}

impl ToneOutput for PwmBuzzer<'_> {
    type Error = PwmError;

    fn set_frequency(&mut self, frequency_hz: f32) -> Result<(), PwmError> {
        let settings = PwmSettings::for_frequency(self.sys_clk_hz, frequency_hz)?;
        self.config.divider = settings.divider.into();
        self.config.top = settings.top;
        self.compare = settings.compare;
        self.apply();
        Ok(())
    }

    fn enable(&mut self) {
        self.enabled = true;
        self.apply();
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.apply();
    }
}
