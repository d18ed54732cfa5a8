//! PWM square-wave settings for a passive buzzer.
//!
//! A passive buzzer only sounds while it is fed a square wave, so a tone
//! at `f` Hz is one RP2xxx PWM slice counting at `sys_clk / divider` and
//! wrapping every `top + 1` ticks, with the compare level at half the
//! period. This crate does the frequency → register math; writing the
//! registers is left to the HAL.
//!
//! # Architecture
//!
//! - **`limits`**: Counter and divider ranges plus common system clocks.
//! - **[`PwmSettings`]**: Validated divider/top/compare triple for one
//!   frequency.
//!
//! # Quick start
//!
//! ```
//! use buzzer_driver::{PwmSettings, RP2350_SYS_CLK_HZ};
//!
//! let settings = PwmSettings::for_frequency(RP2350_SYS_CLK_HZ, 440.0).unwrap();
//! let actual = settings.actual_frequency(RP2350_SYS_CLK_HZ);
//! assert!((actual - 440.0).abs() < 440.0 * 0.005);
//! ```
//!
//! # Features
//!
//! - **`defmt`**: Enable [`defmt::Format`] implementations for logging.

#![no_std]

pub use error::PwmError;
pub use limits::{MAX_DIVIDER, MAX_TOP, MIN_WRAP, RP2040_SYS_CLK_HZ, RP2350_SYS_CLK_HZ};
pub use settings::PwmSettings;

mod error;
mod limits;
mod settings;
