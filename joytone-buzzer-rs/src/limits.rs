//! Hardware limits of an RP2xxx PWM slice.
//!
//! The counter runs at `sys_clk / divider` and wraps after `top`, so one
//! PWM period is `divider * (top + 1)` system clock cycles.

// ---------------------------------------------------------------------------
// Counter
// ---------------------------------------------------------------------------

/// Largest value of the 16-bit `TOP` register.
pub const MAX_TOP: u16 = u16::MAX;

/// Smallest period (`top + 1`) accepted when computing settings.
///
/// Rounding `top` to an integer costs at most half a tick, so a period of
/// 100 ticks or more keeps the frequency error under 0.5%.
pub const MIN_WRAP: u32 = 100;

// ---------------------------------------------------------------------------
// Clock divider
// ---------------------------------------------------------------------------

/// Largest integer part of the 8.4 fractional divider.
pub const MAX_DIVIDER: u8 = u8::MAX;

// ---------------------------------------------------------------------------
// System clocks
// ---------------------------------------------------------------------------

/// Default `clk_sys` of the RP2350 (Pico 2).
pub const RP2350_SYS_CLK_HZ: u32 = 150_000_000;

/// Default `clk_sys` of the RP2040 (Pico).
pub const RP2040_SYS_CLK_HZ: u32 = 125_000_000;
