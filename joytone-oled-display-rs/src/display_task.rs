//! Display update task.
//!
//! [`display_update_task`] periodically snapshots the control loop's
//! latest [`StepOutcome`] and the shared [`OctaveState`], and flushes a
//! new frame to the OLED whenever the snapshot changes.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Delay, Duration, Timer};
use embedded_hal_async::i2c::I2c;

use joytone::{OctaveState, StepOutcome};

use crate::driver::OledDriver;
use crate::fatal::report_forever;
use crate::layout::{render_display, DisplayConfig, DisplayState, FrameCache};

// ── Display update task ──────────────────────────────────────────────────

/// Periodic display update loop.
///
/// A regular `async fn`, not an Embassy `#[task]`, since tasks cannot be
/// generic. Wrap it in a concrete task:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn oled_task(
///     driver: OledDriver<MyConcreteI2cType>,
///     status: &'static Mutex<CriticalSectionRawMutex, StepOutcome>,
///     octave: &'static OctaveState,
///     config: DisplayConfig,
/// ) {
///     display_update_task(driver, status, octave, config).await;
/// }
/// ```
///
/// # Control flow
///
/// 1. Initialise the display hardware.
/// 2. Loop at `config.update_frequency_hz`:
///    - copy the latest outcome out of `status` (mutex held briefly);
///    - build a [`DisplayState`], skip the frame if it is unchanged;
///    - clear, render and flush (no mutex held during I2C).
///
/// # Errors
///
/// * Initialisation failure is fatal: the task reports
///   `"Fatal error: <message>"` every
///   [`FATAL_REPORT_PERIOD_MS`](crate::fatal::FATAL_REPORT_PERIOD_MS) and
///   never draws.
/// * Render / flush failure is logged and retried next cycle.
pub async fn display_update_task<I2C>(
    mut driver: OledDriver<I2C>,
    status: &'static Mutex<CriticalSectionRawMutex, StepOutcome>,
    octave: &'static OctaveState,
    config: DisplayConfig,
) -> !
where
    I2C: I2c,
{
    // ── Initialisation ───────────────────────────────────────────────
    if let Err(e) = driver.init().await {
        report_fatal(e).await;
    }

    #[cfg(feature = "defmt")]
    defmt::info!("OLED initialised");

    let period = Duration::from_millis(config.update_period_ms());
    let mut frames = FrameCache::new();

    // ── Main loop ────────────────────────────────────────────────────
    loop {
        let outcome = *status.lock().await;
        let new_state = DisplayState::from_outcome(&outcome, octave.offset());

        if !frames.is_due(&new_state) {
            Timer::after(period).await;
            continue;
        }

        driver.clear_buffer();
        if let Some(display) = driver.display_mut() {
            if render_display(display, &new_state, &config).is_err() {
                #[cfg(feature = "defmt")]
                defmt::error!("Render failed");
                Timer::after(period).await;
                continue;
            }
        }

        if let Err(_e) = driver.flush().await {
            #[cfg(feature = "defmt")]
            defmt::error!("Flush failed: {}", _e);
        } else {
            frames.mark_shown(new_state);
        }

        Timer::after(period).await;
    }
}

/// Stay inert, reporting `error` every
/// [`FATAL_REPORT_PERIOD_MS`](crate::fatal::FATAL_REPORT_PERIOD_MS) on the
/// Embassy timer.
pub async fn report_fatal<E>(error: E) -> !
where
    E: core::fmt::Display,
{
    report_forever(error, &mut Delay, |_line| {
        #[cfg(feature = "defmt")]
        defmt::error!("{}", _line);
    })
    .await
}
