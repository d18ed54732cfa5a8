//! Async OLED note readout for joytone, on an SSD1306 (128×64).
//!
//! This crate provides [`OledDriver`], a wrapper around the [`ssd1306`]
//! crate in async buffered-graphics mode, and [`display_update_task`], a
//! periodic loop that renders the control loop's latest
//! [`StepOutcome`](joytone::StepOutcome) and the current octave shift.
//!
//! # Quick Start
//!
//! ```ignore
//! use joytone_oled_display_rs::{display_update_task, DisplayConfig, OledDriver, DEFAULT_ADDRESS};
//!
//! // In your Embassy main:
//! let oled = OledDriver::new(i2c_oled, DEFAULT_ADDRESS);
//! spawner.spawn(oled_task(oled, status, &OCTAVE, DisplayConfig::default())).unwrap();
//!
//! // Thin task wrapper (Embassy tasks cannot be generic):
//! #[embassy_executor::task]
//! async fn oled_task(
//!     driver: OledDriver<MyI2cType>,
//!     status: &'static Mutex<CriticalSectionRawMutex, StepOutcome>,
//!     octave: &'static OctaveState,
//!     config: DisplayConfig,
//! ) {
//!     display_update_task(driver, status, octave, config).await;
//! }
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`** *(default)*: structured logging via [`defmt`].
//! - **`task`**: [`display_update_task`] and its Embassy dependencies.

#![no_std]

#[cfg(feature = "task")]
pub mod display_task;
pub mod driver;
pub mod error;
pub mod fatal;
pub mod layout;

// ── Re-exports for convenience ───────────────────────────────────────────

#[cfg(feature = "task")]
pub use display_task::{display_update_task, report_fatal};
pub use driver::{OledDriver, DEFAULT_ADDRESS};
pub use error::OledError;
pub use fatal::{fatal_message, report_forever, FATAL_REPORT_PERIOD_MS};
pub use layout::{render_display, DisplayConfig, DisplayState, DisplayStatus, FrameCache};
