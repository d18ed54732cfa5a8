//! SSD1306 driver in async buffered graphics mode.
//!
//! [`OledDriver`] covers the display lifecycle: construction without I2C
//! traffic, explicit async initialisation, text drawing into the frame
//! buffer and flushing it to the panel.

use display_interface_i2c::I2CInterface;
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use embedded_hal_async::i2c::I2c;
use ssd1306::{
    mode::BufferedGraphicsModeAsync, prelude::*, I2CDisplayInterface, Ssd1306Async,
};

use crate::error::OledError;

/// Standard SSD1306 I2C address.
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Concrete display type used internally by [`OledDriver`].
type Display<I2C> = Ssd1306Async<
    I2CInterface<I2C>,
    DisplaySize128x64,
    BufferedGraphicsModeAsync<DisplaySize128x64>,
>;

/// Async driver for an SSD1306 128×64 OLED over I2C.
///
/// # Lifecycle
///
/// 1. [`OledDriver::new()`] builds the driver, no I2C traffic.
/// 2. [`OledDriver::init()`] sends the SSD1306 init sequence.
/// 3. [`OledDriver::clear_buffer()`] / [`OledDriver::draw_text()`] or
///    [`OledDriver::display_mut()`] draw into the frame buffer.
/// 4. [`OledDriver::flush()`] transfers the frame buffer to the panel.
///
/// # Example
///
/// ```no_run
/// use joytone_oled_display_rs::{OledDriver, DEFAULT_ADDRESS};
///
/// # async fn example(i2c: impl embedded_hal_async::i2c::I2c) {
/// let mut oled = OledDriver::new(i2c, DEFAULT_ADDRESS);
/// oled.init().await.unwrap();
/// oled.clear_buffer();
/// oled.draw_text(0, 0, "joytone").unwrap();
/// oled.flush().await.unwrap();
/// # }
/// ```
pub struct OledDriver<I2C> {
    display: Display<I2C>,
    initialized: bool,
}

impl<I2C> OledDriver<I2C>
where
    I2C: I2c,
{
    /// Construct an uninitialised driver.
    ///
    /// # Arguments
    /// * `i2c`: I2C peripheral (takes ownership for exclusive access).
    /// * `address`: 7-bit device address, usually [`DEFAULT_ADDRESS`].
    pub fn new(i2c: I2C, address: u8) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let display = Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        Self {
            display,
            initialized: false,
        }
    }

    /// Send the SSD1306 init sequence.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::InitializationFailed`] if the display does not
    /// acknowledge.
    pub async fn init(&mut self) -> Result<(), OledError> {
        self.display
            .init()
            .await
            .map_err(|_| OledError::InitializationFailed)?;
        self.initialized = true;
        Ok(())
    }

    /// Clear the in-memory frame buffer. No I2C traffic.
    pub fn clear_buffer(&mut self) {
        self.display.clear_buffer();
    }

    /// Draw `text` with its top-left corner at (`x`, `y`) in 6×10 font.
    ///
    /// Only touches the frame buffer; call [`flush()`](Self::flush) to
    /// show it.
    ///
    /// # Errors
    ///
    /// [`OledError::NotInitialized`] before [`init()`](Self::init).
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), OledError> {
        let display = self.display_mut().ok_or(OledError::NotInitialized)?;
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(display)?;
        Ok(())
    }

    /// Transfer the frame buffer to the display. About 20 ms at 400 kHz.
    ///
    /// # Errors
    ///
    /// [`OledError::NotInitialized`] before [`init()`](Self::init), or
    /// [`OledError::Display`] on a bus-level failure.
    pub async fn flush(&mut self) -> Result<(), OledError> {
        if !self.initialized {
            return Err(OledError::NotInitialized);
        }
        self.display.flush().await?;
        Ok(())
    }

    /// The underlying `ssd1306` display as an `embedded-graphics`
    /// [`DrawTarget`]. `None` until initialised.
    pub fn display_mut(&mut self) -> Option<&mut Display<I2C>> {
        if self.initialized {
            Some(&mut self.display)
        } else {
            None
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
