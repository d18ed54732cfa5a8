//! joytone-hw-interface
//!
//! Joystick → note → buzzer firmware for the Raspberry Pi Pico 2. Wires
//! the library crates into a live instrument:
//!
//! 1. The control task samples the joystick at 60 Hz, turns the stick
//!    angle into one of twelve notes and sounds it on the buzzer while the
//!    stick is pushed past the dead-zone (and the gate button is held).
//! 2. One octave button task per button waits for falling edges on its
//!    pin, debounces them and shifts the shared octave offset.
//! 3. The OLED task wakes on its 30 Hz timer and redraws the current note
//!    whenever it changes.

#![no_std]
#![no_main]

mod buzzer;
mod joystick;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::clocks;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C1;
use embassy_rp::pwm::{self, Pwm};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Delay, Instant};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use joytone::{
    ButtonAction, ControlConfig, ControlLoop, OctaveButton, OctaveState, StepOutcome,
    DEBOUNCE_WINDOW_US,
};
use joytone_oled_display_rs::{display_update_task, DisplayConfig, OledDriver, DEFAULT_ADDRESS};

use crate::buzzer::PwmBuzzer;
use crate::joystick::AdcJoystick;

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

// ---------------------------------------------------------------------------
// Pins
// ---------------------------------------------------------------------------

/// GPIO numbers of the octave buttons, used as debounce keys.
const OCTAVE_UP_PIN: u8 = 5;
const OCTAVE_DOWN_PIN: u8 = 6;

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Octave offset in semitones. Written by the button tasks, read by the
/// control and OLED tasks.
static OCTAVE: OctaveState = OctaveState::new(0);

/// Latest control loop outcome, published for the OLED task.
static STATUS: StaticCell<Mutex<CriticalSectionRawMutex, StepOutcome>> = StaticCell::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

type OledI2c = I2c<'static, I2C1, i2c::Async>;

type Control = ControlLoop<'static, AdcJoystick<'static>, PwmBuzzer<'static>, Input<'static>>;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Runs the control loop forever at `update_frequency_hz`.
///
/// Each outcome is copied into `status` when the display is enabled. If
/// the OLED task happens to hold the mutex the update is skipped; the
/// next iteration publishes again 16 ms later.
#[embassy_executor::task]
async fn control_task(
    mut control: Control,
    status: &'static Mutex<CriticalSectionRawMutex, StepOutcome>,
) {
    info!("Control task started");
    let publish = control.config().features.display;

    control
        .run(&mut Delay, |outcome| {
            if !publish {
                return;
            }
            if let Ok(mut latest) = status.try_lock() {
                *latest = *outcome;
            }
        })
        .await
}

/// Edge-driven octave button, one instance per button.
///
/// Waits for a falling edge, then hands the timestamp and the current
/// level to the button's debouncer. Accepted edges shift the shared
/// octave offset by ±12 semitones.
#[embassy_executor::task(pool_size = 2)]
async fn octave_button_task(mut pin: Input<'static>, mut button: OctaveButton<'static>) {
    info!("Octave button task started on GP{}", button.pin());

    loop {
        pin.wait_for_falling_edge().await;
        let now_us = Instant::now().as_micros();

        // Active-low: pressed reads low.
        if let Some(action) = button.on_falling_edge(now_us, pin.is_low()) {
            debug!("{}: octave offset {}", action, button.octave().offset());
        }
    }
}

/// Monomorphises the generic `display_update_task` for I2C1.
#[embassy_executor::task]
async fn oled_task(
    driver: OledDriver<OledI2c>,
    status: &'static Mutex<CriticalSectionRawMutex, StepOutcome>,
    octave: &'static OctaveState,
    config: DisplayConfig,
) {
    display_update_task(driver, status, octave, config).await;
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("joytone-hw-interface starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // JOY_X    → GP27  (ADC1)
    // JOY_Y    → GP26  (ADC0)
    // BUZZER   → GP21  (PWM slice 2, channel B)
    // GATE     → GP22  active-low, pull-up enabled
    // OCT_UP   → GP5   active-low, pull-up enabled
    // OCT_DOWN → GP6   active-low, pull-up enabled
    // OLED_SDA → GP14  (I2C1)
    // OLED_SCL → GP15  (I2C1)
    // ———————————————————————————————————————————————————————————————————————

    let config = ControlConfig::default();
    info!(
        "Config: {} Hz, dead zone {}, base note {}",
        config.update_frequency_hz, config.dead_zone, config.base_note_offset
    );

    // Joystick on the blocking ADC.
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let joystick = AdcJoystick::new(
        adc,
        Channel::new_pin(p.PIN_27, Pull::None),
        Channel::new_pin(p.PIN_26, Pull::None),
    );

    // Buzzer, starts silent.
    let pwm = Pwm::new_output_b(p.PWM_SLICE2, p.PIN_21, pwm::Config::default());
    let buzzer = PwmBuzzer::new(pwm, clocks::clk_sys_freq());

    let gate = Input::new(p.PIN_22, Pull::Up);
    let octave_up = Input::new(p.PIN_5, Pull::Up);
    let octave_down = Input::new(p.PIN_6, Pull::Up);

    let control = ControlLoop::new(joystick, buzzer, Some(gate), &OCTAVE, config);
    let status = STATUS.init(Mutex::new(StepOutcome::default()));

    // —— Spawn tasks ————————————————————————————————————————————————————————

    if config.features.display {
        let i2c = I2c::new_async(
            p.I2C1,
            p.PIN_15, // SCL
            p.PIN_14, // SDA
            Irqs,
            i2c::Config::default(),
        );
        let oled_driver = OledDriver::new(i2c, DEFAULT_ADDRESS);
        let display_config = DisplayConfig::default(); // 30 Hz refresh rate

        spawner.spawn(oled_task(oled_driver, status, &OCTAVE, display_config)).unwrap();
    }

    spawner.spawn(control_task(control, status)).unwrap();
    let up = OctaveButton::new(OCTAVE_UP_PIN, ButtonAction::OctaveUp, DEBOUNCE_WINDOW_US, &OCTAVE);
    let down =
        OctaveButton::new(OCTAVE_DOWN_PIN, ButtonAction::OctaveDown, DEBOUNCE_WINDOW_US, &OCTAVE);
    spawner.spawn(octave_button_task(octave_up, up)).unwrap();
    spawner.spawn(octave_button_task(octave_down, down)).unwrap();

    info!("All tasks spawned");
}
