//! STM32F103 Blue Pill Calendar Clock with Temperature Display
//! =============================================================================================
//!
//! This firmware implements a calendar/clock with temperature readout using:
//! - SSD1306 OLED display (128x64) via I2C1
//! - Potentiometer for field adjustment
//! - Four push buttons for mode switching
//! - Internal die temperature sensor, averaged over the last 36 samples
//!
//! Hardware Connections:
//!   OLED Display -> Blue Pill
//!      GND  -> GND
//!      VCC  -> 5V
//!      SDA  -> PB7
//!      SCL  -> PB6
//!
//!   Potentiometer:
//!      Wiper -> PA0 (ADC1_IN0), ends to 3.3V and GND
//!
//!   Buttons (to GND, internal pull-up):
//!      S1 -> PB12 (enter edit mode)
//!      S2 -> PB13 (next field)
//!      S3 -> PB14 (unused)
//!      S4 -> PB15 (confirm and leave edit mode)
//!
//! Features:
//! 1. Month/day/time display with a fixed 365 day calendar
//! 2. Edit mode with underlined field; the clock is frozen while editing
//! 3. Potentiometer moves the selected field relative to where it was
//! 4. Celsius and Fahrenheit temperature lines
//! 5. Onboard LED heartbeat indicator

#![no_std]
#![no_main]

use calendar_clock::{
    CalendarFields, Controller, EngineConfig, Frame, HardwareFault, Inputs, SharedClock, compose,
    hardware::{
        gpio_button::{ButtonBank, GpioButton},
        gpio_led::GpioLed,
        traits::Led,
    },
    temperature::Calibration,
};
use calendar_clock_firmware::{render, sampler::Sampler};
use chrono::NaiveDate;
use defmt::{Debug2Format, info, unwrap, warn};
use defmt_rtt as _; // Global logger
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_stm32::{
    adc::Adc,
    bind_interrupts,
    gpio::{Input, Level, Output, Pull, Speed},
    i2c::{self, ErrorInterruptHandler, EventInterruptHandler},
    peripherals,
    time::Hertz,
};
use embassy_sync::{
    blocking_mutex::raw::ThreadModeRawMutex,
    channel::{Channel, Receiver, Sender},
    signal::Signal,
};
use embassy_time::{Duration, Ticker};
use panic_probe as _; // Panic handler
use ssd1306::{I2CDisplayInterface, Ssd1306, prelude::*};

// Seconds counter shared by the tick task and the controller
static CLOCK: SharedClock = SharedClock::new(0);

// Channel for frames from the controller to the display task
static FRAME_CHANNEL: Channel<ThreadModeRawMutex, Frame, 2> = Channel::new();

// Display health reported back to the controller: Some(fault) or None once recovered
static DISPLAY_STATUS: Signal<ThreadModeRawMutex, Option<HardwareFault>> = Signal::new();

/// Temperature sensor readings at 30 and 85 degrees C.
///
/// The F103 has no factory calibration, these follow the datasheet typicals
/// (1.43 V at 25 C, -4.3 mV/C) with a 3.3 V reference.
const CALIBRATION_30C: u16 = 1748;
const CALIBRATION_85C: u16 = 1454;

type BoardButtons = ButtonBank<GpioButton<Input<'static>>>;

/// Main application entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // Initialize peripherals with default configuration
    let p = embassy_stm32::init(Default::default());
    info!("Calendar clock started");

    // Power-up time May 13th 23:59:59. Days are shown 0-based, so the
    // screen reads "May 12 23:59:59".
    match NaiveDate::from_ymd_opt(2025, 5, 13).and_then(|d| d.and_hms_opt(23, 59, 59)) {
        Some(start) => CLOCK.set(compose(&CalendarFields::from_datetime(&start))),
        None => warn!("invalid power-up time, showing \"Jan 00 00:00:00\""),
    }

    // Bind I2C interrupt handlers
    bind_interrupts!(struct Irqs {
        I2C1_EV => EventInterruptHandler<peripherals::I2C1>;
        I2C1_ER => ErrorInterruptHandler<peripherals::I2C1>;
    });

    // Configure I2C peripheral at 400kHz
    let i2c = i2c::I2c::new(
        p.I2C1,
        p.PB6,
        p.PB7,
        Irqs,
        p.DMA1_CH6,
        p.DMA1_CH7,
        Hertz::khz(400),
        Default::default(),
    );

    // Buttons pull to ground when pressed
    let buttons = ButtonBank::new([
        GpioButton::new(Input::new(p.PB12, Pull::Up)),
        GpioButton::new(Input::new(p.PB13, Pull::Up)),
        GpioButton::new(Input::new(p.PB14, Pull::Up)),
        GpioButton::new(Input::new(p.PB15, Pull::Up)),
    ]);

    let sampler = Sampler::new(Adc::new(p.ADC1), p.PA0);

    let calibration = unwrap!(Calibration::new(CALIBRATION_30C, CALIBRATION_85C));
    let controller = Controller::new(EngineConfig::default(), calibration);

    // Spawn 1 Hz tick task
    unwrap!(spawner.spawn(tick(Duration::from_secs(1))));

    // Spawn OLED display task
    unwrap!(spawner.spawn(oled_display(
        i2c,
        FRAME_CHANNEL.receiver(),
        Duration::from_millis(500), // Cursor blink interval
    )));

    // Spawn input/controller task
    unwrap!(spawner.spawn(control(
        controller,
        buttons,
        sampler,
        FRAME_CHANNEL.sender(),
        Duration::from_millis(10), // Polling interval
    )));

    // Configure onboard LED (PC13) as heartbeat indicator
    let mut led = GpioLed::new(Output::new(p.PC13, Level::High, Speed::Low));
    let mut ticker = Ticker::every(Duration::from_millis(500));

    // Main heartbeat loop - blinks onboard LED
    loop {
        led.on();
        ticker.next().await;
        led.off();
        ticker.next().await;
    }
}

/// 1 Hz Time Base
///
/// Only counts and raises flags; everything else happens in the controller.
#[embassy_executor::task]
async fn tick(period: Duration) {
    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;
        CLOCK.tick();
    }
}

/// Input and Controller Task
///
/// Responsibilities:
/// 1. Sample buttons and potentiometer
/// 2. Take a temperature sample once per second
/// 3. Run the edit state machine
/// 4. Forward frames to the display task
#[embassy_executor::task]
async fn control(
    mut controller: Controller,
    mut buttons: BoardButtons,
    mut sampler: Sampler<'static, peripherals::PA0>,
    frames: Sender<'static, ThreadModeRawMutex, Frame, 2>,
    delay: Duration,
) {
    let mut ticker = Ticker::every(delay);
    let mut dial = 0;

    loop {
        match DISPLAY_STATUS.try_take() {
            Some(Some(fault)) => controller.report_fault(&CLOCK, fault),
            Some(None) => controller.clear_fault(&CLOCK, HardwareFault::Display),
            None => {}
        }

        let mut adc_ok = true;
        match sampler.dial().await {
            Ok(value) => dial = value,
            Err(fault) => {
                controller.report_fault(&CLOCK, fault);
                adc_ok = false;
            }
        }

        let temperature = if CLOCK.take_sample_due() {
            match sampler.temperature().await {
                Ok(raw) => Some(raw),
                Err(fault) => {
                    controller.report_fault(&CLOCK, fault);
                    adc_ok = false;
                    None
                }
            }
        } else {
            None
        };

        if adc_ok {
            controller.clear_fault(&CLOCK, HardwareFault::AdcTimeout);
        }

        let inputs = Inputs {
            buttons: buttons.read(),
            dial,
            temperature,
        };
        if let Some(frame) = controller.poll(&CLOCK, &inputs) {
            // Only the newest frame matters
            frames.clear();
            frames.send(frame).await;
        }

        ticker.next().await;
    }
}

/// OLED Display Rendering Task
///
/// Responsibilities:
/// 1. Manage SSD1306 display interface
/// 2. Render the latest frame
/// 3. Blink the edit underline
/// 4. Report display failures
#[embassy_executor::task]
async fn oled_display(
    i2c: i2c::I2c<'static, embassy_stm32::mode::Async>,
    frames: Receiver<'static, ThreadModeRawMutex, Frame, 2>,
    blink_interval: Duration,
) {
    // Initialize display interface and controller
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();

    let mut healthy = true;
    if let Err(e) = display.init() {
        warn!("display init failed: {}", Debug2Format(&e));
        DISPLAY_STATUS.signal(Some(HardwareFault::Display));
        healthy = false;
    }

    let mut blink = Ticker::every(blink_interval);
    let mut cursor_visible = true;
    let mut frame = frames.receive().await;

    loop {
        display.clear_buffer();
        let result =
            render::draw_frame(&mut display, &frame, cursor_visible).and_then(|()| display.flush());

        match result {
            Err(e) if healthy => {
                warn!("display write failed: {}", Debug2Format(&e));
                DISPLAY_STATUS.signal(Some(HardwareFault::Display));
                healthy = false;
            }
            Ok(()) if !healthy => {
                info!("display recovered");
                DISPLAY_STATUS.signal(None);
                healthy = true;
            }
            _ => {}
        }

        // Redraw on a new frame or on the next blink phase
        match select(frames.receive(), blink.next()).await {
            Either::First(next) => frame = next,
            Either::Second(()) => cursor_visible = !cursor_visible,
        }
    }
}
