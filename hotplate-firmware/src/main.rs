//! Reflow hotplate firmware
//!
//! Main firmware binary for a Raspberry Pi Pico driving a resistive hotplate
//! through a solder reflow profile. A MAX6675 reads the plate thermocouple,
//! a relay switches the heater, and the operator uses a push-rotary encoder
//! and a 16x2 character LCD.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::spi::{self, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use {defmt_rtt as _, panic_probe as _};

use hotplate_core::config::ControlConfig;
use hotplate_drivers::display::Hd44780;
use hotplate_drivers::heater::RelayHeater;
use hotplate_drivers::input::GpioButton;
use hotplate_drivers::sensor::Max6675;

use crate::board::{ControlHardware, CONTRAST_PWM_TOP, THERMOCOUPLE_SPI_HZ};
use crate::storage::SettingsStore;

mod board;
mod channels;
mod storage;
mod tasks;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Hotplate firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Relay first so the heater is off as early as possible
    let heater = RelayHeater::new_active_high(Output::new(p.PIN_15, Level::Low));
    info!("Peripherals initialized");

    let config = ControlConfig::default();
    if let Err(e) = config.validate() {
        error!("Invalid control tunables: {:?}", e);
    }

    let mut store = SettingsStore::new(p.FLASH, p.DMA_CH0);
    let settings = store.load().await;

    // Thermocouple on SPI0, receive only
    let mut spi_config = spi::Config::default();
    spi_config.frequency = THERMOCOUPLE_SPI_HZ;
    let spi = Spi::new_blocking_rxonly(p.SPI0, p.PIN_18, p.PIN_16, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);
    let Ok(device) = ExclusiveDevice::new_no_delay(spi, cs);
    let thermocouple = Max6675::new(device);

    // LCD contrast from PWM slice 2 channel B
    let mut pwm_config = pwm::Config::default();
    pwm_config.top = CONTRAST_PWM_TOP;
    let (_, vo) = Pwm::new_output_b(p.PWM_SLICE2, p.PIN_5, pwm_config).split();
    let vo = unwrap!(vo);

    let mut lcd = Hd44780::new(
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_8, Level::Low),
        [
            Output::new(p.PIN_9, Level::Low),
            Output::new(p.PIN_10, Level::Low),
            Output::new(p.PIN_11, Level::Low),
            Output::new(p.PIN_12, Level::Low),
        ],
        vo,
        Delay,
    );
    let lcd_rw = Output::new(p.PIN_7, Level::Low);
    match lcd.init() {
        Ok(()) => info!("LCD initialized"),
        Err(e) => warn!("LCD init failed: {:?}", e),
    }

    let button = GpioButton::new_active_low(Input::new(p.PIN_4, Pull::Up));
    let phase_a = Input::new(p.PIN_2, Pull::Up);
    let phase_b = Input::new(p.PIN_3, Pull::Up);

    let hw = ControlHardware {
        thermocouple,
        heater,
        button,
        lcd,
        _lcd_rw: lcd_rw,
    };

    spawner.spawn(tasks::storage_task(store)).unwrap();
    spawner.spawn(tasks::encoder_task(phase_a, phase_b)).unwrap();
    spawner
        .spawn(tasks::control_task(hw, config, settings))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
