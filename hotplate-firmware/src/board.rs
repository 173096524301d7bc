//! Board wiring
//!
//! Raspberry Pi Pico on the hotplate carrier board:
//!
//! | Function            | Pin        |
//! |---------------------|------------|
//! | Encoder phase A     | GP2        |
//! | Encoder phase B     | GP3        |
//! | Encoder push switch | GP4        |
//! | LCD contrast (VO)   | GP5, PWM2B |
//! | LCD RS / RW / EN    | GP6 / GP7 / GP8 |
//! | LCD D4..D7          | GP9..GP12  |
//! | Heater relay        | GP15       |
//! | MAX6675 SO          | GP16, SPI0 |
//! | MAX6675 CS          | GP17       |
//! | MAX6675 SCK         | GP18, SPI0 |
//!
//! VO is fed from the PWM output through an RC low-pass filter. RW is tied
//! low by firmware, the LCD is write-only.

use embassy_rp::gpio::{Input, Output};
use embassy_rp::peripherals::SPI0;
use embassy_rp::pwm::PwmOutput;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};

use hotplate_drivers::display::Hd44780;
use hotplate_drivers::heater::RelayHeater;
use hotplate_drivers::input::GpioButton;
use hotplate_drivers::sensor::Max6675;

/// MAX6675 SPI clock (the part allows up to 4.3 MHz)
pub const THERMOCOUPLE_SPI_HZ: u32 = 1_000_000;

/// PWM counter top for the LCD contrast output (8-bit duty)
pub const CONTRAST_PWM_TOP: u16 = 255;

/// Flash size of the Pico
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

pub type ThermocoupleSpi = ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, NoDelay>;
pub type Thermocouple = Max6675<ThermocoupleSpi>;
pub type Heater = RelayHeater<Output<'static>>;
pub type Button = GpioButton<Input<'static>>;
pub type Lcd = Hd44780<Output<'static>, PwmOutput<'static>, Delay>;

/// Peripherals owned by the control task
pub struct ControlHardware {
    pub thermocouple: Thermocouple,
    pub heater: Heater,
    pub button: Button,
    pub lcd: Lcd,
    /// LCD RW, held low for as long as the LCD is driven
    pub _lcd_rw: Output<'static>,
}
