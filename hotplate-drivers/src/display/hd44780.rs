//! HD44780 character LCD driver
//!
//! Write-only 4-bit interface (RW tied low) for 16x2 modules. Contrast is
//! set by a PWM output feeding VO through an RC filter; a lower VO voltage
//! gives a darker picture.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use hotplate_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};

/// HD44780 commands
mod cmd {
    pub const CLEAR: u8 = 0x01;
    /// Increment cursor, no shift
    pub const ENTRY_MODE: u8 = 0x06;
    /// Display on, cursor and blink off
    pub const DISPLAY_ON: u8 = 0x0C;
    /// 4-bit bus, 2 lines, 5x8 font
    pub const FUNCTION_SET: u8 = 0x28;
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

/// DDRAM address of the first column of each row
const ROW_OFFSETS: [u8; SCREEN_ROWS] = [0x00, 0x40];

/// HD44780 in 4-bit mode
///
/// `data` holds D4..D7 in that order.
pub struct Hd44780<P, C, D> {
    rs: P,
    en: P,
    data: [P; 4],
    contrast: C,
    delay: D,
}

impl<P, C, D> Hd44780<P, C, D>
where
    P: OutputPin,
    C: SetDutyCycle,
    D: DelayNs,
{
    pub fn new(rs: P, en: P, data: [P; 4], contrast: C, delay: D) -> Self {
        Self {
            rs,
            en,
            data,
            contrast,
            delay,
        }
    }

    /// Run the power-on initialization sequence
    ///
    /// Switches the controller to 4-bit mode regardless of the state it was
    /// left in.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50);
        pin(self.rs.set_low())?;
        pin(self.en.set_low())?;

        // Three times 8-bit mode, then 4-bit
        self.write_nibble(0x3)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x3)?;
        self.delay.delay_us(150);
        self.write_nibble(0x3)?;
        self.delay.delay_us(150);
        self.write_nibble(0x2)?;
        self.delay.delay_us(150);

        self.command(cmd::FUNCTION_SET)?;
        self.command(cmd::DISPLAY_ON)?;
        self.clear()?;
        self.command(cmd::ENTRY_MODE)
    }

    fn command(&mut self, value: u8) -> Result<(), DisplayError> {
        self.write_byte(value, false)
    }

    fn write_byte(&mut self, value: u8, is_data: bool) -> Result<(), DisplayError> {
        if is_data {
            pin(self.rs.set_high())?;
        } else {
            pin(self.rs.set_low())?;
        }
        self.write_nibble(value >> 4)?;
        self.write_nibble(value & 0x0F)?;
        // Most instructions complete within 37 µs
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), DisplayError> {
        for (bit, data) in self.data.iter_mut().enumerate() {
            if nibble & (1 << bit) != 0 {
                pin(data.set_high())?;
            } else {
                pin(data.set_low())?;
            }
        }

        // Latched on the falling edge of EN
        pin(self.en.set_high())?;
        self.delay.delay_us(1);
        pin(self.en.set_low())?;
        self.delay.delay_us(1);
        Ok(())
    }

    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        let offset = ROW_OFFSETS
            .get(row as usize)
            .ok_or(DisplayError::InvalidCoordinates)?;
        if col as usize >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.command(cmd::SET_DDRAM_ADDR | (offset + col))
    }
}

fn pin<E>(result: Result<(), E>) -> Result<(), DisplayError> {
    result.map_err(|_| DisplayError::Communication)
}

impl<P, C, D> DisplayBackend for Hd44780<P, C, D>
where
    P: OutputPin,
    C: SetDutyCycle,
    D: DelayNs,
{
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::CLEAR)?;
        self.delay.delay_us(2_000);
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        self.set_cursor(row, col)?;
        let room = SCREEN_COLS - col as usize;
        for byte in text.bytes().take(room) {
            self.write_byte(byte, true)?;
        }
        Ok(())
    }

    fn set_contrast(&mut self, level: u8) -> Result<(), DisplayError> {
        let vo = u16::from(u8::MAX - level);
        self.contrast
            .set_duty_cycle_fraction(vo, u16::from(u8::MAX))
            .map_err(|_| DisplayError::Communication)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        // Writes go straight to DDRAM
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }
}
