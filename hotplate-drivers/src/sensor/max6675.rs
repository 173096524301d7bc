//! MAX6675 K-type thermocouple converter
//!
//! The converter shifts out one 16-bit frame per chip-select cycle:
//!
//! | Bit    | Meaning                          |
//! |--------|----------------------------------|
//! | 15     | dummy sign bit, always 0         |
//! | 14..3  | temperature, 0.25°C per count    |
//! | 2      | thermocouple input open          |
//! | 1      | device ID, always 0              |
//! | 0      | tri-state                        |
//!
//! Raising chip select starts a new conversion (0.17 s typical), so the
//! sensor should be read at most once per control tick.

use embedded_hal::spi::SpiDevice;
use hotplate_core::traits::{SensorError, TemperatureSensor};

/// Open thermocouple flag
const OPEN_CIRCUIT_MASK: u16 = 0b0000_0000_0000_0100;

/// Bits that read as zero on a healthy bus
const FIXED_ZERO_MASK: u16 = 0b1000_0000_0000_0010;

/// Full scale (1023.75°C); the converter pins here when saturated
const MAX_COUNTS: u16 = 0x0FFF;

/// MAX6675 over an SPI device (mode 0, at most 4.3 MHz)
pub struct Max6675<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Max6675<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Read the raw 16-bit frame
    pub fn read_raw(&mut self) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.spi.read(&mut buf).map_err(|_| SensorError::Bus)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Release the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

/// Decode a frame into tenths of a degree
pub fn decode_frame(raw: u16) -> Result<i16, SensorError> {
    if raw & OPEN_CIRCUIT_MASK != 0 {
        return Err(SensorError::OpenCircuit);
    }
    if raw & FIXED_ZERO_MASK != 0 {
        return Err(SensorError::Bus);
    }

    let counts = (raw >> 3) & MAX_COUNTS;
    if counts == MAX_COUNTS {
        return Err(SensorError::OutOfRange);
    }
    // 0.25°C per count = 2.5 tenths
    Ok((u32::from(counts) * 5 / 2) as i16)
}

impl<SPI: SpiDevice> TemperatureSensor for Max6675<SPI> {
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
        decode_frame(self.read_raw()?)
    }
}
