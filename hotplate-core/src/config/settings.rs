//! Persisted operator settings
//!
//! The selected profile and display preferences survive power cycles. The
//! record is serialized with postcard and protected by magic, version and a
//! CRC so that blank or stale flash falls back to defaults.

use serde::{Deserialize, Serialize};

use super::profiles::PROFILES_NUM;
use super::types::{PID_WINDOW_MAX_MS, PID_WINDOW_MS};

/// Magic number to identify a settings record
pub const SETTINGS_MAGIC: u32 = 0x484F_5450; // "HOTP"

/// Current settings format version
pub const SETTINGS_VERSION: u8 = 1;

/// Upper bound of a serialized settings record
pub const MAX_SETTINGS_SIZE: usize = 32;

/// Default LCD contrast
pub const DEFAULT_CONTRAST: u8 = 96;

/// Contrast change per encoder detent
pub const CONTRAST_STEP: u8 = 8;

/// Highest verbosity level
pub const VERBOSITY_MAX: u8 = 1;

/// Settings encode/decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Serialization failed (buffer too small)
    Encode,
    /// Bytes are not a settings record
    Decode,
    /// Magic or version mismatch
    InvalidFormat,
    /// CRC check failed
    CrcMismatch,
}

/// Operator settings stored in flash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// Last confirmed profile index
    pub profile_index: u8,
    /// LCD contrast (0-255)
    pub contrast: u8,
    /// Display verbosity level
    pub verbosity: u8,
    /// Base PID window (ms)
    pub window_ms: u32,
    /// CRC32 over the fields above
    pub crc: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Factory settings
    pub const fn new() -> Self {
        Self {
            magic: SETTINGS_MAGIC,
            version: SETTINGS_VERSION,
            profile_index: 0,
            contrast: DEFAULT_CONTRAST,
            verbosity: 0,
            window_ms: PID_WINDOW_MS,
            crc: 0,
        }
    }

    /// Check magic and version
    pub fn is_valid(&self) -> bool {
        self.magic == SETTINGS_MAGIC && self.version == SETTINGS_VERSION
    }

    /// Pull every field back into its legal range
    pub fn sanitize(&mut self) {
        if self.profile_index as usize >= PROFILES_NUM {
            self.profile_index = 0;
        }
        self.verbosity = self.verbosity.min(VERBOSITY_MAX);
        self.window_ms = self.window_ms.clamp(PID_WINDOW_MS, PID_WINDOW_MAX_MS);
    }

    /// CRC32 of the payload fields
    pub fn calculate_crc(&self) -> u32 {
        let mut crc: u32 = 0xFFFF_FFFF;
        crc = crc32_update(crc, &self.magic.to_le_bytes());
        crc = crc32_update(crc, &[self.version, self.profile_index, self.contrast, self.verbosity]);
        crc = crc32_update(crc, &self.window_ms.to_le_bytes());
        !crc
    }

    /// Update the CRC field
    pub fn update_crc(&mut self) {
        self.crc = self.calculate_crc();
    }

    /// Verify the CRC is correct
    pub fn verify_crc(&self) -> bool {
        self.crc == self.calculate_crc()
    }

    /// Serialize into `buffer`, refreshing the CRC first
    pub fn encode<'a>(&mut self, buffer: &'a mut [u8]) -> Result<&'a mut [u8], SettingsError> {
        self.update_crc();
        postcard::to_slice(self, buffer).map_err(|_| SettingsError::Encode)
    }

    /// Deserialize and validate a stored record
    pub fn decode(bytes: &[u8]) -> Result<Self, SettingsError> {
        let mut settings: Settings =
            postcard::from_bytes(bytes).map_err(|_| SettingsError::Decode)?;

        if !settings.is_valid() {
            return Err(SettingsError::InvalidFormat);
        }
        if !settings.verify_crc() {
            return Err(SettingsError::CrcMismatch);
        }

        settings.sanitize();
        Ok(settings)
    }
}

/// CRC32 update (IEEE 802.3 polynomial, bitwise)
fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
        }
    }

    crc
}
