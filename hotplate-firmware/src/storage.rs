//! Settings persistence
//!
//! The operator settings live in a sequential-storage map in the last 64KB
//! of flash, so repeated saves are spread over the partition.

use defmt::*;
use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{self, Key, SerializationError};

use hotplate_core::config::{Settings, SettingsError, MAX_SETTINGS_SIZE};

use crate::board::FLASH_SIZE;

/// Size of the settings partition at the end of flash
pub const CONFIG_PARTITION_SIZE: usize = 64 * 1024;
pub const CONFIG_PARTITION_START: usize = FLASH_SIZE - CONFIG_PARTITION_SIZE;

/// Flash range for the settings partition
pub const CONFIG_RANGE: core::ops::Range<u32> =
    (CONFIG_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch buffer for map operations (key + item header + record)
const DATA_BUFFER_SIZE: usize = 128;

/// Storage keys in the settings map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StorageKey {
    /// Operator settings (postcard)
    Settings = 0,
}

impl Key for StorageKey {
    fn serialize_into(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        match buffer.first_mut() {
            Some(byte) => {
                *byte = *self as u8;
                Ok(1)
            }
            None => Err(SerializationError::BufferTooSmall),
        }
    }

    fn deserialize_from(buffer: &[u8]) -> Result<(Self, usize), SerializationError> {
        match buffer.first() {
            Some(0) => Ok((StorageKey::Settings, 1)),
            Some(_) => Err(SerializationError::InvalidFormat),
            None => Err(SerializationError::BufferTooSmall),
        }
    }
}

/// Errors from flash operations
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Storage operation failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small
    BufferTooSmall,
}

/// Settings persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    Flash(FlashError),
    Settings(SettingsError),
}

impl From<FlashError> for StoreError {
    fn from(e: FlashError) -> Self {
        StoreError::Flash(e)
    }
}

impl From<SettingsError> for StoreError {
    fn from(e: SettingsError) -> Self {
        StoreError::Settings(e)
    }
}

/// Wear-levelled settings store
pub struct SettingsStore {
    flash: Flash<'static, FLASH, Async, FLASH_SIZE>,
}

impl SettingsStore {
    pub fn new(flash: Peri<'static, FLASH>, dma: Peri<'static, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    /// Read a value by key into the provided buffer
    ///
    /// Returns the number of bytes read.
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];

        let result = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        )
        .await;

        match result {
            Ok(Some(data)) => {
                let len = data.len();
                if buffer.len() < len {
                    return Err(FlashError::BufferTooSmall);
                }
                buffer[..len].copy_from_slice(data);
                Ok(len)
            }
            Ok(None) => Err(FlashError::NotFound),
            Err(_) => Err(FlashError::Storage),
        }
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];

        map::store_item(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
            &data,
        )
        .await
        .map_err(|_| FlashError::Storage)
    }

    /// Load the stored settings, falling back to defaults
    pub async fn load(&mut self) -> Settings {
        match self.load_inner().await {
            Ok(settings) => {
                info!(
                    "Loaded settings: profile {}, contrast {}, window {}ms",
                    settings.profile_index, settings.contrast, settings.window_ms
                );
                settings
            }
            Err(StoreError::Flash(FlashError::NotFound)) => {
                debug!("No settings in flash, using defaults");
                Settings::new()
            }
            Err(e) => {
                warn!("Failed to load settings: {:?}, using defaults", e);
                Settings::new()
            }
        }
    }

    async fn load_inner(&mut self) -> Result<Settings, StoreError> {
        let mut buffer = [0u8; MAX_SETTINGS_SIZE];
        let len = self.read(StorageKey::Settings, &mut buffer).await?;
        Ok(Settings::decode(&buffer[..len])?)
    }

    /// Persist the settings
    pub async fn save(&mut self, settings: &Settings) -> Result<(), StoreError> {
        let mut record = *settings;
        let mut buffer = [0u8; MAX_SETTINGS_SIZE];
        let bytes = record.encode(&mut buffer)?;
        self.write(StorageKey::Settings, bytes).await?;
        Ok(())
    }
}
