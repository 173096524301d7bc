//! Inter-task communication channels
//!
//! The encoder task pushes detents that the control task drains each tick.
//! Settings writes run in the storage task, outside the tick's code path.
//! The erase and program still run with interrupts masked on the shared
//! executor, so a write delays the next tick by its duration.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use hotplate_core::config::Settings;
use hotplate_core::input::Rotation;

/// Channel capacity for encoder detents (one tick of fast spinning)
const ROTATION_CHANNEL_SIZE: usize = 32;

/// Encoder detents from the encoder task
pub static ROTATION_CHANNEL: Channel<CriticalSectionRawMutex, Rotation, ROTATION_CHANNEL_SIZE> =
    Channel::new();

/// Latest settings to persist (older pending writes are superseded)
pub static SAVE_REQUEST: Signal<CriticalSectionRawMutex, Settings> = Signal::new();

/// Settings record the storage task failed to write
pub static SAVE_FAILED: Signal<CriticalSectionRawMutex, Settings> = Signal::new();

/// Net detents queued since the last call, without waiting
pub fn drain_detents() -> i8 {
    let mut detents: i8 = 0;
    while let Ok(rotation) = ROTATION_CHANNEL.try_receive() {
        detents = detents.saturating_add(rotation.delta());
    }
    detents
}
