//! Settings writer task
//!
//! Failed writes are reported back so the control task can offer them again.

use defmt::*;

use crate::channels::{SAVE_FAILED, SAVE_REQUEST};
use crate::storage::SettingsStore;

#[embassy_executor::task]
pub async fn storage_task(mut store: SettingsStore) {
    loop {
        let settings = SAVE_REQUEST.wait().await;
        match store.save(&settings).await {
            Ok(()) => warn!(
                "Settings saved: profile {}, contrast {}, verbosity {}, window {}ms",
                settings.profile_index, settings.contrast, settings.verbosity, settings.window_ms
            ),
            Err(e) => {
                error!("Failed to save settings: {:?}", e);
                SAVE_FAILED.signal(settings);
            }
        }
    }
}
