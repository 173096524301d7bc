//! Configuration types
//!
//! Compile-time tunables, the reflow profile catalog, and the settings record
//! persisted in flash as postcard binary data.

pub mod profiles;
pub mod settings;
pub mod types;

pub use profiles::*;
pub use settings::*;
pub use types::*;
