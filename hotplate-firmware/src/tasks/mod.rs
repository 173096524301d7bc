//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod control;
pub mod encoder;
pub mod storage;

pub use control::control_task;
pub use encoder::encoder_task;
pub use storage::storage_task;
