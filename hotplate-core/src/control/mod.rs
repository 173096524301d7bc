//! Closed-loop temperature control

pub mod pid;

pub use pid::{PidState, WindowedPid};
