//! Encoder polling task
//!
//! Samples the quadrature phases much faster than the control tick and
//! queues each completed detent.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use hotplate_core::input::QuadratureDecoder;

use crate::channels::ROTATION_CHANNEL;

/// Phase sampling period
const ENCODER_POLL_MS: u64 = 2;

#[embassy_executor::task]
pub async fn encoder_task(phase_a: Input<'static>, phase_b: Input<'static>) {
    info!("Encoder task started");

    let mut decoder = QuadratureDecoder::new();
    let mut ticker = Ticker::every(Duration::from_millis(ENCODER_POLL_MS));

    loop {
        ticker.next().await;

        if let Some(rotation) = decoder.update(phase_a.is_high(), phase_b.is_high()) {
            trace!("Detent {:?}", rotation);
            if ROTATION_CHANNEL.try_send(rotation).is_err() {
                debug!("Detent queue full, dropping {:?}", rotation);
            }
        }
    }
}
