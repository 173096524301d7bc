//! Control loop task
//!
//! Runs the process controller once per control tick: samples the
//! thermocouple and push switch, applies queued encoder detents, drives the
//! heater relay, and refreshes the LCD when the screen changed.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use hotplate_core::config::{ControlConfig, Settings};
use hotplate_core::process::ProcessController;
use hotplate_core::traits::SensorError;
use hotplate_display::{draw_screen, DisplayBackend, Renderer};

use crate::board::ControlHardware;
use crate::channels::{drain_detents, SAVE_FAILED, SAVE_REQUEST};

#[embassy_executor::task]
pub async fn control_task(mut hw: ControlHardware, config: ControlConfig, settings: Settings) {
    let tick_ms = config.tick_ms;
    info!("Control task started, tick {}ms", tick_ms);

    let mut controller = ProcessController::new(config, settings);
    let mut renderer = Renderer::new();

    let mut contrast = controller.state().contrast;
    if let Err(e) = hw.lcd.set_contrast(contrast) {
        warn!("LCD contrast failed: {:?}", e);
    }

    let mut last_fault: Option<SensorError> = None;
    let start = Instant::now();
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(tick_ms)));

    loop {
        ticker.next().await;

        let now_ms = start.elapsed().as_millis() as u32;
        let detents = drain_detents();

        if let Some(record) = SAVE_FAILED.try_take() {
            controller.save_failed(&record);
        }

        let out = controller.poll(
            now_ms,
            &mut hw.thermocouple,
            &mut hw.button,
            &mut hw.heater,
            detents,
        );

        let state = controller.state();
        if let Some(event) = out.event {
            let uptime_s = state.uptime_ms / 1000;
            let from = state.last_state.label();
            let to = state.system_state.label();
            if event.is_fault() {
                warn!("[{}s] {:?}: {} -> {}, heater off", uptime_s, event, from, to);
            } else {
                info!("[{}s] {:?}: {} -> {}", uptime_s, event, from, to);
            }
        }

        if state.sensor_fault != last_fault {
            match state.sensor_fault {
                Some(fault) => warn!("Thermocouple fault: {:?}", fault),
                None => info!("Thermocouple reading restored"),
            }
            last_fault = state.sensor_fault;
        }

        if let Some(settings) = out.save {
            SAVE_REQUEST.signal(settings);
        }

        if state.contrast != contrast {
            contrast = state.contrast;
            if let Err(e) = hw.lcd.set_contrast(contrast) {
                warn!("LCD contrast failed: {:?}", e);
            }
        }

        let Ok(()) = controller.render(&mut renderer);
        if let Err(e) = draw_screen(&mut hw.lcd, renderer.screen_mut()) {
            warn!("LCD write failed: {:?}", e);
        }
    }
}
