//! UI task
//!
//! Consumes key events in arrival order and drives the application
//! dispatcher; between keys, refreshes the status bar once per second.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Ticker};

use quill_core::app::App;

use crate::channels::{KEY_EVENTS, LINK_STATE};
use crate::storage::FlashStore;
use crate::surface::BoardSurface;

/// Status bar refresh period
const STATUS_PERIOD_S: u64 = 1;

/// UI task - key dispatch plus periodic status refresh
#[embassy_executor::task]
pub async fn ui_task(mut surface: BoardSurface, mut store: FlashStore) {
    info!("UI task started");

    let mut app = App::new(&surface);
    if app.draw_startup(&mut surface).is_err() {
        error!("Startup screen draw failed");
    }

    let started = Instant::now();
    let mut ticker = Ticker::every(Duration::from_secs(STATUS_PERIOD_S));
    let mut connected = false;

    loop {
        match select(KEY_EVENTS.receive(), ticker.next()).await {
            Either::First(key) => {
                if let Err(e) = app.handle_key(key, &mut surface, &mut store) {
                    warn!("Draw failed: {:?}", e);
                }
            }
            Either::Second(()) => {
                if let Some(up) = LINK_STATE.try_take() {
                    connected = up;
                }
                let uptime_s = started.elapsed().as_secs() as u32;
                if let Err(e) = app.refresh_status(&mut surface, connected, uptime_s) {
                    warn!("Status refresh failed: {:?}", e);
                }
            }
        }
    }
}
