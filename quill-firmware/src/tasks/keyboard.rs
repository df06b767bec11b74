//! Keyboard UART poll task
//!
//! Drains the buffered UART in bounded batches, runs them through the
//! decoder, and forwards emitted key events to the UI task. Liveness is
//! re-evaluated every cycle: a wakeup with no bytes still moves the
//! timeout window forward.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::BufferedUartRx;
use embassy_time::{Instant, Timer};
use embedded_io_async::Read;

use quill_keys::{KeyboardDecoder, LinkEdge, MAX_BATCH};

use crate::channels::{KEY_EVENTS, LINK_STATE};

/// Idle wakeup period for liveness checks when no bytes arrive
const LINK_POLL_MS: u64 = 100;

/// Keyboard task - decodes the TTL byte stream into key events
#[embassy_executor::task]
pub async fn keyboard_task(mut rx: BufferedUartRx) {
    info!("Keyboard task started");

    let mut decoder = KeyboardDecoder::new();
    let mut buf = [0u8; MAX_BATCH];
    let started = Instant::now();

    loop {
        match select(rx.read(&mut buf), Timer::after_millis(LINK_POLL_MS)).await {
            Either::First(Ok(n)) if n > 0 => {
                let now_ms = started.elapsed().as_millis() as u32;
                trace!("RX batch: {} bytes", n);

                decoder.process_batch(&buf[..n], now_ms, |key| {
                    debug!("Key: {:?}", key);
                    // Forward in emission order, dropping if the UI lags
                    if KEY_EVENTS.try_send(key).is_err() {
                        warn!("Key channel full, dropping event");
                    }
                });
            }
            Either::First(Ok(_)) => {}
            Either::First(Err(e)) => {
                warn!("UART read error: {:?}", e);
            }
            Either::Second(()) => {
                // Idle cycle, liveness check below still runs
            }
        }

        let now_ms = started.elapsed().as_millis() as u32;
        match decoder.update_link(now_ms) {
            LinkEdge::Up => {
                info!("TTL keyboard connected");
                LINK_STATE.signal(true);
            }
            LinkEdge::Down => {
                info!("TTL keyboard disconnected (timeout)");
                LINK_STATE.signal(false);
            }
            LinkEdge::None => {}
        }
    }
}
