//! TTL serial keyboard decoding for the Quill terminal
//!
//! A keyboard behind a USB-to-TTL adapter shows up as a noisy, bursty byte
//! stream on a UART. This crate turns that stream into clean logical key
//! events:
//!
//! - Fixed byte-to-key mapping (control bytes and printable ASCII)
//! - Noise filtering (stray 0x00/0xFF bytes from the adapter)
//! - Within-batch and cross-batch duplicate suppression
//! - Link liveness tracking based on a rolling activity timeout
//!
//! All logic is time-fed (callers pass a monotonic millisecond counter), so
//! the crate has no hardware dependencies and tests run on the host.

#![cfg_attr(not(test), no_std)]

pub mod decoder;
pub mod event;

pub use decoder::{KeyboardDecoder, LinkEdge, CONNECT_TIMEOUT_MS, DUPLICATE_WINDOW_MS, MAX_BATCH};
pub use event::KeyEvent;
