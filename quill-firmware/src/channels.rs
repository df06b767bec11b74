//! Inter-task communication channels
//!
//! Static embassy-sync primitives connecting the keyboard poll task to the
//! UI task. The channel preserves emission order, so keys reach the
//! dispatcher exactly as the decoder produced them.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use quill_keys::KeyEvent;

/// Channel capacity for decoded key events
const KEY_CHANNEL_SIZE: usize = 16;

/// Decoded key events from the keyboard task, in emission order
pub static KEY_EVENTS: Channel<CriticalSectionRawMutex, KeyEvent, KEY_CHANNEL_SIZE> =
    Channel::new();

/// Keyboard link state, signaled on every edge (true = connected)
pub static LINK_STATE: Signal<CriticalSectionRawMutex, bool> = Signal::new();
