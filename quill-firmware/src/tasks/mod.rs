//! Embassy async tasks
//!
//! Two tasks: the keyboard poll task feeds decoded key events into a
//! channel, and the UI task consumes them and keeps the status bar fresh.

pub mod keyboard;
pub mod ui;

pub use keyboard::keyboard_task;
pub use ui::ui_task;
