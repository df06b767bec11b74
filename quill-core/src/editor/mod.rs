//! Line-based text editor
//!
//! [`buffer`] holds the pure buffer state machine (lines, cursor, capacity
//! limits, freeze semantics) and reports each mutation as a [`Redraw`]
//! hint; [`render`] translates hints into minimal display surface calls so
//! a single keystroke never repaints the whole screen.

pub mod buffer;
pub mod render;

pub use buffer::{Redraw, TextBuffer, MAX_LINES, MAX_LINE_CHARS};
pub use render::compute_max_length;
