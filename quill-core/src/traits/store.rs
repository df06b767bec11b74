//! Persistent text storage trait
//!
//! The editor persists its buffer as a plain text file: one stored line per
//! editor line, newline-terminated. Save and load are whole-file
//! operations; there are no incremental or append semantics.

use heapless::Vec;

use crate::editor::buffer::{Line, MAX_LINES};

/// Default filename for editor save/load
pub const DEFAULT_FILE: &str = "notes.txt";

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Named file does not exist
    NotFound,
    /// Underlying storage could not be accessed
    Io,
    /// Content exceeds what the store can hold
    TooLarge,
}

/// Whole-file text persistence
///
/// Implementations may back this with flash, an SD card, or host files.
/// Stored lines longer than the editor's line capacity are truncated on
/// load.
pub trait TextStore {
    /// Write all lines to the named file, replacing previous content
    fn save(&mut self, name: &str, lines: &[Line]) -> Result<(), StoreError>;

    /// Replace `lines` with the named file's content
    ///
    /// An empty file yields an empty `lines` vec; callers decide how to
    /// represent that (the editor substitutes a single empty line).
    fn load(&mut self, name: &str, lines: &mut Vec<Line, MAX_LINES>) -> Result<(), StoreError>;
}
