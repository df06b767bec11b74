//! Editor text buffer
//!
//! An ordered sequence of bounded lines plus a cursor. Mutations enforce
//! the line and column limits and report the smallest display region that
//! needs repainting as a [`Redraw`] hint.
//!
//! Capacity overflow is not an error: once the buffer cannot grow further,
//! `input_frozen` latches and every mutating operation becomes a no-op
//! until an explicit [`clear`](TextBuffer::clear).

use core::fmt::Write;

use heapless::{String, Vec};
use quill_keys::KeyEvent;

use crate::traits::store::{StoreError, TextStore};

/// Maximum number of lines the buffer holds
pub const MAX_LINES: usize = 80;

/// Line capacity in characters; the runtime limit never exceeds this
pub const MAX_LINE_CHARS: usize = 38;

/// Smallest usable runtime line limit
pub const MIN_LINE_CHARS: usize = 10;

/// Spaces inserted per Tab key
const TAB_WIDTH: usize = 4;

/// One editor line
pub type Line = String<MAX_LINE_CHARS>;

/// Smallest display region a mutation invalidated
///
/// Consumed by [`render::apply`](crate::editor::render::apply). Row and
/// column are text-cell indices, not pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Redraw {
    /// Nothing changed
    None,
    /// One character cell
    Cell { row: usize, col: usize },
    /// A line from `col` to its end (insertion shifted the suffix)
    Tail { row: usize, col: usize },
    /// One whole line
    Line { row: usize },
    /// Two whole lines (a split)
    Rows { top: usize, bottom: usize },
    /// Line indices shifted; repaint the text area
    Full,
}

/// The editor's text buffer and cursor
///
/// Invariant: at least one line exists, `cursor_row < lines.len()`, and
/// `cursor_col <= lines[cursor_row].len()`.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<Line, MAX_LINES>,
    cursor_row: usize,
    cursor_col: usize,
    /// Runtime per-line character limit, in [MIN_LINE_CHARS, MAX_LINE_CHARS]
    max_length: usize,
    unsaved_changes: bool,
    input_frozen: bool,
}

impl TextBuffer {
    /// Create an empty buffer with the given per-line limit
    ///
    /// The limit comes from the display geometry (see
    /// [`compute_max_length`](crate::editor::render::compute_max_length))
    /// and is clamped to the supported range.
    pub fn new(max_length: usize) -> Self {
        let mut lines = Vec::new();
        // Capacity is MAX_LINES >= 1
        let _ = lines.push(Line::new());

        Self {
            lines,
            cursor_row: 0,
            cursor_col: 0,
            max_length: max_length.clamp(MIN_LINE_CHARS, MAX_LINE_CHARS),
            unsaved_changes: false,
            input_frozen: false,
        }
    }

    /// Insert a printable character at the cursor
    ///
    /// A full line wraps: the character opens a new line below and lands at
    /// its start. When no new line fits, input freezes and the character is
    /// dropped.
    pub fn insert_char(&mut self, ch: char) -> Redraw {
        if self.input_frozen {
            return Redraw::None;
        }

        if self.cursor_col >= self.max_length {
            if self.lines.len() >= MAX_LINES {
                self.input_frozen = true;
                return Redraw::None;
            }

            let mut line = Line::new();
            // Capacity MAX_LINE_CHARS >= 1
            let _ = line.push(ch);
            // Index is valid: cursor_row < lines.len() and len < MAX_LINES
            let _ = self.lines.insert(self.cursor_row + 1, line);
            self.cursor_row += 1;
            self.cursor_col = 1;
            self.check_freeze();
            self.unsaved_changes = true;
            return Redraw::Cell {
                row: self.cursor_row,
                col: 0,
            };
        }

        let col = self.cursor_col;
        if !insert_at(&mut self.lines[self.cursor_row], col, ch) {
            // Line is at physical capacity (merge artifacts); drop the char
            return Redraw::None;
        }
        self.cursor_col += 1;
        self.check_freeze();
        self.unsaved_changes = true;

        Redraw::Tail {
            row: self.cursor_row,
            col,
        }
    }

    /// Split the current line at the cursor
    ///
    /// Text after the cursor moves to a new line below; the cursor moves to
    /// its start. At the line ceiling this freezes input instead.
    pub fn newline(&mut self) -> Redraw {
        if self.input_frozen {
            return Redraw::None;
        }
        if self.lines.len() >= MAX_LINES {
            self.input_frozen = true;
            return Redraw::None;
        }

        let mut tail = Line::new();
        let line = &mut self.lines[self.cursor_row];
        // ASCII-only content, so byte index == char index
        let _ = tail.push_str(&line[self.cursor_col..]);
        line.truncate(self.cursor_col);

        let _ = self.lines.insert(self.cursor_row + 1, tail);
        self.cursor_row += 1;
        self.cursor_col = 0;
        self.check_freeze();
        self.unsaved_changes = true;

        Redraw::Rows {
            top: self.cursor_row - 1,
            bottom: self.cursor_row,
        }
    }

    /// Delete the character before the cursor
    ///
    /// At column 0 the current line merges onto the end of the previous one
    /// and every later line shifts up, which forces a full repaint.
    pub fn backspace(&mut self) -> Redraw {
        if self.input_frozen {
            return Redraw::None;
        }

        if self.cursor_col > 0 {
            remove_at(&mut self.lines[self.cursor_row], self.cursor_col - 1);
            self.cursor_col -= 1;
            self.unsaved_changes = true;
            Redraw::Line {
                row: self.cursor_row,
            }
        } else if self.cursor_row > 0 {
            let removed = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            let prev = &mut self.lines[self.cursor_row];
            self.cursor_col = prev.len();
            // Overlong merges are truncated at physical line capacity
            let _ = prev.push_str(&removed);
            self.unsaved_changes = true;
            Redraw::Full
        } else {
            Redraw::None
        }
    }

    /// Reset to a single empty line and unfreeze
    ///
    /// The only exit from the frozen state.
    pub fn clear(&mut self) -> Redraw {
        self.lines.clear();
        let _ = self.lines.push(Line::new());
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.unsaved_changes = false;
        self.input_frozen = false;
        Redraw::Full
    }

    /// Apply a key event to the buffer
    ///
    /// Enter splits, Backspace deletes, Space/Tab insert spaces, ESC
    /// resets, printable characters insert. Delete and F10 are not buffer
    /// operations (F10/save is routed by the dispatcher, which owns the
    /// storage collaborator).
    pub fn apply_key(&mut self, key: &KeyEvent) -> Redraw {
        match key {
            KeyEvent::Enter => self.newline(),
            KeyEvent::Backspace => self.backspace(),
            KeyEvent::Esc => self.clear(),
            KeyEvent::Tab => {
                if self.input_frozen {
                    return Redraw::None;
                }
                let (row, col) = (self.cursor_row, self.cursor_col);
                for _ in 0..TAB_WIDTH {
                    self.insert_char(' ');
                }
                if self.cursor_row == row {
                    Redraw::Tail { row, col }
                } else {
                    // The tab wrapped onto a new line
                    Redraw::Full
                }
            }
            KeyEvent::Space => self.insert_char(' '),
            KeyEvent::Char(ch) => self.insert_char(*ch),
            KeyEvent::Delete | KeyEvent::F10 => Redraw::None,
        }
    }

    /// Persist all lines to the store, newline-joined
    ///
    /// Clears the unsaved flag on success.
    pub fn save<S: TextStore>(&mut self, store: &mut S, name: &str) -> Result<(), StoreError> {
        store.save(name, &self.lines)?;
        self.unsaved_changes = false;
        Ok(())
    }

    /// Replace the buffer with the named file's content
    ///
    /// An empty file becomes a single empty line. The cursor resets to the
    /// origin and the caller receives a full-repaint hint. The frozen flag
    /// is untouched: only [`clear`](Self::clear) unfreezes.
    pub fn load<S: TextStore>(&mut self, store: &mut S, name: &str) -> Result<Redraw, StoreError> {
        store.load(name, &mut self.lines)?;
        if self.lines.is_empty() {
            let _ = self.lines.push(Line::new());
        }
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.unsaved_changes = false;
        Ok(Redraw::Full)
    }

    /// Cursor as (row, column)
    pub fn cursor_position(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// Move the cursor, clamped to valid positions
    pub fn set_cursor(&mut self, row: usize, col: usize) {
        self.cursor_row = row.min(self.lines.len() - 1);
        self.cursor_col = col.min(self.lines[self.cursor_row].len());
    }

    /// Line content by row, empty for out-of-range rows
    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map_or("", |l| l.as_str())
    }

    /// Number of lines in the buffer (always at least 1)
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Runtime per-line character limit
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    pub fn is_input_frozen(&self) -> bool {
        self.input_frozen
    }

    /// Human-readable state for the status area
    pub fn status_summary(&self) -> String<48> {
        let mut out = String::new();
        if self.input_frozen {
            let _ = out.push_str("INPUT FROZEN - Max 80 lines reached!");
        } else {
            let _ = write!(
                out,
                "Lines: {}/{}, Chars: {}/{}",
                self.lines.len(),
                MAX_LINES,
                self.cursor_col,
                self.max_length
            );
        }
        out
    }

    /// Latch the frozen flag once the line ceiling is reached
    fn check_freeze(&mut self) {
        if self.lines.len() >= MAX_LINES {
            self.input_frozen = true;
        }
    }
}

/// Insert `ch` at byte index `idx`, shifting the suffix right
///
/// Returns false when the line is at physical capacity.
fn insert_at(line: &mut Line, idx: usize, ch: char) -> bool {
    if line.len() >= MAX_LINE_CHARS {
        return false;
    }
    let mut rebuilt = Line::new();
    let _ = rebuilt.push_str(&line[..idx]);
    let _ = rebuilt.push(ch);
    let _ = rebuilt.push_str(&line[idx..]);
    *line = rebuilt;
    true
}

/// Remove the character at byte index `idx`
fn remove_at(line: &mut Line, idx: usize) {
    let mut rebuilt = Line::new();
    let _ = rebuilt.push_str(&line[..idx]);
    let _ = rebuilt.push_str(&line[idx + 1..]);
    *line = rebuilt;
}
