//! Test doubles shared by the unit tests
//!
//! A display surface that records every draw call (so tests can assert on
//! redraw scope) and an in-memory text store speaking the same
//! newline-terminated format as the flash store.

use std::collections::HashMap;
use std::string::String;
use std::vec::Vec;

use crate::editor::buffer::{Line, MAX_LINES};
use crate::traits::display::{Color, DisplaySurface, SurfaceError};
use crate::traits::store::{StoreError, TextStore};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    FillRect {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        color: Color,
    },
    Text {
        text: String,
        x: u16,
        y: u16,
        fg: Color,
        bg: Color,
    },
    Backlight(f32),
    Refresh,
}

/// Display surface that records calls instead of drawing
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    width: u16,
    height: u16,
    font_width: u16,
    font_height: u16,
}

impl RecordingSurface {
    pub fn new(width: u16, height: u16, font_width: u16, font_height: u16) -> Self {
        Self {
            ops: Vec::new(),
            width,
            height,
            font_width,
            font_height,
        }
    }

    /// Number of full-screen clears recorded
    pub fn clear_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Clear(_)))
            .count()
    }

    /// Number of rectangle fills recorded
    pub fn fill_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillRect { .. }))
            .count()
    }

    /// All drawn text runs, in order
    pub fn texts(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Position of the most recent text draw
    pub fn last_text_pos(&self) -> Option<(u16, u16)> {
        self.ops.iter().rev().find_map(|op| match op {
            DrawOp::Text { x, y, .. } => Some((*x, *y)),
            _ => None,
        })
    }

    /// Forget everything recorded so far
    pub fn reset(&mut self) {
        self.ops.clear();
    }
}

impl DisplaySurface for RecordingSurface {
    fn clear(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Clear(color));
        Ok(())
    }

    fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: u16,
        y: u16,
        fg: Color,
        bg: Color,
    ) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
            fg,
            bg,
        });
        Ok(())
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn font_width(&self) -> u16 {
        self.font_width
    }

    fn font_height(&self) -> u16 {
        self.font_height
    }

    fn set_backlight(&mut self, brightness: f32) {
        self.ops.push(DrawOp::Backlight(brightness));
    }

    fn refresh(&mut self) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Refresh);
        Ok(())
    }
}

/// In-memory text store: name -> newline-terminated content
pub struct MemoryStore {
    files: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    /// Seed a file directly
    pub fn put(&mut self, name: &str, content: &str) {
        self.files.insert(name.into(), content.into());
    }

    /// Raw stored content, if present
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(|s| s.as_str())
    }
}

impl TextStore for MemoryStore {
    fn save(&mut self, name: &str, lines: &[Line]) -> Result<(), StoreError> {
        let mut content = String::new();
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        self.files.insert(name.into(), content);
        Ok(())
    }

    fn load(
        &mut self,
        name: &str,
        lines: &mut heapless::Vec<Line, MAX_LINES>,
    ) -> Result<(), StoreError> {
        let content = self.files.get(name).ok_or(StoreError::NotFound)?;

        lines.clear();
        if content.is_empty() {
            return Ok(());
        }
        let mut pieces = content.split('\n').collect::<Vec<_>>();
        // Drop the empty piece after a trailing terminator
        if content.ends_with('\n') {
            pieces.pop();
        }
        for piece in pieces {
            let mut line = Line::new();
            let take = piece.len().min(line.capacity());
            let _ = line.push_str(&piece[..take]);
            if lines.push(line).is_err() {
                break;
            }
        }
        Ok(())
    }
}
