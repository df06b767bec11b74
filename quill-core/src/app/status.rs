//! Status bar with per-field change detection
//!
//! Refreshed on a fixed cadence, independent of key-driven redraws. Every
//! field repaints only when its value changed since the last refresh - a
//! repaint is an SPI transfer, and the common case is "nothing changed".
//! The one exception: the first refresh after a mode or screen change
//! clears the whole status region once, then draws every field.

use core::fmt::Write;

use heapless::String;

use crate::app::machine::Mode;
use crate::editor::render::STATUS_BAR_HEIGHT;
use crate::traits::display::{Color, DisplaySurface, SurfaceError};

/// Height of one status row in pixels (two rows fit the bar)
const FIELD_HEIGHT: u16 = 15;

/// Editor-derived fields, present only in edit mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorStatus {
    /// Cursor (row, column), zero-based
    pub cursor: (usize, usize),
    pub unsaved: bool,
    pub frozen: bool,
}

/// Everything the status bar shows, sampled once per refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub connected: bool,
    pub mode: Mode,
    pub uptime_s: u32,
    pub editor: Option<EditorStatus>,
}

/// Values as they currently appear on screen
///
/// `None` means "not drawn" and forces a repaint on the next refresh.
#[derive(Debug, Clone, Copy, Default)]
struct LastDrawn {
    /// Whole status region cleared and ready for field draws
    initialized: bool,
    connected: Option<bool>,
    mode: Option<Mode>,
    uptime_s: Option<u32>,
    cursor: Option<(usize, usize)>,
    unsaved: Option<bool>,
    frozen: Option<bool>,
}

/// Incrementally-redrawn status bar
#[derive(Debug, Default)]
pub struct StatusBar {
    last: LastDrawn,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate everything drawn
    ///
    /// Call after any full-screen change (mode switch, menu redraw); the
    /// next refresh clears the status region and repaints all fields.
    pub fn mark_screen_changed(&mut self) {
        self.last = LastDrawn::default();
    }

    /// Redraw the fields whose values changed
    pub fn refresh<D: DisplaySurface>(
        &mut self,
        snap: &StatusSnapshot,
        display: &mut D,
    ) -> Result<(), SurfaceError> {
        let width = display.width();
        let top = display.height().saturating_sub(STATUS_BAR_HEIGHT);
        let second = top + FIELD_HEIGHT;

        // Field columns, right-anchored like the original layout
        let uptime_x = width.saturating_sub(50);
        let mode_x = width.saturating_sub(120);
        let frozen_x = 140u16.min(mode_x);

        if !self.last.initialized {
            display.fill_rect(0, top, width, STATUS_BAR_HEIGHT, Color::BLACK)?;
            self.last = LastDrawn {
                initialized: true,
                ..LastDrawn::default()
            };
        }

        if self.last.connected != Some(snap.connected) {
            display.fill_rect(10, top, mode_x.saturating_sub(20), FIELD_HEIGHT, Color::BLACK)?;
            let (text, color) = if snap.connected {
                ("TTL-KB: Connected", Color::GREEN)
            } else {
                ("TTL-KB: Waiting...", Color::RED)
            };
            display.draw_text(text, 10, top, color, Color::BLACK)?;
            self.last.connected = Some(snap.connected);
        }

        if self.last.mode != Some(snap.mode) {
            display.fill_rect(
                mode_x,
                top,
                uptime_x.saturating_sub(mode_x),
                FIELD_HEIGHT,
                Color::BLACK,
            )?;
            let color = match snap.mode {
                Mode::Command => Color::CYAN,
                Mode::Edit => Color::GREEN,
            };
            display.draw_text(snap.mode.label(), mode_x, top, color, Color::BLACK)?;
            self.last.mode = Some(snap.mode);
        }

        if self.last.uptime_s != Some(snap.uptime_s) {
            display.fill_rect(uptime_x, top, width - uptime_x, FIELD_HEIGHT, Color::BLACK)?;
            let mut text: String<12> = String::new();
            let _ = write!(text, "{}s", snap.uptime_s);
            display.draw_text(&text, uptime_x, top, Color::YELLOW, Color::BLACK)?;
            self.last.uptime_s = Some(snap.uptime_s);
        }

        match snap.editor {
            Some(editor) => {
                if self.last.cursor != Some(editor.cursor) {
                    display.fill_rect(
                        10,
                        second,
                        frozen_x.saturating_sub(10),
                        FIELD_HEIGHT,
                        Color::BLACK,
                    )?;
                    let mut text: String<16> = String::new();
                    let _ = write!(text, "L:{} C:{}", editor.cursor.0 + 1, editor.cursor.1 + 1);
                    display.draw_text(&text, 10, second, Color::WHITE, Color::BLACK)?;
                    self.last.cursor = Some(editor.cursor);
                }

                if self.last.frozen != Some(editor.frozen) {
                    display.fill_rect(
                        frozen_x,
                        second,
                        uptime_x.saturating_sub(frozen_x),
                        FIELD_HEIGHT,
                        Color::BLACK,
                    )?;
                    if editor.frozen {
                        display.draw_text("INPUT FROZEN!", frozen_x, second, Color::RED, Color::BLACK)?;
                    }
                    self.last.frozen = Some(editor.frozen);
                }

                if self.last.unsaved != Some(editor.unsaved) {
                    display.fill_rect(uptime_x, second, width - uptime_x, FIELD_HEIGHT, Color::BLACK)?;
                    let (text, color) = if editor.unsaved {
                        ("*MOD*", Color::RED)
                    } else {
                        ("SAVED", Color::GREEN)
                    };
                    display.draw_text(text, uptime_x, second, color, Color::BLACK)?;
                    self.last.unsaved = Some(editor.unsaved);
                }
            }
            None => {
                // Leaving edit mode: wipe the editor row once
                if self.last.cursor.is_some()
                    || self.last.unsaved.is_some()
                    || self.last.frozen.is_some()
                {
                    display.fill_rect(0, second, width, FIELD_HEIGHT, Color::BLACK)?;
                    self.last.cursor = None;
                    self.last.unsaved = None;
                    self.last.frozen = None;
                }
            }
        }

        Ok(())
    }
}
