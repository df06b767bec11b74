//! Incremental editor rendering
//!
//! Translates [`Redraw`] hints into the smallest possible display surface
//! calls. Draw calls are SPI transfers and dominate the loop's time budget,
//! so a single keystroke repaints a tail of one line, never the screen.
//!
//! Screen layout, top to bottom: title bar, text area, status bar. Text
//! cell (col, row) sits at `origin + index * font_dimension`.

use crate::editor::buffer::{Redraw, TextBuffer, MAX_LINE_CHARS, MIN_LINE_CHARS};
use crate::traits::display::{Color, DisplaySurface, SurfaceError};

/// Horizontal margin of the text area in pixels
pub const TEXT_MARGIN_X: u16 = 5;

/// Edit-mode title bar height in pixels
pub const TITLE_BAR_HEIGHT: u16 = 25;

/// Top of the text area (below the title bar)
pub const TEXT_ORIGIN_Y: u16 = TITLE_BAR_HEIGHT + 5;

/// Status bar height in pixels (bottom of the screen)
pub const STATUS_BAR_HEIGHT: u16 = 30;

/// Editor foreground/background
const FG: Color = Color::WHITE;
const BG: Color = Color::BLACK;

/// Per-line character limit for a given panel
///
/// Characters that fit between the margins, clamped to the supported
/// range.
pub fn compute_max_length(width: u16, font_width: u16) -> usize {
    let available = width.saturating_sub(2 * TEXT_MARGIN_X);
    let chars = (available / font_width.max(1)) as usize;
    chars.clamp(MIN_LINE_CHARS, MAX_LINE_CHARS)
}

/// Pixel position of a text cell
fn cell_origin<D: DisplaySurface>(display: &D, col: usize, row: usize) -> (u16, u16) {
    (
        TEXT_MARGIN_X + col as u16 * display.font_width(),
        TEXT_ORIGIN_Y + row as u16 * display.font_height(),
    )
}

/// Apply a redraw hint to the display
pub fn apply<D: DisplaySurface>(
    buffer: &TextBuffer,
    redraw: Redraw,
    display: &mut D,
) -> Result<(), SurfaceError> {
    match redraw {
        Redraw::None => Ok(()),
        Redraw::Cell { row, col } => draw_cell(buffer, row, col, display),
        Redraw::Tail { row, col } => draw_tail(buffer, row, col, display),
        Redraw::Line { row } => draw_line(buffer, row, display),
        Redraw::Rows { top, bottom } => {
            draw_line(buffer, top, display)?;
            draw_line(buffer, bottom, display)
        }
        Redraw::Full => draw_all(buffer, display),
    }
}

/// Repaint a single character cell
fn draw_cell<D: DisplaySurface>(
    buffer: &TextBuffer,
    row: usize,
    col: usize,
    display: &mut D,
) -> Result<(), SurfaceError> {
    let (x, y) = cell_origin(display, col, row);
    display.fill_rect(x, y, display.font_width(), display.font_height(), BG)?;

    let line = buffer.line(row);
    if let Some(cell) = line.get(col..col + 1) {
        display.draw_text(cell, x, y, FG, BG)?;
    }
    Ok(())
}

/// Repaint a line from `col` to its end
///
/// Clears the region from the insertion point to the line limit, then
/// draws the remaining text.
fn draw_tail<D: DisplaySurface>(
    buffer: &TextBuffer,
    row: usize,
    col: usize,
    display: &mut D,
) -> Result<(), SurfaceError> {
    let (x, y) = cell_origin(display, col, row);
    let cells = (buffer.max_length().saturating_sub(col)) as u16;
    let width = (cells * display.font_width()).min(display.width().saturating_sub(x));
    display.fill_rect(x, y, width, display.font_height(), BG)?;

    let line = buffer.line(row);
    if let Some(tail) = line.get(col..) {
        if !tail.is_empty() {
            display.draw_text(tail, x, y, FG, BG)?;
        }
    }
    Ok(())
}

/// Repaint one whole line
///
/// The cleared region spans one cell past the line limit so a stale cursor
/// cell cannot survive a shrinking line.
fn draw_line<D: DisplaySurface>(
    buffer: &TextBuffer,
    row: usize,
    display: &mut D,
) -> Result<(), SurfaceError> {
    let (x, y) = cell_origin(display, 0, row);
    let cells = buffer.max_length() as u16 + 1;
    let width = (cells * display.font_width()).min(display.width().saturating_sub(x));
    display.fill_rect(x, y, width, display.font_height(), BG)?;

    let line = buffer.line(row);
    if !line.is_empty() {
        display.draw_text(line, x, y, FG, BG)?;
    }
    Ok(())
}

/// Repaint the whole text area
///
/// Used after merges, loads, and clears, where line indices shift. Rows
/// below the visible area are skipped; the buffer may hold more lines than
/// the panel shows.
fn draw_all<D: DisplaySurface>(buffer: &TextBuffer, display: &mut D) -> Result<(), SurfaceError> {
    let bottom = display.height().saturating_sub(STATUS_BAR_HEIGHT);
    display.fill_rect(
        0,
        TEXT_ORIGIN_Y,
        display.width(),
        bottom.saturating_sub(TEXT_ORIGIN_Y),
        BG,
    )?;

    for row in 0..buffer.line_count() {
        let (x, y) = cell_origin(display, 0, row);
        if y + display.font_height() > bottom {
            break;
        }
        let line = buffer.line(row);
        if !line.is_empty() {
            display.draw_text(line, x, y, FG, BG)?;
        }
    }
    Ok(())
}

/// Draw the edit-mode chrome: cleared screen plus title bar
pub fn draw_edit_screen<D: DisplaySurface>(display: &mut D) -> Result<(), SurfaceError> {
    display.clear(BG)?;
    draw_title_bar(display, None)
}

/// Repaint the title bar, optionally with an alert at the right edge
///
/// Repainting the bar with no alert also erases a previous one.
pub fn draw_title_bar<D: DisplaySurface>(
    display: &mut D,
    alert: Option<&str>,
) -> Result<(), SurfaceError> {
    display.fill_rect(0, 0, display.width(), TITLE_BAR_HEIGHT, Color::BLUE)?;
    display.draw_text(
        "TEXT EDITOR - Press ESC to exit",
        10,
        5,
        Color::WHITE,
        Color::BLUE,
    )?;
    if let Some(text) = alert {
        let text_width = text.len() as u16 * display.font_width();
        let x = display.width().saturating_sub(text_width + 10);
        display.draw_text(text, x, 5, Color::RED, Color::BLUE)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DrawOp, RecordingSurface};

    fn buffer_with(text: &str) -> TextBuffer {
        let mut buffer = TextBuffer::new(28);
        for ch in text.chars() {
            buffer.insert_char(ch);
        }
        buffer
    }

    #[test]
    fn test_compute_max_length() {
        // 240 px panel, 8 px font: (240 - 10) / 8 = 28
        assert_eq!(compute_max_length(240, 8), 28);
        // Tiny panel clamps up to the minimum
        assert_eq!(compute_max_length(60, 8), MIN_LINE_CHARS);
        // Wide panel clamps down to the capacity
        assert_eq!(compute_max_length(480, 8), MAX_LINE_CHARS);
    }

    #[test]
    fn test_insert_redraw_is_not_full_screen() {
        let mut display = RecordingSurface::new(240, 320, 8, 16);
        let mut buffer = buffer_with("ab");

        let redraw = buffer.insert_char('c');
        apply(&buffer, redraw, &mut display).unwrap();

        assert_eq!(display.clear_count(), 0);
        // One region clear plus the redrawn tail
        assert_eq!(display.fill_count(), 1);
        assert_eq!(display.texts(), ["c"]);
    }

    #[test]
    fn test_tail_redraw_repaints_suffix() {
        let mut display = RecordingSurface::new(240, 320, 8, 16);
        let mut buffer = buffer_with("acd");
        buffer.set_cursor(0, 1);

        let redraw = buffer.insert_char('b');
        apply(&buffer, redraw, &mut display).unwrap();

        // Everything from the insertion point is redrawn
        assert_eq!(display.texts(), ["bcd"]);
        let (x, _) = display.last_text_pos().unwrap();
        assert_eq!(x, TEXT_MARGIN_X + 8);
    }

    #[test]
    fn test_wrap_redraws_single_cell() {
        let mut display = RecordingSurface::new(94, 320, 8, 16);
        // max_length 10 on this panel
        let mut buffer = TextBuffer::new(compute_max_length(94, 8));
        for ch in "0123456789".chars() {
            buffer.insert_char(ch);
        }

        let redraw = buffer.insert_char('x');
        apply(&buffer, redraw, &mut display).unwrap();

        assert_eq!(display.clear_count(), 0);
        assert_eq!(display.texts(), ["x"]);
        let (x, y) = display.last_text_pos().unwrap();
        assert_eq!(x, TEXT_MARGIN_X);
        assert_eq!(y, TEXT_ORIGIN_Y + 16);
    }

    #[test]
    fn test_merge_redraws_text_area() {
        let mut display = RecordingSurface::new(240, 320, 8, 16);
        let mut buffer = buffer_with("ab");
        buffer.newline();
        buffer.insert_char('c');
        buffer.set_cursor(1, 0);

        let redraw = buffer.backspace();
        assert_eq!(redraw, Redraw::Full);
        apply(&buffer, redraw, &mut display).unwrap();

        // Area repaint, then the merged line
        assert_eq!(display.texts(), ["abc"]);
        let op = &display.ops[0];
        assert!(matches!(op, DrawOp::FillRect { y, .. } if *y == TEXT_ORIGIN_Y));
    }

    #[test]
    fn test_full_redraw_skips_offscreen_rows() {
        // 320-30 status = 290 bottom; (290-30)/16 = 16 visible rows
        let mut display = RecordingSurface::new(240, 320, 8, 16);
        let mut buffer = buffer_with("x");
        for _ in 0..30 {
            buffer.newline();
            buffer.insert_char('y');
        }

        apply(&buffer, Redraw::Full, &mut display).unwrap();
        assert!(display.texts().len() <= 16);
    }

    #[test]
    fn test_edit_screen_chrome() {
        let mut display = RecordingSurface::new(240, 320, 8, 16);
        draw_edit_screen(&mut display).unwrap();

        assert_eq!(display.clear_count(), 1);
        assert_eq!(display.texts(), ["TEXT EDITOR - Press ESC to exit"]);
    }
}
