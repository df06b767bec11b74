//! Static command menu screen
//!
//! Drawn on entry to command mode and whenever ESC asks for a redraw.
//! Purely informational; the dispatcher interprets the keys.

use crate::traits::display::{Color, DisplaySurface, SurfaceError};

/// Key bindings shown in the menu
const COMMANDS: [(&str, &str, Color); 5] = [
    ("Enter", "Enter text edit mode", Color::GREEN),
    ("ESC", "Clear screen & reset", Color::WHITE),
    ("F10", "Save current text", Color::GREEN),
    ("Backspace", "Delete character", Color::WHITE),
    ("Tab", "Insert 4 spaces", Color::WHITE),
];

/// Row pitch of the command list in pixels
const ROW_STEP: u16 = 25;

/// Draw the full command screen
pub fn draw_command_screen<D: DisplaySurface>(display: &mut D) -> Result<(), SurfaceError> {
    display.clear(Color::BLACK)?;

    display.draw_text("KEYBOARD COMMANDS", 70, 15, Color::YELLOW, Color::BLACK)?;
    display.draw_text("=================", 70, 35, Color::CYAN, Color::BLACK)?;

    let mut y = 70;
    for (key, desc, color) in COMMANDS {
        display.draw_text(key, 20, y, color, Color::BLACK)?;
        display.draw_text("-", 120, y, Color::YELLOW, Color::BLACK)?;
        display.draw_text(desc, 140, y, Color::WHITE, Color::BLACK)?;
        y += ROW_STEP;
    }

    let status_y = y + 20;
    display.draw_text("System Status:", 20, status_y, Color::CYAN, Color::BLACK)?;
    display.draw_text(
        "TTL UART: Ready",
        20,
        status_y + 20,
        Color::GREEN,
        Color::BLACK,
    )?;
    display.draw_text(
        "Text Editor: Ready",
        20,
        status_y + 40,
        Color::GREEN,
        Color::BLACK,
    )?;

    display.draw_text(
        "Connect keyboard via USB2TTL",
        30,
        status_y + 80,
        Color::YELLOW,
        Color::BLACK,
    )?;
    display.draw_text(
        "Press ENTER to start editing",
        30,
        status_y + 100,
        Color::GREEN,
        Color::BLACK,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSurface;

    #[test]
    fn test_menu_lists_all_bindings() {
        let mut display = RecordingSurface::new(240, 320, 8, 16);
        draw_command_screen(&mut display).unwrap();

        let texts = display.texts();
        for (key, desc, _) in COMMANDS {
            assert!(texts.iter().any(|t| t == key), "missing key {key}");
            assert!(texts.iter().any(|t| t == desc), "missing desc {desc}");
        }
    }

    #[test]
    fn test_menu_clears_screen_first() {
        let mut display = RecordingSurface::new(240, 320, 8, 16);
        draw_command_screen(&mut display).unwrap();
        assert_eq!(display.clear_count(), 1);
        assert!(matches!(display.ops[0], crate::testing::DrawOp::Clear(_)));
    }
}
