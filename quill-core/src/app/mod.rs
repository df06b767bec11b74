//! Application dispatcher
//!
//! Routes decoded key events to the command menu or the line editor
//! depending on the current [`Mode`], and owns the status bar. The display
//! and store collaborators are constructed once at startup and passed in
//! by the caller; nothing here is global.

pub mod machine;
pub mod menu;
pub mod status;

pub use machine::Mode;
pub use status::{EditorStatus, StatusBar, StatusSnapshot};

use quill_keys::KeyEvent;

use crate::editor::buffer::TextBuffer;
use crate::editor::render::{self, compute_max_length};
use crate::traits::display::{DisplaySurface, SurfaceError};
use crate::traits::store::{TextStore, DEFAULT_FILE};

/// Alert shown in the title bar when the store rejects a save
const SAVE_FAILED_ALERT: &str = "SAVE FAILED";

/// The terminal application: mode, editor, status bar
pub struct App {
    mode: Mode,
    editor: TextBuffer,
    status: StatusBar,
}

impl App {
    /// Create the application sized for the given panel
    pub fn new<D: DisplaySurface>(display: &D) -> Self {
        let max_length = compute_max_length(display.width(), display.font_width());
        Self {
            mode: Mode::Command,
            editor: TextBuffer::new(max_length),
            status: StatusBar::new(),
        }
    }

    /// Draw the initial command screen
    pub fn draw_startup<D: DisplaySurface>(&mut self, display: &mut D) -> Result<(), SurfaceError> {
        menu::draw_command_screen(display)?;
        self.status.mark_screen_changed();
        Ok(())
    }

    /// Process one decoded key event
    ///
    /// Command mode: Enter opens the editor (buffer cleared, chrome
    /// drawn), ESC redraws the menu, everything else is ignored. Edit
    /// mode: ESC returns to the menu with the buffer kept, F10 saves (a
    /// failure is surfaced in the title bar, no retry), all other keys
    /// mutate the buffer and the resulting region is repainted.
    pub fn handle_key<D, S>(
        &mut self,
        key: KeyEvent,
        display: &mut D,
        store: &mut S,
    ) -> Result<(), SurfaceError>
    where
        D: DisplaySurface,
        S: TextStore,
    {
        let next = self.mode.transition(&key);

        match (self.mode, next) {
            (Mode::Command, Mode::Edit) => {
                self.editor.clear();
                render::draw_edit_screen(display)?;
                self.status.mark_screen_changed();
            }
            (Mode::Edit, Mode::Command) => {
                menu::draw_command_screen(display)?;
                self.status.mark_screen_changed();
            }
            (Mode::Command, Mode::Command) => {
                if key == KeyEvent::Esc {
                    menu::draw_command_screen(display)?;
                    self.status.mark_screen_changed();
                }
            }
            (Mode::Edit, Mode::Edit) => match key {
                KeyEvent::F10 => {
                    let alert = self
                        .editor
                        .save(store, DEFAULT_FILE)
                        .err()
                        .map(|_| SAVE_FAILED_ALERT);
                    render::draw_title_bar(display, alert)?;
                }
                key => {
                    let redraw = self.editor.apply_key(&key);
                    render::apply(&self.editor, redraw, display)?;
                }
            },
        }

        self.mode = next;
        Ok(())
    }

    /// Refresh the status bar from current state
    ///
    /// Called on a fixed cadence by the poll loop, not per keystroke.
    pub fn refresh_status<D: DisplaySurface>(
        &mut self,
        display: &mut D,
        connected: bool,
        uptime_s: u32,
    ) -> Result<(), SurfaceError> {
        let editor = (self.mode == Mode::Edit).then(|| EditorStatus {
            cursor: self.editor.cursor_position(),
            unsaved: self.editor.has_unsaved_changes(),
            frozen: self.editor.is_input_frozen(),
        });
        let snap = StatusSnapshot {
            connected,
            mode: self.mode,
            uptime_s,
            editor,
        };
        self.status.refresh(&snap, display)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn editor(&self) -> &TextBuffer {
        &self.editor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DrawOp, MemoryStore, RecordingSurface};
    use heapless::Vec;
    use quill_keys::KeyboardDecoder;

    use crate::editor::buffer::{Line, MAX_LINES};
    use crate::traits::store::StoreError;

    /// Store that refuses everything
    struct BrokenStore;

    impl TextStore for BrokenStore {
        fn save(&mut self, _name: &str, _lines: &[Line]) -> Result<(), StoreError> {
            Err(StoreError::Io)
        }

        fn load(
            &mut self,
            _name: &str,
            _lines: &mut Vec<Line, MAX_LINES>,
        ) -> Result<(), StoreError> {
            Err(StoreError::Io)
        }
    }

    fn setup() -> (App, RecordingSurface, MemoryStore) {
        let display = RecordingSurface::new(320, 480, 8, 16);
        let app = App::new(&display);
        (app, display, MemoryStore::new())
    }

    fn enter_edit_mode(app: &mut App, display: &mut RecordingSurface, store: &mut MemoryStore) {
        app.handle_key(KeyEvent::Enter, display, store).unwrap();
        assert_eq!(app.mode(), Mode::Edit);
        display.reset();
    }

    #[test]
    fn test_command_mode_ignores_other_keys() {
        let (mut app, mut display, mut store) = setup();
        for key in [KeyEvent::Char('a'), KeyEvent::Backspace, KeyEvent::Tab] {
            app.handle_key(key, &mut display, &mut store).unwrap();
        }
        assert_eq!(app.mode(), Mode::Command);
        assert!(display.ops.is_empty());
        assert_eq!(app.editor().line(0), "");
    }

    #[test]
    fn test_enter_opens_cleared_editor() {
        let (mut app, mut display, mut store) = setup();
        app.handle_key(KeyEvent::Enter, &mut display, &mut store)
            .unwrap();

        assert_eq!(app.mode(), Mode::Edit);
        assert_eq!(display.clear_count(), 1);
        assert!(display
            .texts()
            .iter()
            .any(|t| t == "TEXT EDITOR - Press ESC to exit"));
    }

    #[test]
    fn test_esc_returns_to_menu_keeping_buffer() {
        let (mut app, mut display, mut store) = setup();
        enter_edit_mode(&mut app, &mut display, &mut store);

        app.handle_key(KeyEvent::Char('x'), &mut display, &mut store)
            .unwrap();
        app.handle_key(KeyEvent::Esc, &mut display, &mut store)
            .unwrap();

        assert_eq!(app.mode(), Mode::Command);
        assert!(display.texts().iter().any(|t| t == "KEYBOARD COMMANDS"));
        // Buffer survives leaving the editor
        assert_eq!(app.editor().line(0), "x");
    }

    #[test]
    fn test_reentering_editor_clears_buffer() {
        let (mut app, mut display, mut store) = setup();
        enter_edit_mode(&mut app, &mut display, &mut store);
        app.handle_key(KeyEvent::Char('x'), &mut display, &mut store)
            .unwrap();
        app.handle_key(KeyEvent::Esc, &mut display, &mut store)
            .unwrap();

        app.handle_key(KeyEvent::Enter, &mut display, &mut store)
            .unwrap();
        assert_eq!(app.editor().line(0), "");
    }

    #[test]
    fn test_typing_never_repaints_full_screen() {
        let (mut app, mut display, mut store) = setup();
        enter_edit_mode(&mut app, &mut display, &mut store);

        for key in [
            KeyEvent::Char('h'),
            KeyEvent::Char('i'),
            KeyEvent::Space,
            KeyEvent::Char('!'),
        ] {
            app.handle_key(key, &mut display, &mut store).unwrap();
        }

        assert_eq!(display.clear_count(), 0);
        assert_eq!(app.editor().line(0), "hi !");
    }

    #[test]
    fn test_f10_saves_to_store() {
        let (mut app, mut display, mut store) = setup();
        enter_edit_mode(&mut app, &mut display, &mut store);

        for key in [KeyEvent::Char('o'), KeyEvent::Char('k')] {
            app.handle_key(key, &mut display, &mut store).unwrap();
        }
        assert!(app.editor().has_unsaved_changes());

        app.handle_key(KeyEvent::F10, &mut display, &mut store)
            .unwrap();
        assert!(!app.editor().has_unsaved_changes());
        assert_eq!(store.raw(DEFAULT_FILE), Some("ok\n"));
        // No failure alert drawn
        assert!(!display.texts().iter().any(|t| t == SAVE_FAILED_ALERT));
    }

    #[test]
    fn test_save_failure_is_surfaced() {
        let display = RecordingSurface::new(320, 480, 8, 16);
        let mut app = App::new(&display);
        let mut display = display;
        let mut store = BrokenStore;

        app.handle_key(KeyEvent::Enter, &mut display, &mut store)
            .unwrap();
        app.handle_key(KeyEvent::Char('x'), &mut display, &mut store)
            .unwrap();
        app.handle_key(KeyEvent::F10, &mut display, &mut store)
            .unwrap();

        assert!(display.texts().iter().any(|t| t == SAVE_FAILED_ALERT));
        // Still unsaved, still running
        assert!(app.editor().has_unsaved_changes());
        assert_eq!(app.mode(), Mode::Edit);
    }

    #[test]
    fn test_status_refresh_in_both_modes() {
        let (mut app, mut display, mut store) = setup();
        app.refresh_status(&mut display, false, 3).unwrap();
        assert!(display.texts().iter().any(|t| t == "3s"));

        enter_edit_mode(&mut app, &mut display, &mut store);
        app.refresh_status(&mut display, true, 4).unwrap();
        let texts = display.texts();
        assert!(texts.iter().any(|t| t == "EDIT"));
        assert!(texts.iter().any(|t| t == "L:1 C:1"));
    }

    /// End to end: raw UART bytes through decoder and dispatcher
    #[test]
    fn test_bytes_to_buffer_end_to_end() {
        let (mut app, mut display, mut store) = setup();
        enter_edit_mode(&mut app, &mut display, &mut store);

        let mut decoder = KeyboardDecoder::new();
        let mut events = std::vec::Vec::new();
        decoder.process_batch(&[0x41, 0x42, 0x0D], 1000, |key| events.push(key));

        // Three distinct keys, none suppressed
        assert_eq!(
            events,
            [KeyEvent::Char('A'), KeyEvent::Char('B'), KeyEvent::Enter]
        );

        for key in events {
            app.handle_key(key, &mut display, &mut store).unwrap();
        }

        // "AB" then Enter at end of line: ["AB", ""]
        assert_eq!(app.editor().line_count(), 2);
        assert_eq!(app.editor().line(0), "AB");
        assert_eq!(app.editor().line(1), "");
        assert_eq!(app.editor().cursor_position(), (1, 0));
        // Incremental updates only, no full-screen clear
        assert_eq!(display.clear_count(), 0);
        assert!(display
            .ops
            .iter()
            .all(|op| !matches!(op, DrawOp::Clear(_))));
    }
}
