//! Application mode machine
//!
//! Two modes, two transitions. Everything else is handled inside the
//! active mode.

use quill_keys::KeyEvent;

/// Top-level application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Command menu visible, keys select actions
    Command,
    /// Line editor active, keys mutate the buffer
    Edit,
}

impl Mode {
    /// Process a key and return the next mode
    ///
    /// Enter opens the editor from the menu; ESC leaves it. ESC while the
    /// menu is showing stays put (the menu is simply redrawn). All other
    /// keys never change the mode.
    pub fn transition(self, key: &KeyEvent) -> Self {
        use Mode::*;

        match (self, key) {
            (Command, KeyEvent::Enter) => Edit,
            (Edit, KeyEvent::Esc) => Command,
            _ => self,
        }
    }

    /// Status bar label
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Command => "COMMAND",
            Mode::Edit => "EDIT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_opens_editor() {
        assert_eq!(Mode::Command.transition(&KeyEvent::Enter), Mode::Edit);
    }

    #[test]
    fn test_esc_leaves_editor() {
        assert_eq!(Mode::Edit.transition(&KeyEvent::Esc), Mode::Command);
    }

    #[test]
    fn test_esc_in_command_is_idempotent() {
        assert_eq!(Mode::Command.transition(&KeyEvent::Esc), Mode::Command);
    }

    #[test]
    fn test_other_keys_keep_mode() {
        let keys = [
            KeyEvent::Char('a'),
            KeyEvent::Backspace,
            KeyEvent::Tab,
            KeyEvent::Space,
            KeyEvent::Delete,
            KeyEvent::F10,
        ];

        for key in &keys {
            assert_eq!(Mode::Command.transition(key), Mode::Command);
            assert_eq!(Mode::Edit.transition(key), Mode::Edit);
        }
        // Enter inside the editor is a newline, not a mode change
        assert_eq!(Mode::Edit.transition(&KeyEvent::Enter), Mode::Edit);
    }
}
