//! Logical key events and the raw byte mapping

/// A decoded logical keyboard action
///
/// Either a printable ASCII character or one of the named control keys a
/// TTL keyboard produces as a single byte. `F10` has no single-byte form
/// (keyboards send it as an escape sequence); it is defined here so the
/// editor dispatch can bind it to "save".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    /// Printable ASCII character (0x21-0x7E; space is a named key)
    Char(char),
    Backspace,
    Tab,
    Enter,
    Esc,
    Space,
    Delete,
    F10,
}

// Single-byte control codes sent by USB-to-TTL keyboard adapters
const BYTE_BACKSPACE: u8 = 0x08;
const BYTE_TAB: u8 = 0x09;
const BYTE_LINE_FEED: u8 = 0x0A;
const BYTE_CARRIAGE_RETURN: u8 = 0x0D;
const BYTE_ESC: u8 = 0x1B;
const BYTE_SPACE: u8 = 0x20;
const BYTE_DELETE: u8 = 0x7F;

impl KeyEvent {
    /// Map a raw UART byte to a key event
    ///
    /// Returns `None` for unmapped bytes (control codes without a binding,
    /// bytes above 0x7F). Both LF and CR map to `Enter` - adapters differ
    /// in which one they send.
    ///
    /// TODO: multi-byte escape sequences (arrows, function keys) currently
    /// decode as a bare ESC; a small sequence parser is needed before F10
    /// can arrive from a real keyboard.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            BYTE_BACKSPACE => Some(KeyEvent::Backspace),
            BYTE_TAB => Some(KeyEvent::Tab),
            BYTE_LINE_FEED | BYTE_CARRIAGE_RETURN => Some(KeyEvent::Enter),
            BYTE_ESC => Some(KeyEvent::Esc),
            BYTE_SPACE => Some(KeyEvent::Space),
            BYTE_DELETE => Some(KeyEvent::Delete),
            0x21..=0x7E => Some(KeyEvent::Char(byte as char)),
            _ => None,
        }
    }

    /// Returns true for bytes the adapter emits as line noise
    ///
    /// Idle-line glitches read as 0x00 or 0xFF. These bytes are excluded
    /// from both key mapping and liveness decisions.
    pub fn is_noise(byte: u8) -> bool {
        byte == 0x00 || byte == 0xFF
    }

    /// The character this key inserts into text, if any
    pub fn as_char(&self) -> Option<char> {
        match self {
            KeyEvent::Char(ch) => Some(*ch),
            KeyEvent::Space => Some(' '),
            _ => None,
        }
    }

    /// Returns true if this is a named control key rather than a character
    pub fn is_control(&self) -> bool {
        !matches!(self, KeyEvent::Char(_))
    }

    /// Short human-readable name for logging and status display
    pub fn label(&self) -> &'static str {
        match self {
            KeyEvent::Char(_) => "char",
            KeyEvent::Backspace => "Backspace",
            KeyEvent::Tab => "Tab",
            KeyEvent::Enter => "Enter",
            KeyEvent::Esc => "ESC",
            KeyEvent::Space => "space",
            KeyEvent::Delete => "Delete",
            KeyEvent::F10 => "F10",
        }
    }
}
