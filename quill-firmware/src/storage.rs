//! Flash-backed text store
//!
//! The editor's buffer persists in the last 4 KiB sector of the 2 MB XIP
//! flash (the linker script keeps the firmware image out of it). The slot
//! holds one file: a magic/length header followed by newline-terminated
//! text, rewritten whole on every save. An absent or corrupt slot reads as
//! "not found".

use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use heapless::Vec;

use quill_core::editor::buffer::{Line, MAX_LINES};
use quill_core::traits::store::{StoreError, TextStore};

/// Total flash size on the reference board (Pico, W25Q16)
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Text slot: the last erase sector
const SLOT_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// Slot header: magic then content length, both little-endian u32
const MAGIC: u32 = 0x4C4C5551; // "QULL"
const HEADER_LEN: usize = 8;

/// Largest storable content
pub const MAX_TEXT_BYTES: usize = ERASE_SIZE - HEADER_LEN;

/// Single-slot text store in on-chip flash
///
/// The store holds exactly one file, so the name passed through the trait
/// is not used for lookup.
pub struct FlashStore {
    flash: Flash<'static, FLASH, Blocking, FLASH_SIZE>,
}

impl FlashStore {
    pub fn new(flash: FLASH) -> Self {
        Self {
            flash: Flash::new_blocking(flash),
        }
    }
}

impl TextStore for FlashStore {
    fn save(&mut self, _name: &str, lines: &[Line]) -> Result<(), StoreError> {
        let mut sector = [0xFFu8; ERASE_SIZE];

        let mut len = 0usize;
        for line in lines {
            let bytes = line.as_bytes();
            if len + bytes.len() + 1 > MAX_TEXT_BYTES {
                return Err(StoreError::TooLarge);
            }
            sector[HEADER_LEN + len..HEADER_LEN + len + bytes.len()].copy_from_slice(bytes);
            sector[HEADER_LEN + len + bytes.len()] = b'\n';
            len += bytes.len() + 1;
        }

        sector[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        sector[4..8].copy_from_slice(&(len as u32).to_le_bytes());

        self.flash
            .blocking_erase(SLOT_OFFSET, SLOT_OFFSET + ERASE_SIZE as u32)
            .map_err(|_| StoreError::Io)?;
        self.flash
            .blocking_write(SLOT_OFFSET, &sector)
            .map_err(|_| StoreError::Io)?;
        Ok(())
    }

    fn load(&mut self, _name: &str, lines: &mut Vec<Line, MAX_LINES>) -> Result<(), StoreError> {
        let mut header = [0u8; HEADER_LEN];
        self.flash
            .blocking_read(SLOT_OFFSET, &mut header)
            .map_err(|_| StoreError::Io)?;

        let magic = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        if magic != MAGIC {
            // Erased or foreign sector: nothing was ever saved
            return Err(StoreError::NotFound);
        }
        let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
        if len > MAX_TEXT_BYTES {
            return Err(StoreError::NotFound);
        }

        let mut content = [0u8; MAX_TEXT_BYTES];
        self.flash
            .blocking_read(SLOT_OFFSET + HEADER_LEN as u32, &mut content[..len])
            .map_err(|_| StoreError::Io)?;

        lines.clear();
        let mut start = 0usize;
        for i in 0..len {
            if content[i] == b'\n' {
                push_line(lines, &content[start..i]);
                start = i + 1;
            }
        }
        // Content missing its final terminator still yields its last line
        if start < len {
            push_line(lines, &content[start..len]);
        }
        Ok(())
    }
}

/// Append one stored line, truncated to the editor's line capacity
fn push_line(lines: &mut Vec<Line, MAX_LINES>, bytes: &[u8]) {
    if lines.len() >= MAX_LINES {
        return;
    }
    let text = core::str::from_utf8(bytes).unwrap_or("");
    let mut line = Line::new();
    for ch in text.chars() {
        if line.push(ch).is_err() {
            break;
        }
    }
    let _ = lines.push(line);
}
