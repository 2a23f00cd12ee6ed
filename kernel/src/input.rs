//! Keycode translation for interactive windows.
//!
//! Scancode decoding happens in the keyboard driver; this core only sees
//! already decoded keycodes, one at a time.

pub const FIRST_PRINTABLE: u8 = 32;
pub const LAST_PRINTABLE: u8 = 126;

/// Printable ASCII keycodes map directly to characters. Everything else
/// is ignored here.
#[inline]
pub fn printable(keycode: u8) -> Option<char> {
    match keycode {
        FIRST_PRINTABLE..=LAST_PRINTABLE => Some(keycode as char),
        _ => None,
    }
}
