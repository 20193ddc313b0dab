//! Windows virtual-key codes and mouse event flags.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h) and the `MOUSEEVENTF_*`
//! flags accepted by `SendInput` / `mouse_event`.
//!
//! # What is a Windows Virtual Key (VK) code?
//!
//! Windows assigns each logical keyboard key a number named `VK_*` in
//! `<winuser.h>` (`VK_RETURN = 0x0D`, `VK_SPACE = 0x20`).  Letters and digits
//! use their upper-case ASCII value: `VK_A = 0x41`, `VK_0 = 0x30`.  That is
//! why an unknown single-character key can still be injected by upper-casing
//! it and using the character code directly.

pub const VK_BACK: u16 = 0x08;
pub const VK_TAB: u16 = 0x09;
pub const VK_RETURN: u16 = 0x0D;
pub const VK_SHIFT: u16 = 0x10;
pub const VK_CONTROL: u16 = 0x11;
pub const VK_MENU: u16 = 0x12;
pub const VK_PAUSE: u16 = 0x13;
pub const VK_CAPITAL: u16 = 0x14;
pub const VK_ESCAPE: u16 = 0x1B;
pub const VK_SPACE: u16 = 0x20;
pub const VK_PRIOR: u16 = 0x21;
pub const VK_NEXT: u16 = 0x22;
pub const VK_END: u16 = 0x23;
pub const VK_HOME: u16 = 0x24;
pub const VK_LEFT: u16 = 0x25;
pub const VK_UP: u16 = 0x26;
pub const VK_RIGHT: u16 = 0x27;
pub const VK_DOWN: u16 = 0x28;
pub const VK_SNAPSHOT: u16 = 0x2C;
pub const VK_INSERT: u16 = 0x2D;
pub const VK_DELETE: u16 = 0x2E;
pub const VK_LWIN: u16 = 0x5B;
pub const VK_APPS: u16 = 0x5D;
pub const VK_F1: u16 = 0x70;
pub const VK_NUMLOCK: u16 = 0x90;
pub const VK_SCROLL: u16 = 0x91;

/// Highest code accepted when deriving a VK from a character.  0xFF is
/// reserved by Windows and never a valid key.
pub const VK_MAX: u16 = 0xFE;

pub const MOUSEEVENTF_LEFTDOWN: u32 = 0x0002;
pub const MOUSEEVENTF_LEFTUP: u32 = 0x0004;
pub const MOUSEEVENTF_RIGHTDOWN: u32 = 0x0008;
pub const MOUSEEVENTF_RIGHTUP: u32 = 0x0010;
pub const MOUSEEVENTF_MIDDLEDOWN: u32 = 0x0020;
pub const MOUSEEVENTF_MIDDLEUP: u32 = 0x0040;

/// Named keys, keyed by the browser's `KeyboardEvent.key` spelling.
///
/// Lookup is case-sensitive; single letters are handled separately so that
/// both cases match.
pub(crate) const NAMED_KEYS: &[(&str, u16)] = &[
    // ── Editing ──────────────────────────────────────────────────────────────
    ("Enter", VK_RETURN),
    ("Escape", VK_ESCAPE),
    ("Tab", VK_TAB),
    ("Backspace", VK_BACK),
    ("Delete", VK_DELETE),
    ("Insert", VK_INSERT),
    (" ", VK_SPACE),
    // ── Navigation ───────────────────────────────────────────────────────────
    ("ArrowUp", VK_UP),
    ("ArrowDown", VK_DOWN),
    ("ArrowLeft", VK_LEFT),
    ("ArrowRight", VK_RIGHT),
    ("Home", VK_HOME),
    ("End", VK_END),
    ("PageUp", VK_PRIOR),
    ("PageDown", VK_NEXT),
    // ── Modifiers and locks ──────────────────────────────────────────────────
    ("Shift", VK_SHIFT),
    ("Control", VK_CONTROL),
    ("Alt", VK_MENU),
    ("Meta", VK_LWIN),
    ("CapsLock", VK_CAPITAL),
    ("NumLock", VK_NUMLOCK),
    ("ScrollLock", VK_SCROLL),
    // ── System ───────────────────────────────────────────────────────────────
    ("ContextMenu", VK_APPS),
    ("Pause", VK_PAUSE),
    ("PrintScreen", VK_SNAPSHOT),
    // ── Function row (VK_F1=0x70 … VK_F12=0x7B) ─────────────────────────────
    ("F1", VK_F1),
    ("F2", VK_F1 + 1),
    ("F3", VK_F1 + 2),
    ("F4", VK_F1 + 3),
    ("F5", VK_F1 + 4),
    ("F6", VK_F1 + 5),
    ("F7", VK_F1 + 6),
    ("F8", VK_F1 + 7),
    ("F9", VK_F1 + 8),
    ("F10", VK_F1 + 9),
    ("F11", VK_F1 + 10),
    ("F12", VK_F1 + 11),
];

/// Mouse button (press, release) flag pairs indexed by DOM button number.
pub(crate) const BUTTON_FLAGS: [(u32, u32); 3] = [
    (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
    (MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP),
    (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
];

/// Looks up a named key.
pub(crate) fn named_key(identifier: &str) -> Option<u16> {
    NAMED_KEYS
        .iter()
        .find(|(name, _)| *name == identifier)
        .map(|&(_, vk)| vk)
}

/// Maps a single ASCII letter (either case) or digit to its VK code.
pub(crate) fn alphanumeric_key(identifier: &str) -> Option<u16> {
    let mut chars = identifier.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(c.to_ascii_uppercase() as u16),
        _ => None,
    }
}
