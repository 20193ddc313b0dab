//! Windows input injection via `SendInput` and the cursor APIs.
//!
//! Keys and buttons are synthesized with `SendInput`.  Cursor moves go
//! through `SetCursorPos`, which takes plain pixel coordinates on the primary
//! display; relative moves read the position with `GetCursorPos` first.

#![cfg(target_os = "windows")]

use gameshare_core::{ButtonSignal, VirtualKey};
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

use crate::application::dispatch_events::{InjectionError, InputInjector};

/// Keys that live in the extended (E0-prefixed) block.  Without the flag,
/// Windows maps the arrows and navigation cluster onto the numeric keypad.
const EXTENDED_VKS: &[u16] = &[
    0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, // nav + arrows
    0x2D, 0x2E, // Insert, Delete
    0x5B, 0x5C, 0x5D, // Win keys, Apps
    0x90, // NumLock
];

/// Windows implementation of [`InputInjector`].
#[derive(Debug, Default)]
pub struct WindowsInputInjector;

impl WindowsInputInjector {
    pub fn new() -> Self {
        Self
    }
}

impl InputInjector for WindowsInputInjector {
    fn press_key(&self, key: VirtualKey) -> Result<(), InjectionError> {
        send_key(key, false)
    }

    fn release_key(&self, key: VirtualKey) -> Result<(), InjectionError> {
        send_key(key, true)
    }

    fn move_relative(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        let mut point = POINT::default();
        // SAFETY: `point` is a valid, writable POINT on the stack.
        unsafe { GetCursorPos(&mut point) }
            .map_err(|e| InjectionError::Platform(format!("GetCursorPos failed: {e}")))?;
        set_cursor(point.x.saturating_add(dx), point.y.saturating_add(dy))
    }

    fn move_absolute(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        set_cursor(x, y)
    }

    fn press_button(&self, signal: ButtonSignal) -> Result<(), InjectionError> {
        send_button(signal)
    }

    fn release_button(&self, signal: ButtonSignal) -> Result<(), InjectionError> {
        send_button(signal)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn set_cursor(x: i32, y: i32) -> Result<(), InjectionError> {
    // SAFETY: SetCursorPos takes plain integers; out-of-screen values are
    // clipped by the OS.
    unsafe { SetCursorPos(x, y) }
        .map_err(|e| InjectionError::Platform(format!("SetCursorPos({x}, {y}) failed: {e}")))
}

fn send_key(key: VirtualKey, key_up: bool) -> Result<(), InjectionError> {
    let mut flags = KEYBD_EVENT_FLAGS(0);
    if key_up {
        flags |= KEYEVENTF_KEYUP;
    }
    if EXTENDED_VKS.contains(&key.0) {
        flags |= KEYEVENTF_EXTENDEDKEY;
    }

    let input = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(key.0),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    send_inputs(&[input], "key")
}

fn send_button(signal: ButtonSignal) -> Result<(), InjectionError> {
    let input = INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: 0,
                dwFlags: MOUSE_EVENT_FLAGS(signal.0),
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    send_inputs(&[input], "mouse button")
}

fn send_inputs(inputs: &[INPUT], what: &str) -> Result<(), InjectionError> {
    // SAFETY: every element is a fully initialized INPUT structure and the
    // size argument matches the element type.
    let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize != inputs.len() {
        return Err(InjectionError::Platform(format!(
            "SendInput injected {sent} of {} {what} events: {}",
            inputs.len(),
            windows::core::Error::from_win32()
        )));
    }
    Ok(())
}
