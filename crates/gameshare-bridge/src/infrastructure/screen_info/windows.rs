//! Windows display metrics via `GetSystemMetrics`.

use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

use crate::application::screen_geometry::{DisplayMetrics, ScreenInfoError};

/// Reports the primary display size, which is the coordinate space of
/// `SetCursorPos`.
#[derive(Debug, Default)]
pub struct WindowsDisplayMetrics;

impl WindowsDisplayMetrics {
    pub fn new() -> Self {
        Self
    }
}

impl DisplayMetrics for WindowsDisplayMetrics {
    fn primary_dimensions(&self) -> Result<(u32, u32), ScreenInfoError> {
        // SAFETY: GetSystemMetrics has no preconditions.
        let (width, height) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };

        // GetSystemMetrics reports failure as 0.
        match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
            _ => Err(ScreenInfoError::Platform(format!(
                "GetSystemMetrics returned {width}x{height}"
            ))),
        }
    }
}
