//! Platform-specific display metric queries.
//!
//! Each platform implements [`DisplayMetrics`]; the correct one is selected at
//! compile time via `#[cfg(target_os = ...)]` and re-exported as
//! `NativeDisplayMetrics`:
//!
//! | Implementation              | OS            | API used                     |
//! |-----------------------------|---------------|------------------------------|
//! | `WindowsDisplayMetrics`     | Windows       | `GetSystemMetrics`           |
//! | `UnsupportedDisplayMetrics` | anything else | none; the fallback size wins |
//!
//! A [`MockDisplayMetrics`] is always compiled so tests on any platform can
//! use it without a physical display.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::application::screen_geometry::{DisplayMetrics, ScreenInfoError};

// ── Windows implementation ────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::WindowsDisplayMetrics as NativeDisplayMetrics;

// ── Other platforms ───────────────────────────────────────────────────────────

#[cfg(not(target_os = "windows"))]
pub use UnsupportedDisplayMetrics as NativeDisplayMetrics;

/// Display metrics for platforms the bridge cannot query.
#[derive(Debug, Default)]
pub struct UnsupportedDisplayMetrics;

impl UnsupportedDisplayMetrics {
    pub fn new() -> Self {
        Self
    }
}

impl DisplayMetrics for UnsupportedDisplayMetrics {
    fn primary_dimensions(&self) -> Result<(u32, u32), ScreenInfoError> {
        Err(ScreenInfoError::Unsupported(std::env::consts::OS))
    }
}

// ── Mock implementation (always compiled for tests) ───────────────────────────

/// Display metrics with a settable answer.
///
/// `None` makes the next query fail, which lets tests exercise the
/// fallback and keep-last-good paths.
#[derive(Debug, Default)]
pub struct MockDisplayMetrics {
    dimensions: Mutex<Option<(u32, u32)>>,
    queries: AtomicUsize,
}

impl MockDisplayMetrics {
    /// Metrics that always report `width`x`height`.
    pub fn fixed(width: u32, height: u32) -> Self {
        Self {
            dimensions: Mutex::new(Some((width, height))),
            queries: AtomicUsize::new(0),
        }
    }

    /// Metrics whose every query fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Changes the answer of subsequent queries.
    pub fn set_dimensions(&self, dimensions: Option<(u32, u32)>) {
        *self
            .dimensions
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = dimensions;
    }

    /// Number of queries made so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl DisplayMetrics for MockDisplayMetrics {
    fn primary_dimensions(&self) -> Result<(u32, u32), ScreenInfoError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.dimensions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .ok_or_else(|| ScreenInfoError::Platform("mock display unavailable".into()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
