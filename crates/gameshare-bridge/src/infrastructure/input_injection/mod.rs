//! Platform-specific input injection implementations.
//!
//! The correct implementation is selected at compile time via
//! `#[cfg(target_os = ...)]` and re-exported as `NativeInputInjector`:
//!
//! | Module        | OS           | API used                                    |
//! |---------------|--------------|---------------------------------------------|
//! | `windows`     | Windows      | `SendInput`, `GetCursorPos`, `SetCursorPos` |
//! | `unsupported` | anything else | none; every call fails with `Unsupported`  |

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::WindowsInputInjector as NativeInputInjector;

#[cfg(not(target_os = "windows"))]
pub mod unsupported;

#[cfg(not(target_os = "windows"))]
pub use unsupported::UnsupportedInputInjector as NativeInputInjector;

/// `true` when this build injects real input.
pub const NATIVE_INJECTION_AVAILABLE: bool = cfg!(target_os = "windows");
