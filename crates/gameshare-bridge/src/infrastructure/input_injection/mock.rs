//! Mock input injector for unit and integration tests.
//!
//! The real injector presses keys and moves the cursor on the machine running
//! the tests.  `MockInputInjector` records every call in a single ordered
//! list instead, so assertions can check exactly what was injected and in
//! which order across keys, motion and buttons.
//!
//! # Usage in tests
//!
//! ```ignore
//! let injector = Arc::new(MockInputInjector::new());
//! let bridge = EventBridge::new(injector.clone(), geometry);
//!
//! bridge.dispatch_record(r#"{"type":"keydown","key":"a"}"#).unwrap();
//!
//! assert_eq!(injector.calls(), vec![InjectorCall::PressKey(VirtualKey(0x41))]);
//! ```
//!
//! Construct with [`MockInputInjector::failing`] to make every call return
//! [`InjectionError::Platform`] without recording anything.

use std::sync::{Mutex, PoisonError};

use gameshare_core::{ButtonSignal, VirtualKey};

use crate::application::dispatch_events::{InjectionError, InputInjector};

/// One call made on the injector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectorCall {
    PressKey(VirtualKey),
    ReleaseKey(VirtualKey),
    MoveRelative(i32, i32),
    MoveAbsolute(i32, i32),
    PressButton(ButtonSignal),
    ReleaseButton(ButtonSignal),
}

/// An injector that records calls without touching the OS.
#[derive(Debug, Default)]
pub struct MockInputInjector {
    /// Every successful call, in order.
    pub recorded: Mutex<Vec<InjectorCall>>,
    /// When `true`, every method returns an error and records nothing.
    pub should_fail: bool,
}

impl MockInputInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// An injector whose every call fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// A snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<InjectorCall> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: InjectorCall) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Platform("mock failure".into()));
        }
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        Ok(())
    }
}

impl InputInjector for MockInputInjector {
    fn press_key(&self, key: VirtualKey) -> Result<(), InjectionError> {
        self.record(InjectorCall::PressKey(key))
    }

    fn release_key(&self, key: VirtualKey) -> Result<(), InjectionError> {
        self.record(InjectorCall::ReleaseKey(key))
    }

    fn move_relative(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        self.record(InjectorCall::MoveRelative(dx, dy))
    }

    fn move_absolute(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        self.record(InjectorCall::MoveAbsolute(x, y))
    }

    fn press_button(&self, signal: ButtonSignal) -> Result<(), InjectionError> {
        self.record(InjectorCall::PressButton(signal))
    }

    fn release_button(&self, signal: ButtonSignal) -> Result<(), InjectionError> {
        self.record(InjectorCall::ReleaseButton(signal))
    }
}
