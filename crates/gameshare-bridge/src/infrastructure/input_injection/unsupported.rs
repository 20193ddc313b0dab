//! Injector for platforms without a native implementation.
//!
//! The bridge still runs, accepts records and validates them, but every
//! injection fails with [`InjectionError::Unsupported`] so the operator sees
//! one error line per event instead of silent success.

use gameshare_core::{ButtonSignal, VirtualKey};

use crate::application::dispatch_events::{InjectionError, InputInjector};

#[derive(Debug, Default)]
pub struct UnsupportedInputInjector;

impl UnsupportedInputInjector {
    pub fn new() -> Self {
        Self
    }

    fn unsupported() -> Result<(), InjectionError> {
        Err(InjectionError::Unsupported(std::env::consts::OS))
    }
}

impl InputInjector for UnsupportedInputInjector {
    fn press_key(&self, _key: VirtualKey) -> Result<(), InjectionError> {
        Self::unsupported()
    }

    fn release_key(&self, _key: VirtualKey) -> Result<(), InjectionError> {
        Self::unsupported()
    }

    fn move_relative(&self, _dx: i32, _dy: i32) -> Result<(), InjectionError> {
        Self::unsupported()
    }

    fn move_absolute(&self, _x: i32, _y: i32) -> Result<(), InjectionError> {
        Self::unsupported()
    }

    fn press_button(&self, _signal: ButtonSignal) -> Result<(), InjectionError> {
        Self::unsupported()
    }

    fn release_button(&self, _signal: ButtonSignal) -> Result<(), InjectionError> {
        Self::unsupported()
    }
}
