//! EventBridge: routes validated input events to the OS injector.
//!
//! This use case sits at the application layer and delegates to an
//! [`InputInjector`] trait object for OS-level event injection.  The
//! platform-specific implementations are in the infrastructure layer.
//!
//! Per record the bridge parses, validates, translates and injects, in that
//! order.  Any failure ends the work for that one record and is returned to
//! the caller; nothing is retried and nothing is partially replayed later.

use std::sync::Arc;

use gameshare_core::{
    parse_record, ButtonPress, ButtonSignal, EventKind, InputEvent, KeyStroke, KeyTranslator,
    Motion, RecordError, VirtualKey,
};
use thiserror::Error;
use tracing::debug;

use super::screen_geometry::ScreenGeometryProvider;

/// Error type for OS input injection.
#[derive(Debug, Error)]
pub enum InjectionError {
    #[error("platform error: {0}")]
    Platform(String),
    #[error("input injection is not supported on {0}")]
    Unsupported(&'static str),
}

/// Platform-agnostic input injection trait.
///
/// Each supported OS provides an implementation in the infrastructure layer.
/// Calls are synchronous and never wait on the network or the transports.
pub trait InputInjector: Send + Sync {
    /// Presses a key.
    fn press_key(&self, key: VirtualKey) -> Result<(), InjectionError>;

    /// Releases a key.
    fn release_key(&self, key: VirtualKey) -> Result<(), InjectionError>;

    /// Moves the cursor by a pixel displacement from its current position.
    fn move_relative(&self, dx: i32, dy: i32) -> Result<(), InjectionError>;

    /// Moves the cursor to an absolute pixel position on the primary display.
    fn move_absolute(&self, x: i32, y: i32) -> Result<(), InjectionError>;

    /// Sends a button-press signal at the current cursor position.
    fn press_button(&self, signal: ButtonSignal) -> Result<(), InjectionError>;

    /// Sends a button-release signal at the current cursor position.
    fn release_button(&self, signal: ButtonSignal) -> Result<(), InjectionError>;
}

/// Reasons a single record was not (fully) applied.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The record was malformed or failed validation.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// No virtual-key code could be found for the key.
    #[error("unknown key {key:?} (keyCode {raw_code:?})")]
    UnknownKey { key: String, raw_code: Option<u16> },

    /// The button index has no signal pair.
    #[error("unknown mouse button {0}")]
    UnknownButton(i64),

    /// The OS rejected an injection call.
    #[error("{kind} injection failed: {source}")]
    Injection {
        kind: EventKind,
        #[source]
        source: InjectionError,
    },
}

impl DispatchError {
    /// `true` when the record was valid but the OS call failed.
    pub fn is_injection_failure(&self) -> bool {
        matches!(self, DispatchError::Injection { .. })
    }
}

/// The Event Bridge use case.
///
/// Shared by every transport session; holds no per-session state.
pub struct EventBridge {
    injector: Arc<dyn InputInjector>,
    geometry: Arc<ScreenGeometryProvider>,
}

impl EventBridge {
    /// Creates a bridge with the given injector and geometry cache.
    pub fn new(injector: Arc<dyn InputInjector>, geometry: Arc<ScreenGeometryProvider>) -> Self {
        Self { injector, geometry }
    }

    /// Parses, validates and dispatches one raw JSON record.
    ///
    /// Returns the kind of the dispatched event.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] describing why the record was discarded.
    pub fn dispatch_record(&self, raw: &str) -> Result<EventKind, DispatchError> {
        let event = parse_record(raw)?;
        self.dispatch_event(&event)?;
        Ok(event.kind())
    }

    /// Translates and injects one validated event.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownKey`] / [`DispatchError::UnknownButton`]
    /// before any side effect, or [`DispatchError::Injection`] if an OS call
    /// fails.  When a button event's cursor move fails, the button signal is
    /// not sent.
    pub fn dispatch_event(&self, event: &InputEvent) -> Result<(), DispatchError> {
        let kind = event.kind();
        let injected = |result: Result<(), InjectionError>| {
            result.map_err(|source| DispatchError::Injection { kind, source })
        };

        match event {
            InputEvent::KeyDown(stroke) => {
                let vk = translate_key(stroke)?;
                injected(self.injector.press_key(vk))?;
                debug!("key down {:?} ({vk}, code {:?})", stroke.identifier(), stroke.code);
            }
            InputEvent::KeyUp(stroke) => {
                let vk = translate_key(stroke)?;
                injected(self.injector.release_key(vk))?;
                debug!("key up {:?} ({vk}, code {:?})", stroke.identifier(), stroke.code);
            }
            InputEvent::MouseMove(motion) => {
                let (dx, dy) = truncate_motion(motion);
                injected(self.injector.move_relative(dx, dy))?;
                debug!("mouse move by ({dx}, {dy})");
            }
            InputEvent::MouseDown(press) => {
                let signals = translate_button(press.button)?;
                injected(self.position_cursor(press))?;
                injected(self.injector.press_button(signals.press))?;
                debug!("mouse down button {}", press.button);
            }
            InputEvent::MouseUp(press) => {
                let signals = translate_button(press.button)?;
                injected(self.position_cursor(press))?;
                injected(self.injector.release_button(signals.release))?;
                debug!("mouse up button {}", press.button);
            }
        }
        Ok(())
    }

    fn position_cursor(&self, press: &ButtonPress) -> Result<(), InjectionError> {
        let Some(point) = press.position else {
            return Ok(());
        };
        let (x, y) = self.geometry.current().to_pixels(point.x, point.y);
        self.injector.move_absolute(x, y)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn translate_key(stroke: &KeyStroke) -> Result<VirtualKey, DispatchError> {
    KeyTranslator::translate_key(stroke.identifier(), stroke.raw_code).ok_or_else(|| {
        DispatchError::UnknownKey {
            key: stroke.identifier().to_string(),
            raw_code: stroke.raw_code,
        }
    })
}

fn translate_button(index: i64) -> Result<gameshare_core::ButtonSignals, DispatchError> {
    KeyTranslator::translate_button(index).ok_or(DispatchError::UnknownButton(index))
}

/// Truncates fractional motion toward zero; `as` saturates at the i32 range.
fn truncate_motion(motion: &Motion) -> (i32, i32) {
    (motion.dx.trunc() as i32, motion.dy.trunc() as i32)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::input_injection::mock::{InjectorCall, MockInputInjector};
    use crate::infrastructure::screen_info::MockDisplayMetrics;
    use gameshare_core::keymap::windows_vk::{
        MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEEVENTF_RIGHTDOWN, VK_RETURN,
    };
    use gameshare_core::ScreenGeometry;

    fn bridge_with(injector: Arc<MockInputInjector>) -> EventBridge {
        let geometry = ScreenGeometryProvider::new(
            Arc::new(MockDisplayMetrics::fixed(1920, 1080)),
            ScreenGeometry::new(1920, 1080).unwrap(),
        );
        EventBridge::new(injector, Arc::new(geometry))
    }

    fn setup() -> (Arc<MockInputInjector>, EventBridge) {
        let injector = Arc::new(MockInputInjector::new());
        let bridge = bridge_with(Arc::clone(&injector));
        (injector, bridge)
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_key_down_then_up_presses_before_release() {
        // Arrange
        let (injector, bridge) = setup();

        // Act
        bridge.dispatch_event(&InputEvent::key_down("a")).unwrap();
        bridge.dispatch_event(&InputEvent::key_up("a")).unwrap();

        // Assert
        assert_eq!(
            injector.calls(),
            vec![
                InjectorCall::PressKey(VirtualKey(0x41)),
                InjectorCall::ReleaseKey(VirtualKey(0x41)),
            ]
        );
    }

    #[test]
    fn test_dispatch_record_returns_event_kind() {
        let (injector, bridge) = setup();

        let kind = bridge
            .dispatch_record(r#"{"type":"keydown","key":"Enter","code":"Enter"}"#)
            .unwrap();

        assert_eq!(kind, EventKind::KeyDown);
        assert_eq!(injector.calls(), vec![InjectorCall::PressKey(VirtualKey(VK_RETURN))]);
    }

    #[test]
    fn test_unknown_key_is_reported_without_side_effects() {
        let (injector, bridge) = setup();

        let result = bridge.dispatch_event(&InputEvent::key_down("Unidentified"));

        assert!(matches!(result, Err(DispatchError::UnknownKey { .. })));
        assert!(injector.calls().is_empty());
    }

    #[test]
    fn test_malformed_record_is_reported_as_record_error() {
        let (injector, bridge) = setup();

        let result = bridge.dispatch_record("not json at all");

        assert!(matches!(result, Err(DispatchError::Record(RecordError::Parse(_)))));
        assert!(injector.calls().is_empty());
    }

    // ── Motion ────────────────────────────────────────────────────────────────

    #[test]
    fn test_mouse_move_truncates_toward_zero() {
        let (injector, bridge) = setup();

        bridge
            .dispatch_event(&InputEvent::MouseMove(Motion { dx: 3.9, dy: -2.7 }))
            .unwrap();

        assert_eq!(injector.calls(), vec![InjectorCall::MoveRelative(3, -2)]);
    }

    #[test]
    fn test_sub_pixel_motion_still_reaches_injector() {
        let (injector, bridge) = setup();

        bridge
            .dispatch_event(&InputEvent::MouseMove(Motion { dx: 0.4, dy: -0.4 }))
            .unwrap();

        assert_eq!(injector.calls(), vec![InjectorCall::MoveRelative(0, 0)]);
    }

    // ── Buttons ───────────────────────────────────────────────────────────────

    #[test]
    fn test_click_with_position_moves_before_press() {
        // Arrange
        let (injector, bridge) = setup();

        // Act
        bridge
            .dispatch_record(r#"{"type":"mousedown","button":0,"x":0.5,"y":0.5}"#)
            .unwrap();
        bridge
            .dispatch_record(r#"{"type":"mouseup","button":0,"x":1.0,"y":1.0}"#)
            .unwrap();

        // Assert
        assert_eq!(
            injector.calls(),
            vec![
                InjectorCall::MoveAbsolute(960, 540),
                InjectorCall::PressButton(ButtonSignal(MOUSEEVENTF_LEFTDOWN)),
                InjectorCall::MoveAbsolute(1919, 1079),
                InjectorCall::ReleaseButton(ButtonSignal(MOUSEEVENTF_LEFTUP)),
            ]
        );
    }

    #[test]
    fn test_click_without_position_uses_current_cursor() {
        let (injector, bridge) = setup();

        bridge
            .dispatch_record(r#"{"type":"mousedown","button":2}"#)
            .unwrap();

        assert_eq!(
            injector.calls(),
            vec![InjectorCall::PressButton(ButtonSignal(MOUSEEVENTF_RIGHTDOWN))]
        );
    }

    #[test]
    fn test_unknown_button_skips_cursor_move() {
        let (injector, bridge) = setup();

        let result = bridge.dispatch_record(r#"{"type":"mousedown","button":4,"x":0.1,"y":0.1}"#);

        assert!(matches!(result, Err(DispatchError::UnknownButton(4))));
        assert!(injector.calls().is_empty());
    }

    #[test]
    fn test_positions_use_refreshed_geometry() {
        // Arrange
        let injector = Arc::new(MockInputInjector::new());
        let metrics = Arc::new(MockDisplayMetrics::fixed(800, 600));
        let geometry = Arc::new(ScreenGeometryProvider::new(
            metrics,
            ScreenGeometry::new(1920, 1080).unwrap(),
        ));
        let bridge = EventBridge::new(injector.clone(), Arc::clone(&geometry));

        // Act
        geometry.refresh().unwrap();
        bridge
            .dispatch_record(r#"{"type":"mouseup","button":1,"x":0.5,"y":0.5}"#)
            .unwrap();

        // Assert
        assert_eq!(injector.calls()[0], InjectorCall::MoveAbsolute(400, 300));
    }

    // ── Injection failures ────────────────────────────────────────────────────

    #[test]
    fn test_injection_failure_is_flagged() {
        let injector = Arc::new(MockInputInjector::failing());
        let bridge = bridge_with(injector);

        let err = bridge.dispatch_event(&InputEvent::key_down("a")).unwrap_err();

        assert!(err.is_injection_failure());
        assert!(err.to_string().starts_with("keydown injection failed"));
    }

    #[test]
    fn test_record_errors_are_not_injection_failures() {
        let (_, bridge) = setup();
        let err = bridge.dispatch_record("{}").unwrap_err();
        assert!(!err.is_injection_failure());
    }
}
