//! The canonical input event model.
//!
//! Every record received from a transport is parsed and validated into an
//! [`InputEvent`] before anything touches the OS.  Each variant carries only
//! the fields that are meaningful for its kind, so a constructed event cannot
//! mix key, motion, and button data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminant of an input event, as spelled in the wire `"type"` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    KeyDown,
    KeyUp,
    MouseMove,
    MouseDown,
    MouseUp,
}

impl EventKind {
    /// The wire spelling of this kind (`"keydown"`, `"mousemove"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::KeyDown => "keydown",
            EventKind::KeyUp => "keyup",
            EventKind::MouseMove => "mousemove",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseUp => "mouseup",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-bearing fields of a key-down / key-up event.
///
/// At least one of `key` and `raw_code` is present after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStroke {
    /// Semantic key identifier from `KeyboardEvent.key` ("Enter", "a", " ").
    pub key: Option<String>,
    /// Physical key name from `KeyboardEvent.code`.  Carried for logging only.
    pub code: Option<String>,
    /// Numeric fallback from `KeyboardEvent.keyCode`.
    pub raw_code: Option<u16>,
}

impl KeyStroke {
    /// Identifier used for translation; an absent `key` reads as empty.
    pub fn identifier(&self) -> &str {
        self.key.as_deref().unwrap_or("")
    }
}

/// Relative pointer displacement of a mouse-move event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub dx: f64,
    pub dy: f64,
}

/// A position expressed as a fraction of the screen dimensions.
///
/// Values are nominally in `[0.0, 1.0]`; anything outside is clamped when
/// converted to pixels rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

/// Button fields of a mouse-down / mouse-up event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonPress {
    /// Button index: 0 = primary, 1 = middle, 2 = secondary.
    pub button: i64,
    /// Cursor position to move to before the transition, if reported.
    pub position: Option<NormalizedPoint>,
}

/// A validated input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyStroke),
    KeyUp(KeyStroke),
    MouseMove(Motion),
    MouseDown(ButtonPress),
    MouseUp(ButtonPress),
}

impl InputEvent {
    /// Returns the kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::KeyDown(_) => EventKind::KeyDown,
            InputEvent::KeyUp(_) => EventKind::KeyUp,
            InputEvent::MouseMove(_) => EventKind::MouseMove,
            InputEvent::MouseDown(_) => EventKind::MouseDown,
            InputEvent::MouseUp(_) => EventKind::MouseUp,
        }
    }

    /// Convenience constructor for a key-down of a single identifier.
    pub fn key_down(key: impl Into<String>) -> Self {
        InputEvent::KeyDown(KeyStroke {
            key: Some(key.into()),
            code: None,
            raw_code: None,
        })
    }

    /// Convenience constructor for a key-up of a single identifier.
    pub fn key_up(key: impl Into<String>) -> Self {
        InputEvent::KeyUp(KeyStroke {
            key: Some(key.into()),
            code: None,
            raw_code: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(InputEvent::key_down("a").kind(), EventKind::KeyDown);
        assert_eq!(InputEvent::key_up("a").kind(), EventKind::KeyUp);
        assert_eq!(
            InputEvent::MouseMove(Motion { dx: 1.0, dy: 0.0 }).kind(),
            EventKind::MouseMove
        );
        let press = ButtonPress { button: 0, position: None };
        assert_eq!(InputEvent::MouseDown(press).kind(), EventKind::MouseDown);
        assert_eq!(InputEvent::MouseUp(press).kind(), EventKind::MouseUp);
    }

    #[test]
    fn test_kind_display_uses_wire_spelling() {
        assert_eq!(EventKind::MouseDown.to_string(), "mousedown");
        assert_eq!(EventKind::KeyUp.to_string(), "keyup");
    }

    #[test]
    fn test_kind_deserializes_from_lowercase_wire_name() {
        let kind: EventKind = serde_json::from_str("\"mousemove\"").unwrap();
        assert_eq!(kind, EventKind::MouseMove);
    }

    #[test]
    fn test_identifier_of_missing_key_is_empty() {
        let stroke = KeyStroke { key: None, code: None, raw_code: Some(65) };
        assert_eq!(stroke.identifier(), "");
    }
}
