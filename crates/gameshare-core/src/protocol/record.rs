//! JSON event records and their validation into [`InputEvent`]s.
//!
//! # Wire format
//!
//! One JSON object per event.  Field names follow the browser's DOM event
//! properties so the capture script can forward them unchanged:
//!
//! ```json
//! {"type":"keydown","key":"a","code":"KeyA","keyCode":65}
//! {"type":"mousemove","movementX":-3,"movementY":7.5}
//! {"type":"mousedown","button":0,"x":0.25,"y":0.5}
//! ```
//!
//! Unknown fields are ignored.  `null` reads the same as an absent field.
//!
//! # Per-kind field rules
//!
//! | kind                | required                         | forbidden                          |
//! |---------------------|----------------------------------|------------------------------------|
//! | keydown / keyup     | `key` or `keyCode`               | movement, `button`, `x`, `y`       |
//! | mousemove           | `movementX` or `movementY`       | key fields, `button`, `x`, `y`     |
//! | mousedown / mouseup | `button`; `x` and `y` together   | key fields, movement               |
//!
//! A record breaking a rule is rejected as a whole; nothing from it is
//! injected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::event::{
    ButtonPress, EventKind, InputEvent, KeyStroke, Motion, NormalizedPoint,
};

/// Reasons a raw record is discarded before dispatch.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The record is not a JSON object of the expected shape.
    #[error("malformed event record: {0}")]
    Parse(#[from] serde_json::Error),

    /// The record parsed but its fields do not match its kind.
    #[error("invalid {kind} record: {reason}")]
    Validation {
        kind: EventKind,
        reason: &'static str,
    },
}

/// A raw event record exactly as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl EventRecord {
    /// An empty record of the given kind; fill in fields with struct update
    /// syntax.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            key: None,
            code: None,
            key_code: None,
            movement_x: None,
            movement_y: None,
            button: None,
            x: None,
            y: None,
        }
    }

    /// Checks the per-kind field rules and builds the event.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Validation`] naming the first rule broken.
    pub fn validate(self) -> Result<InputEvent, RecordError> {
        let kind = self.kind;
        let reject = |reason| Err(RecordError::Validation { kind, reason });

        let has_key_fields = self.key.is_some() || self.code.is_some() || self.key_code.is_some();
        let has_motion = self.movement_x.is_some() || self.movement_y.is_some();
        let has_position = self.x.is_some() || self.y.is_some();

        match kind {
            EventKind::KeyDown | EventKind::KeyUp => {
                if has_motion || self.button.is_some() || has_position {
                    return reject("key events carry only key, code and keyCode");
                }
                if self.key.is_none() && self.key_code.is_none() {
                    return reject("key or keyCode is required");
                }
                let stroke = KeyStroke {
                    key: self.key,
                    code: self.code,
                    raw_code: self.key_code,
                };
                Ok(if kind == EventKind::KeyDown {
                    InputEvent::KeyDown(stroke)
                } else {
                    InputEvent::KeyUp(stroke)
                })
            }

            EventKind::MouseMove => {
                if has_key_fields || self.button.is_some() || has_position {
                    return reject("mousemove carries only movementX and movementY");
                }
                if !has_motion {
                    return reject("movementX or movementY is required");
                }
                let dx = self.movement_x.unwrap_or(0.0);
                let dy = self.movement_y.unwrap_or(0.0);
                if !dx.is_finite() || !dy.is_finite() {
                    return reject("movement must be finite");
                }
                Ok(InputEvent::MouseMove(Motion { dx, dy }))
            }

            EventKind::MouseDown | EventKind::MouseUp => {
                if has_key_fields || has_motion {
                    return reject("button events carry only button, x and y");
                }
                let Some(button) = self.button else {
                    return reject("button is required");
                };
                let position = match (self.x, self.y) {
                    (None, None) => None,
                    (Some(x), Some(y)) if x.is_finite() && y.is_finite() => {
                        Some(NormalizedPoint { x, y })
                    }
                    (Some(_), Some(_)) => return reject("position must be finite"),
                    _ => return reject("x and y must be given together"),
                };
                let press = ButtonPress { button, position };
                Ok(if kind == EventKind::MouseDown {
                    InputEvent::MouseDown(press)
                } else {
                    InputEvent::MouseUp(press)
                })
            }
        }
    }
}

/// Parses one raw JSON record and validates it into an [`InputEvent`].
///
/// # Errors
///
/// Returns [`RecordError::Parse`] for malformed JSON or wrongly typed fields
/// and [`RecordError::Validation`] for field combinations the kind forbids.
pub fn parse_record(raw: &str) -> Result<InputEvent, RecordError> {
    let record: EventRecord = serde_json::from_str(raw)?;
    record.validate()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
