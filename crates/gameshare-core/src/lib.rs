//! # gameshare-core
//!
//! Shared library for the GameShare input bridge containing the event record
//! wire format, the canonical input event model, key/button translation
//! tables, and screen geometry math.
//!
//! This crate has zero dependencies on OS APIs, async runtimes, or sockets.
//! Everything in it is a pure function of its inputs, which is what lets the
//! bridge crate test ordering and fault isolation without touching the real
//! keyboard and mouse.
//!
//! # Architecture overview
//!
//! A remote viewer's browser captures keyboard and mouse events and ships
//! them, one JSON object per event, to the host running the bridge.  The
//! bridge replays them as native input.  This crate defines:
//!
//! - **`protocol`** – The JSON record that travels over both transports and
//!   the parse + validate step that turns it into an [`InputEvent`].
//!
//! - **`domain`** – The canonical [`InputEvent`] enum and the
//!   [`ScreenGeometry`] used to turn normalized cursor positions into pixels.
//!
//! - **`keymap`** – Translation from browser key identifiers ("Enter", "a",
//!   numeric `keyCode`) and mouse button indices to the platform codes the
//!   injector understands (Windows virtual-key codes and mouse event flags).

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::event::{ButtonPress, EventKind, InputEvent, KeyStroke, Motion, NormalizedPoint};
pub use domain::geometry::{to_pixels, GeometryError, ScreenGeometry};
pub use keymap::{ButtonSignal, ButtonSignals, KeyTranslator, VirtualKey};
pub use protocol::record::{parse_record, EventRecord, RecordError};
