//! Application layer use cases for the input bridge.
//!
//! - **`dispatch_events`** – The [`dispatch_events::EventBridge`]: parses a raw
//!   record, translates it and drives an [`dispatch_events::InputInjector`].
//!   The injector is supplied at construction time, so the same bridge runs
//!   against the real OS or against a recording mock.
//!
//! - **`session`** – Per-transport session state (`Idle -> Active -> Draining
//!   -> Idle`) and per-batch fault isolation.
//!
//! - **`screen_geometry`** – The cached display size used to convert
//!   normalized click positions into pixels.

pub mod dispatch_events;
pub mod screen_geometry;
pub mod session;
