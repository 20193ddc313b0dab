//! gameshare-bridge library crate.
//!
//! Replays keyboard and mouse events captured by a remote viewer's browser as
//! native input on this host.
//!
//! # Architecture
//!
//! ```text
//! Browser ── JSON records ──> transport (WebSocket | file mailbox)
//!                                  │
//!                                  ▼
//!                            BridgeSession (one per connection / poll loop)
//!                                  │   parse, validate, in order
//!                                  ▼
//!                            EventBridge ── KeyTranslator, ScreenGeometry
//!                                  │
//!                                  ▼
//!                            InputInjector (SendInput on Windows)
//! ```
//!
//! # Layer rules
//!
//! - `application` depends on `gameshare-core` only and defines the traits
//!   (`InputInjector`, `DisplayMetrics`) the OS adapters implement.
//! - `infrastructure` depends on all other layers plus `tokio`,
//!   `tokio-tungstenite` and the platform APIs.

/// Application layer: event dispatch, sessions, geometry cache.
pub mod application;

/// Infrastructure layer: OS adapters, transports, configuration.
pub mod infrastructure;
