//! Infrastructure layer for the input bridge.
//!
//! Contains OS-facing adapters and the two transports.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `gameshare_core`, but MUST NOT be imported by the `application` layer
//! outside of tests.
//!
//! # Sub-modules
//!
//! - **`input_injection`** – OS-specific implementations of `InputInjector`,
//!   selected at compile time with `#[cfg(target_os)]`, plus a recording mock.
//! - **`screen_info`** – OS-specific display metric queries.
//! - **`ws_server`** – Streaming transport: WebSocket accept loop and one task
//!   per connection.
//! - **`mailbox`** – Polling transport: the commands file drained on a timer.
//! - **`storage`** – TOML configuration file.

pub mod input_injection;
pub mod mailbox;
pub mod screen_info;
pub mod storage;
pub mod ws_server;
