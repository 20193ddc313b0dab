//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML configuration file, fills in
//! defaults for anything the file leaves out, and validates the result before
//! the bridge starts.

pub mod config;
