//! TOML-based configuration for the input bridge.
//!
//! Example file with every key at its default:
//!
//! ```toml
//! [bridge]
//! log_level = "info"
//! transport = "stream"
//!
//! [streaming]
//! bind_address = "127.0.0.1"
//! port = 8765
//!
//! [polling]
//! input_dir = "gameshare_input"
//! file_extension = "txt"
//! poll_interval_ms = 10
//! error_backoff_ms = 1000
//! reset_on_start = true
//!
//! [screen]
//! fallback_width = 1920
//! fallback_height = 1080
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "...")]` and every section
//! `#[serde(default)]`, so a partial file (or an empty one) is valid and
//! takes the defaults for whatever it omits.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use gameshare_core::ScreenGeometry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is unusable.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Which transport feeds the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// WebSocket streaming, one session per connection.
    Stream,
    /// File mailbox polled on a timer.
    Poll,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransportKind::Stream => "stream",
            TransportKind::Poll => "poll",
        })
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub bridge: BridgeSection,
    #[serde(default)]
    pub streaming: StreamingConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub screen: ScreenConfig,
}

/// General bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeSection {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_transport")]
    pub transport: TransportKind,
}

/// WebSocket listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamingConfig {
    /// IP address to listen on.  Loopback by default: the bridge only
    /// serves the viewer page on the same host.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// File mailbox settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollingConfig {
    /// Directory holding the commands and processed files.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Extension of both mailbox files, without the dot.
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Pause after an unexpected mailbox failure.
    #[serde(default = "default_error_backoff_ms")]
    pub error_backoff_ms: u64,
    /// Create the directory and delete stale mailbox files at startup.
    #[serde(default = "default_true")]
    pub reset_on_start: bool,
}

/// Display size assumed until the OS reports one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenConfig {
    #[serde(default = "default_screen_width")]
    pub fallback_width: u32,
    #[serde(default = "default_screen_height")]
    pub fallback_height: u32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_transport() -> TransportKind {
    TransportKind::Stream
}
fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8765
}
fn default_input_dir() -> PathBuf {
    PathBuf::from("gameshare_input")
}
fn default_file_extension() -> String {
    "txt".to_string()
}
fn default_poll_interval_ms() -> u64 {
    10
}
fn default_error_backoff_ms() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}
fn default_screen_width() -> u32 {
    1920
}
fn default_screen_height() -> u32 {
    1080
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            transport: default_transport(),
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            file_extension: default_file_extension(),
            poll_interval_ms: default_poll_interval_ms(),
            error_backoff_ms: default_error_backoff_ms(),
            reset_on_start: default_true(),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            fallback_width: default_screen_width(),
            fallback_height: default_screen_height(),
        }
    }
}

// ── Derived values ────────────────────────────────────────────────────────────

impl StreamingConfig {
    /// The listener address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `bind_address` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|e| ConfigError::Invalid {
                field: "streaming.bind_address",
                reason: format!("{:?}: {e}", self.bind_address),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl PollingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }
}

impl ScreenConfig {
    /// The fallback size as a geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if either dimension is zero.
    pub fn fallback_geometry(&self) -> Result<ScreenGeometry, ConfigError> {
        ScreenGeometry::new(self.fallback_width, self.fallback_height).map_err(|e| {
            ConfigError::Invalid {
                field: "screen.fallback_width/fallback_height",
                reason: e.to_string(),
            }
        })
    }
}

impl AppConfig {
    /// Checks values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.streaming.socket_addr()?;

        if self.polling.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "polling.poll_interval_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.polling.error_backoff_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "polling.error_backoff_ms",
                reason: "must be greater than zero".into(),
            });
        }
        let ext = self.polling.file_extension.as_str();
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            return Err(ConfigError::Invalid {
                field: "polling.file_extension",
                reason: format!("{ext:?} must be a non-empty name without dots or separators"),
            });
        }

        self.screen.fallback_geometry()?;
        Ok(())
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the
/// file does not exist.
///
/// The result is not validated; call [`AppConfig::validate`] after applying
/// any overrides.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
