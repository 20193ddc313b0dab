//! GameShare input bridge: entry point.
//!
//! Receives browser keyboard and mouse events over one of two transports and
//! injects them as native input on this host.
//!
//! # Usage
//!
//! ```text
//! gameshare-input-bridge [OPTIONS]
//!
//! Options:
//!   --config <PATH>              TOML configuration file
//!   --transport <stream|poll>    Event transport [default: stream]
//!   --ws-bind <IP>               WebSocket listen address [default: 127.0.0.1]
//!   --ws-port <PORT>             WebSocket listen port [default: 8765]
//!   --input-dir <DIR>            Mailbox directory [default: gameshare_input]
//!   --poll-interval-ms <MS>      Mailbox poll interval [default: 10]
//!   --error-backoff-ms <MS>      Pause after a mailbox failure [default: 1000]
//!   --log-level <FILTER>         Log filter when RUST_LOG is unset [default: info]
//! ```
//!
//! Every option can also be set through a `GAMESHARE_*` environment variable
//! (e.g. `GAMESHARE_WS_PORT`).  Options given on the command line or in the
//! environment override the configuration file.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gameshare_bridge::application::dispatch_events::EventBridge;
use gameshare_bridge::application::screen_geometry::ScreenGeometryProvider;
use gameshare_bridge::application::session::BridgeSession;
use gameshare_bridge::infrastructure::input_injection::{
    NativeInputInjector, NATIVE_INJECTION_AVAILABLE,
};
use gameshare_bridge::infrastructure::mailbox::{run_poll_loop, Mailbox};
use gameshare_bridge::infrastructure::screen_info::NativeDisplayMetrics;
use gameshare_bridge::infrastructure::storage::config::{load_config, AppConfig, TransportKind};
use gameshare_bridge::infrastructure::ws_server::run_server;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// GameShare input bridge.
#[derive(Debug, Parser)]
#[command(
    name = "gameshare-input-bridge",
    about = "Replays remote browser keyboard and mouse events as native input",
    version
)]
struct Cli {
    /// TOML configuration file.  A missing file means all defaults.
    #[arg(long, env = "GAMESHARE_CONFIG")]
    config: Option<PathBuf>,

    /// Event transport to run.
    #[arg(long, value_enum, env = "GAMESHARE_TRANSPORT")]
    transport: Option<TransportKind>,

    /// IP address the WebSocket server binds to.
    #[arg(long, env = "GAMESHARE_WS_BIND")]
    ws_bind: Option<String>,

    /// TCP port the WebSocket server listens on.
    #[arg(long, env = "GAMESHARE_WS_PORT")]
    ws_port: Option<u16>,

    /// Directory holding the mailbox files.
    #[arg(long, env = "GAMESHARE_INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Mailbox poll interval in milliseconds.
    #[arg(long, env = "GAMESHARE_POLL_INTERVAL_MS")]
    poll_interval_ms: Option<u64>,

    /// Pause after an unexpected mailbox failure, in milliseconds.
    #[arg(long, env = "GAMESHARE_ERROR_BACKOFF_MS")]
    error_backoff_ms: Option<u64>,

    /// `tracing` filter used when `RUST_LOG` is unset (e.g. `debug`).
    #[arg(long, env = "GAMESHARE_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Loads the configuration file (if any), applies the command-line
    /// overrides and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the final
    /// configuration is invalid.
    fn into_app_config(self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => AppConfig::default(),
        };

        if let Some(transport) = self.transport {
            config.bridge.transport = transport;
        }
        if let Some(log_level) = self.log_level {
            config.bridge.log_level = log_level;
        }
        if let Some(ws_bind) = self.ws_bind {
            config.streaming.bind_address = ws_bind;
        }
        if let Some(ws_port) = self.ws_port {
            config.streaming.port = ws_port;
        }
        if let Some(input_dir) = self.input_dir {
            config.polling.input_dir = input_dir;
        }
        if let Some(ms) = self.poll_interval_ms {
            config.polling.poll_interval_ms = ms;
        }
        if let Some(ms) = self.error_backoff_ms {
            config.polling.error_backoff_ms = ms;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_app_config()?;

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.bridge.log_level)),
        )
        .init();

    info!(
        "GameShare input bridge starting (transport={})",
        config.bridge.transport
    );
    if !NATIVE_INJECTION_AVAILABLE {
        warn!(
            "no native input injector for {}; events will be validated but not injected",
            std::env::consts::OS
        );
    }

    // ── Graceful shutdown flag ─────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    // ── Wiring ─────────────────────────────────────────────────────────────────
    let geometry = Arc::new(ScreenGeometryProvider::initialize(
        Arc::new(NativeDisplayMetrics::new()),
        config.screen.fallback_geometry()?,
    ));
    let bridge = Arc::new(EventBridge::new(
        Arc::new(NativeInputInjector::new()),
        geometry,
    ));

    match config.bridge.transport {
        TransportKind::Stream => {
            run_server(&config.streaming, bridge, running).await?;
        }
        TransportKind::Poll => {
            let mailbox = Mailbox::from_config(&config.polling);
            mailbox
                .prepare(config.polling.reset_on_start)
                .await
                .context("failed to prepare mailbox")?;
            let session = BridgeSession::new("mailbox", bridge);
            run_poll_loop(
                mailbox,
                session,
                config.polling.poll_interval(),
                config.polling.error_backoff(),
                running,
            )
            .await;
        }
    }

    info!("GameShare input bridge stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
