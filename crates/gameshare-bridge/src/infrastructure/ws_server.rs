//! Streaming transport: WebSocket accept loop and per-connection sessions.
//!
//! Each browser connection carries one JSON event record per message.  The
//! accept loop hands every connection to its own Tokio task, which owns a
//! [`BridgeSession`] for that connection and dispatches messages in arrival
//! order.  Sessions share the [`EventBridge`] but nothing else; there is no
//! ordering between events of different connections.
//!
//! A malformed message is logged and skipped without closing the
//! connection.  The session ends when the browser closes the socket, the
//! socket errors, or the shutdown flag is cleared.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::application::dispatch_events::EventBridge;
use crate::application::session::BridgeSession;
use crate::infrastructure::storage::config::StreamingConfig;

/// How long the accept and read loops wait before re-checking the shutdown
/// flag.
const SHUTDOWN_POLL: Duration = Duration::from_millis(200);

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds the configured address and serves connections until `running` is
/// set to `false`.
///
/// # Errors
///
/// Returns an error if the bind address is invalid or the TCP listener
/// cannot be bound (e.g., the port is already in use).
pub async fn run_server(
    config: &StreamingConfig,
    bridge: Arc<EventBridge>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind WebSocket listener on {addr}"))?;

    info!("streaming transport listening on ws://{addr}");
    serve(listener, bridge, running).await
}

/// Runs the accept loop on an already bound listener.
///
/// Returns once `running` is cleared and every open session has closed.
/// Sessions notice the flag within [`SHUTDOWN_POLL`], send a close frame and
/// log their totals.
///
/// # Errors
///
/// Currently never fails; accept errors are logged and the loop continues.
pub async fn serve(
    listener: TcpListener,
    bridge: Arc<EventBridge>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let mut sessions = JoinSet::new();

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // Reap sessions that have already ended.
        while sessions.try_join_next().is_some() {}

        // Short timeout so the flag is re-checked even when nobody connects.
        match timeout(SHUTDOWN_POLL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                debug!("new connection from {peer_addr}");
                let bridge = Arc::clone(&bridge);
                let running = Arc::clone(&running);
                sessions.spawn(handle_session(stream, peer_addr, bridge, running));
            }
            Ok(Err(e)) => {
                // Transient accept error (e.g., too many open file descriptors).
                error!("accept error: {e}");
            }
            Err(_) => {}
        }
    }

    if !sessions.is_empty() {
        info!("waiting for {} open session(s) to close", sessions.len());
    }
    while let Some(joined) = sessions.join_next().await {
        if let Err(e) = joined {
            error!("session task failed: {e}");
        }
    }

    Ok(())
}

// ── Per-session handler ───────────────────────────────────────────────────────

async fn handle_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    bridge: Arc<EventBridge>,
    running: Arc<AtomicBool>,
) {
    if let Err(e) = run_session(raw_stream, peer_addr, bridge, running).await {
        warn!("connection {peer_addr} closed with error: {e:#}");
    }
}

/// Runs one connection: handshake, then one record per message until close.
///
/// # Errors
///
/// Returns an error only if the WebSocket handshake fails.
async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    bridge: Arc<EventBridge>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let mut ws_stream = accept_async(raw_stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let session_id = Uuid::new_v4();
    let mut session = BridgeSession::new(format!("session {session_id} ({peer_addr})"), bridge);
    info!("{}: established", session.label());

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("{}: shutdown flag set; closing", session.label());
            if let Err(e) = ws_stream.close(None).await {
                debug!("{}: close frame not sent: {e}", session.label());
            }
            break;
        }

        let ws_msg = match timeout(SHUTDOWN_POLL, ws_stream.next()).await {
            Err(_) => continue,
            Ok(Some(Ok(msg))) => msg,
            Ok(Some(Err(WsError::ConnectionClosed | WsError::Protocol(_)))) => {
                debug!("{}: browser WebSocket closed", session.label());
                break;
            }
            Ok(Some(Err(e))) => {
                warn!("{}: WebSocket error: {e}", session.label());
                break;
            }
            Ok(None) => {
                debug!("{}: stream ended", session.label());
                break;
            }
        };

        let record = match ws_msg {
            WsMessage::Text(text) => text,
            WsMessage::Binary(bytes) => {
                // Some clients send JSON as binary frames.  Invalid UTF-8
                // sequences are replaced before parsing.
                String::from_utf8_lossy(&bytes).into_owned()
            }
            WsMessage::Ping(data) => {
                // tungstenite queues the Pong reply itself.
                debug!("{}: ping ({} bytes)", session.label(), data.len());
                continue;
            }
            WsMessage::Pong(_) | WsMessage::Frame(_) => continue,
            WsMessage::Close(_) => {
                debug!("{}: close frame received", session.label());
                break;
            }
        };

        session.process_batch([record.as_str()]);
        session.finish_batch();
    }

    session.close();
    Ok(())
}
