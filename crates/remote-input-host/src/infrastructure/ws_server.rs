//! WebSocket server: accept loop and per-session task management.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming TCP connections from controllers (phones).
//! 3. Upgrading each connection to a WebSocket session with a bounded
//!    message size.
//! 4. Decoding every text frame into a [`RemoteEvent`] and handing it to the
//!    shared [`InputWorker`], one event at a time.
//! 5. Stopping the accept loop when the `running` flag is cleared.
//!
//! # Ordering
//!
//! A session task awaits each dispatch before reading the next frame, so a
//! controller's events reach the OS in the order they were sent.  Events from
//! different controllers interleave at event granularity through the worker
//! queue.
//!
//! # No replies
//!
//! The protocol is fire-and-forget.  The host never writes frames to the
//! controller except the Close frame that ends a session.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use remote_input_core::{decode_frame, ProtocolError, RemoteEvent};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async_with_config,
    tungstenite::{
        protocol::{frame::coding::CloseCode, CloseFrame, WebSocketConfig},
        Error as WsError, Message as WsMessage,
    },
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::HostConfig;
use crate::infrastructure::input_worker::{InputWorker, WorkerError};

/// How often the accept loop re-checks the `running` flag while idle.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds `config.bind_addr` and serves controllers until `running` is cleared.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot be bound (e.g., the port is
/// already in use or the process lacks permission to bind).
pub async fn run_server(
    config: HostConfig,
    worker: InputWorker,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind WebSocket listener on {}", config.bind_addr))?;

    serve(listener, config, worker, running).await
}

/// Runs the accept loop on an already-bound listener.
///
/// Split out from [`run_server`] so tests can bind port 0 and learn the real
/// address before serving.
///
/// # Errors
///
/// Returns an error if the listener's local address cannot be read.
pub async fn serve(
    listener: TcpListener,
    config: HostConfig,
    worker: InputWorker,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let local_addr = listener
        .local_addr()
        .context("failed to read listener address")?;
    info!("remote input host listening on ws://{local_addr}");

    let config = Arc::new(config);

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // Short timeout so the flag is seen even when nobody connects.
        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                let session_id = Uuid::new_v4();
                info!("session {session_id}: new controller connection from {peer_addr}");
                let cfg = Arc::clone(&config);
                let worker = worker.clone();
                tokio::spawn(async move {
                    handle_controller_session(stream, peer_addr, session_id, cfg, worker).await;
                });
            }
            Ok(Err(e)) => {
                // Transient (e.g. out of file descriptors); keep serving.
                error!("accept error: {e}");
            }
            Err(_) => {}
        }
    }

    Ok(())
}

// ── Per-session handler ───────────────────────────────────────────────────────

/// Why a session ended.  Only used for the close log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// The controller sent Close or the stream ended.
    ClosedByPeer,
    /// The host closed the session after an emulation failure.
    ClosedOnError,
    /// The input worker is gone.
    WorkerStopped,
    /// Transport error, including an oversized message.
    TransportError,
}

/// What the read loop does after one text frame.
#[derive(Debug, PartialEq)]
enum FrameAction {
    Continue,
    Close(CloseFrame<'static>),
    End(SessionEnd),
}

async fn handle_controller_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    session_id: Uuid,
    config: Arc<HostConfig>,
    worker: InputWorker,
) {
    match run_session(raw_stream, session_id, &config, &worker).await {
        Ok((end, events)) => {
            info!("session {session_id} ({peer_addr}) ended: {end:?} after {events} events");
        }
        Err(e) => warn!("session {session_id} ({peer_addr}) failed: {e:#}"),
    }
}

/// Runs one controller session to completion.
///
/// Returns why the session ended and how many events were decoded.
///
/// # Errors
///
/// Returns an error only if the WebSocket handshake fails.
async fn run_session(
    raw_stream: TcpStream,
    session_id: Uuid,
    config: &HostConfig,
    worker: &InputWorker,
) -> anyhow::Result<(SessionEnd, u64)> {
    let ws_stream = accept_async_with_config(raw_stream, Some(websocket_config(config)))
        .await
        .context("WebSocket handshake failed")?;
    debug!("session {session_id}: WebSocket session established");

    let (mut ws_tx, mut ws_rx) = ws_stream.split();
    let mut events: u64 = 0;

    let end = loop {
        let ws_msg = match ws_rx.next().await {
            Some(Ok(msg)) => msg,
            Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) | None => {
                debug!("session {session_id}: controller stream ended");
                break SessionEnd::ClosedByPeer;
            }
            Some(Err(e)) => {
                warn!("session {session_id}: WebSocket error: {e}");
                break SessionEnd::TransportError;
            }
        };

        match ws_msg {
            WsMessage::Text(text) => {
                if let Ok(event) = decode_logged(session_id, &text) {
                    events += 1;
                    match handle_event(session_id, event, worker, config.close_on_error).await {
                        FrameAction::Continue => {}
                        FrameAction::End(end) => break end,
                        FrameAction::Close(frame) => {
                            if let Err(e) = ws_tx.send(WsMessage::Close(Some(frame))).await {
                                debug!("session {session_id}: failed to send Close: {e}");
                            }
                            break SessionEnd::ClosedOnError;
                        }
                    }
                }
            }
            WsMessage::Binary(_) => {
                warn!("session {session_id}: unexpected binary WebSocket frame (ignored)");
            }
            WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => {}
            WsMessage::Close(_) => {
                debug!("session {session_id}: WebSocket Close frame received");
                break SessionEnd::ClosedByPeer;
            }
        }
    };

    Ok((end, events))
}

/// Decodes one text frame, logging the reason if it is dropped.
///
/// Unknown event names are expected from newer controllers and only logged at
/// debug level.
fn decode_logged(session_id: Uuid, text: &str) -> Result<RemoteEvent, ProtocolError> {
    decode_frame(text).map_err(|e| {
        match &e {
            ProtocolError::UnknownEvent(name) => {
                debug!("session {session_id}: ignoring unknown event {name:?}");
            }
            other => warn!("session {session_id}: dropping frame: {other}"),
        }
        e
    })
}

/// Dispatches one decoded event and decides whether the session continues.
async fn handle_event(
    session_id: Uuid,
    event: RemoteEvent,
    worker: &InputWorker,
    close_on_error: bool,
) -> FrameAction {
    let name = event.name();
    match worker.dispatch(event).await {
        Ok(_) => FrameAction::Continue,
        Err(WorkerError::Stopped) => {
            error!("session {session_id}: input worker stopped; closing session");
            FrameAction::End(SessionEnd::WorkerStopped)
        }
        Err(e) if close_on_error => {
            warn!("session {session_id}: {name} failed: {e}; closing session");
            FrameAction::Close(CloseFrame {
                code: CloseCode::Error,
                reason: "input injection failed".into(),
            })
        }
        Err(e) => {
            warn!("session {session_id}: {name} failed: {e}");
            FrameAction::Continue
        }
    }
}

fn websocket_config(config: &HostConfig) -> WebSocketConfig {
    WebSocketConfig {
        max_message_size: Some(config.max_message_bytes),
        max_frame_size: Some(config.max_message_bytes),
        ..Default::default()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
