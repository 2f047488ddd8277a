//! Tunnel session: one persistent WebSocket connection to the edge gateway.
//!
//! The session runs three kinds of concurrently progressing work over the
//! single connection: the inbound read loop, a keepalive ping loop, and one
//! dispatch task per in-flight request. Requests are dispatched fire-and-
//! forget so a slow local call never delays ping/pong or other requests;
//! responses correlate by `request_id`, not by order. All outbound writes
//! funnel through one writer task, so each frame is written whole.

use std::sync::Arc;
use std::time::Duration;

use edge_tunnel_common::constants::{OUTGOING_CHANNEL_CAPACITY, PING_INTERVAL_SECS};
use edge_tunnel_common::{
    Message, RequestEnvelope, ResponsePayload, Result, TunnelError, seal_response,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message as WsMessage,
};
use tracing::{debug, error, info, warn};

use crate::executor::LocalExecutor;

type WebSocket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// How a session ended, as seen by the reconnect supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Gateway sent a shutdown message; do not reconnect
    Shutdown,
    /// Connection dropped or errored; reconnection is warranted
    Dropped,
}

/// What the read loop should do after handling one inbound frame
enum Flow {
    Continue,
    Shutdown,
    Lost,
}

/// An established connection to the edge gateway
pub struct TunnelSession {
    ws: WebSocket,
}

impl TunnelSession {
    /// Connect to the gateway. With a token configured, it is attached as an
    /// `X-Tunnel-Token` header (pre-registration deployments); without one
    /// the gateway assigns an identity and announces it via `connected`.
    pub async fn connect(edge_url: &str, token: Option<&str>) -> Result<Self> {
        let url = normalize_edge_url(edge_url);
        info!("Connecting to {url}");

        let (ws, _) = if let Some(token) = token {
            let mut request = url
                .clone()
                .into_client_request()
                .map_err(|e| TunnelError::ConnectionError(format!("Invalid URL: {e}")))?;
            request.headers_mut().insert(
                "x-tunnel-token",
                HeaderValue::from_str(token)
                    .map_err(|e| TunnelError::ConnectionError(format!("Invalid token: {e}")))?,
            );
            connect_async(request).await
        } else {
            connect_async(&url).await
        }
        .map_err(|e| TunnelError::ConnectionError(e.to_string()))?;

        info!("Connected to edge tunnel");
        Ok(Self { ws })
    }

    /// Main loop: read and dispatch until the connection ends, then tear
    /// down the keepalive task and any in-flight dispatch tasks.
    pub async fn run(self, executor: Arc<LocalExecutor>) -> SessionEnd {
        let (write, mut read) = self.ws.split();
        let (outgoing_tx, outgoing_rx) = mpsc::channel(OUTGOING_CHANNEL_CAPACITY);

        let write_task = tokio::spawn(write_loop(write, outgoing_rx));
        let keepalive_task = tokio::spawn(keepalive_loop(outgoing_tx.clone()));
        let mut dispatch_tasks = JoinSet::new();

        let mut end = SessionEnd::Dropped;

        while let Some(frame) = read.next().await {
            match frame {
                Ok(WsMessage::Text(text)) => {
                    match handle_text_frame(&text, &outgoing_tx, &executor, &mut dispatch_tasks)
                        .await
                    {
                        Flow::Continue => {}
                        Flow::Shutdown => {
                            end = SessionEnd::Shutdown;
                            break;
                        }
                        Flow::Lost => break,
                    }
                }
                Ok(WsMessage::Ping(data)) => {
                    if outgoing_tx.send(WsMessage::Pong(data)).await.is_err() {
                        break;
                    }
                }
                Ok(WsMessage::Pong(_)) => {}
                Ok(WsMessage::Close(_)) => {
                    info!("Gateway closed connection");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    error!("WebSocket error: {e}");
                    break;
                }
            }
        }

        keepalive_task.abort();
        dispatch_tasks.abort_all();
        write_task.abort();

        end
    }
}

/// Parse one text frame and dispatch it. Malformed JSON and unknown message
/// types are logged and ignored; they never end the session.
async fn handle_text_frame(
    text: &str,
    outgoing_tx: &mpsc::Sender<WsMessage>,
    executor: &Arc<LocalExecutor>,
    dispatch_tasks: &mut JoinSet<()>,
) -> Flow {
    let message: Message = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(_) => {
            warn!("Received non-JSON message: {text}");
            return Flow::Continue;
        }
    };

    match message {
        Message::Request(req) => {
            // Fire-and-forget so the next frame is never blocked on local
            // execution; the JoinSet is bookkeeping for teardown only
            let executor = executor.clone();
            let outgoing_tx = outgoing_tx.clone();
            dispatch_tasks.spawn(dispatch_request(req, executor, outgoing_tx));

            // Reap finished tasks
            while dispatch_tasks.try_join_next().is_some() {}
        }
        Message::Ping => {
            let Ok(json) = serde_json::to_string(&Message::Pong) else {
                return Flow::Continue;
            };
            if outgoing_tx.send(WsMessage::Text(json.into())).await.is_err() {
                return Flow::Lost;
            }
        }
        Message::Pong => {
            debug!("Received pong");
        }
        Message::Connected {
            public_url,
            slug,
            tunnel_id,
        } => {
            info!("Tunnel established: {public_url} (slug={slug}, tunnel_id={tunnel_id})");
        }
        Message::Shutdown => {
            info!("Received shutdown request from edge gateway");
            return Flow::Shutdown;
        }
        Message::Response(_) => {
            debug!("Ignoring inbound response message");
        }
        Message::Unknown => {
            debug!("Ignoring unknown message type");
        }
    }

    Flow::Continue
}

/// Execute one request against the local server and queue the sealed
/// response. Nothing here is fatal to the session.
async fn dispatch_request(
    req: RequestEnvelope,
    executor: Arc<LocalExecutor>,
    outgoing_tx: mpsc::Sender<WsMessage>,
) {
    let request_id = req.request_id.clone();
    info!(%request_id, "Received request: {} {}", req.method, req.path);

    let payload = executor.execute(&req).await;
    let status = payload.status;

    let message = match seal_response(payload) {
        Ok(message) => message,
        Err(e) => {
            error!(%request_id, "Failed to encode response: {e}");
            let fallback =
                ResponsePayload::synthesized(&request_id, 500, format!("Internal error: {e}"));
            match seal_response(fallback) {
                Ok(message) => message,
                Err(e) => {
                    error!(%request_id, "Failed to encode fallback response: {e}");
                    return;
                }
            }
        }
    };

    let json = match serde_json::to_string(&message) {
        Ok(json) => json,
        Err(e) => {
            error!(%request_id, "Failed to serialize response: {e}");
            return;
        }
    };

    info!(%request_id, "Sending response: status={status}");
    if outgoing_tx.send(WsMessage::Text(json.into())).await.is_err() {
        warn!(%request_id, "Failed to send response back to tunnel");
    }
}

/// Single writer: all outbound frames pass through here, one at a time
async fn write_loop(mut write: SplitSink<WebSocket, WsMessage>, mut rx: mpsc::Receiver<WsMessage>) {
    while let Some(message) = rx.recv().await {
        if let Err(e) = write.send(message).await {
            error!("Failed to write to tunnel: {e}");
            break;
        }
    }
    debug!("Write task exiting");
}

/// Periodic keepalive ping. Exits silently when the write side is gone;
/// the read loop observes the dead connection on its own.
async fn keepalive_loop(outgoing_tx: mpsc::Sender<WsMessage>) {
    let mut interval = tokio::time::interval(Duration::from_secs(PING_INTERVAL_SECS));

    loop {
        interval.tick().await;
        let Ok(json) = serde_json::to_string(&Message::Ping) else {
            return;
        };
        if outgoing_tx.send(WsMessage::Text(json.into())).await.is_err() {
            return;
        }
        debug!("Sent keepalive ping");
    }
}

/// The gateway serves the tunnel endpoint under `/ws`; accept both a bare
/// gateway URL and a full endpoint URL.
fn normalize_edge_url(edge_url: &str) -> String {
    let trimmed = edge_url.trim_end_matches('/');
    if trimmed.ends_with("/ws") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/ws")
    }
}
