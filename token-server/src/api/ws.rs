//! Realtime WebSocket endpoint
//!
//! GET /ws — no auth: channel names are unguessable order UUIDs handed
//! out by the create-order response.
//!
//! 协议:
//! - Client → Server: `{"join": "<orderId>"}` — may be sent repeatedly to
//!   watch several orders on one connection
//! - Server → Client: `StatusUpdate` JSON on every status change of a
//!   joined order

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use shared::{JoinCommand, StatusUpdate};
use tokio::sync::{broadcast, mpsc};
use tokio::time::Duration;

use crate::live::StatusHub;
use crate::state::AppState;

/// Per-connection buffer between channel forwarders and the socket
const SESSION_BUFFER: usize = 32;

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(handle_ws))
}

async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_session(socket, state.status_hub.clone()))
}

async fn ws_session(socket: WebSocket, hub: StatusHub) {
    let (mut sink, mut stream) = socket.split();

    tracing::debug!("Status WS connected");

    // Joined channels feed one mpsc queue; the session loop owns the sink
    let (tx, mut rx) = mpsc::channel::<StatusUpdate>(SESSION_BUFFER);
    let mut forwarders: Vec<tokio::task::JoinHandle<()>> = Vec::new();

    let mut ping_interval = tokio::time::interval(Duration::from_secs(30));
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            update = rx.recv() => {
                let Some(update) = update else { break };
                if send_update(&mut sink, &update).await.is_err() {
                    break;
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(cmd) = serde_json::from_str::<JoinCommand>(&text) {
                            tracing::debug!(order_id = %cmd.join, "Client joined order channel");
                            forwarders.push(spawn_forwarder(&hub, &cmd.join, tx.clone()));
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {} // Ping/Pong/Binary
                }
            }
        }
    }

    for handle in forwarders {
        handle.abort();
    }
    tracing::debug!("Status WS disconnected");
}

/// Forward one order channel into the session queue until either side
/// goes away. Lagged events are skipped — the client re-queries through
/// the read path instead of replaying.
fn spawn_forwarder(
    hub: &StatusHub,
    order_id: &str,
    tx: mpsc::Sender<StatusUpdate>,
) -> tokio::task::JoinHandle<()> {
    let mut hub_rx = hub.subscribe(order_id);
    let order_id = order_id.to_string();
    tokio::spawn(async move {
        loop {
            match hub_rx.recv().await {
                Ok(update) => {
                    if tx.send(update).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(order_id = %order_id, lagged = n, "Status subscriber lagged, events skipped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

async fn send_update(
    sink: &mut SplitSink<WebSocket, Message>,
    update: &StatusUpdate,
) -> Result<(), axum::Error> {
    match serde_json::to_string(update) {
        Ok(payload) => sink.send(Message::Text(payload.into())).await,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize status update");
            Ok(())
        }
    }
}
