//! WebSocket upgrade handler.
//!
//! Each connected client receives:
//! 1. A [`WsMessage::Snapshot`] of busy features on connect.
//! 2. Batch progress messages as they are broadcast.
//!
//! The channel is server-to-client only; text frames from the client are
//! ignored.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt, stream::SplitSink};
use noir_studio::prelude::*;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::broadcast::WsMessage;

#[derive(Clone)]
pub struct WsState {
    pub studio: Arc<Studio>,
    pub broadcast_tx: broadcast::Sender<WsMessage>,
}

/// GET /ws
pub async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(ws_state): State<WsState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, ws_state))
}

fn snapshot(studio: &Studio) -> WsMessage {
    WsMessage::Snapshot {
        busy: Feature::ALL
            .into_iter()
            .filter(|f| studio.is_busy(*f))
            .collect(),
    }
}

async fn handle_socket(socket: WebSocket, ws_state: WsState) {
    let (mut sink, mut stream) = socket.split();

    // Subscribe before the snapshot so nothing falls in between.
    let mut broadcast_rx = ws_state.broadcast_tx.subscribe();
    if ws_send(&mut sink, &snapshot(&ws_state.studio)).await.is_err() {
        return;
    }
    debug!("WebSocket client connected");

    let studio = ws_state.studio.clone();
    let forward_task = tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(msg) => {
                    if ws_send(&mut sink, &msg).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("WebSocket client lagged by {n} messages, resending snapshot");
                    if ws_send(&mut sink, &snapshot(&studio)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    while let Some(Ok(msg)) = stream.next().await {
        if let Message::Close(_) = msg {
            break;
        }
    }

    debug!("WebSocket client disconnected");
    forward_task.abort();
}

async fn ws_send(sink: &mut SplitSink<WebSocket, Message>, msg: &WsMessage) -> Result<(), ()> {
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
