//! WebSocket endpoint for match notifications.
//!
//! A waiting user keeps this connection open; when a pairing lands, the
//! coordinator pushes the match payload through the connection registry as
//! a JSON text frame. Inbound frames are keepalives and are discarded.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::notify::ConnectionRegistry;
use crate::state::AppState;

/// Upgrade handler for `/ws/match/{user_id}`
pub async fn match_notifications(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let registry = state.registry.clone();
    ws.on_upgrade(move |socket| handle_socket(registry, user_id, socket))
}

async fn handle_socket(registry: Arc<ConnectionRegistry>, user_id: String, socket: WebSocket) {
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
    registry.register(&user_id, outbound_tx.clone());

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(text) => {
                        if sink.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    // Registry shut down or this connection was replaced.
                    None => break,
                }
            }
            inbound = stream.next() => {
                match inbound {
                    // Keepalive bytes from the client, read and discarded.
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    registry.unregister(&user_id, &outbound_tx);
    let _ = sink.close().await;
}
