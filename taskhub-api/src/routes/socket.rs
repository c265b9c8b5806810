/// Realtime WebSocket endpoint
///
/// ```text
/// GET /socket   (Upgrade: websocket)
/// ```
///
/// Each connection registers with the relay, forwards its text frames to it
/// and drains its outbound queue back onto the socket.

use crate::app::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use taskhub_shared::realtime::Relay;
use tracing::{debug, warn};

/// Handle WebSocket upgrade
pub async fn socket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.relay))
}

async fn handle_socket(socket: WebSocket, relay: Arc<Relay>) {
    let (id, mut outbound) = relay.connect().await;
    let (mut sender, mut receiver) = socket.split();

    let send_task = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if sender.send(Message::Text(frame.to_string())).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let _ = relay.handle_text(id, &text).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    relay.disconnect(id).await;
    send_task.abort();
    debug!(conn_id = %id, "Socket closed");
}
