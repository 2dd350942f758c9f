//! WebSocket Connection Handler
//!
//! Bridges one axum WebSocket to the gateway: registers the connection on
//! upgrade, feeds inbound frames to the registries, and forwards queued
//! outbound events until either side closes.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::{ClientMessage, ServerEvent};
use crate::startup::AppState;

/// Connect-time query parameters. Both are optional: a connection missing
/// `email` is anonymous, one missing `call` joins no room.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub email: Option<String>,
    pub call: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<ConnectQuery>,
    State(state): State<AppState>,
) -> Response {
    ws.max_message_size(state.settings.websocket.max_message_size)
        .max_frame_size(state.settings.websocket.max_frame_size)
        .on_upgrade(move |socket| handle_socket(socket, state, query))
}

/// Drive one connection for its whole lifetime.
async fn handle_socket(socket: WebSocket, state: AppState, query: ConnectQuery) {
    let connection_id = Uuid::new_v4();
    let identity = query
        .email
        .as_deref()
        .map(|raw| state.resolver.resolve(raw));

    tracing::debug!(connection = %connection_id, "new WebSocket connection");

    // Split socket for concurrent read/write
    let (mut sender, mut receiver) = socket.split();

    // Outbound channel: the gateway's deliver seam for this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let writer_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!("failed to serialize event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Register before reading so room replay events are queued first
    state
        .gateway
        .on_connect(connection_id, identity, query.call.as_deref(), tx);

    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(message) => state.gateway.handle_message(connection_id, message),
                Err(e) => {
                    // Malformed frames never reach the registries
                    tracing::debug!(
                        connection = %connection_id,
                        error = %e,
                        "discarding malformed frame"
                    );
                }
            },
            Ok(Message::Close(_)) => {
                tracing::debug!(connection = %connection_id, "connection closed by peer");
                break;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Handled by axum
            }
            Ok(Message::Binary(_)) => {
                tracing::debug!(connection = %connection_id, "ignoring binary frame");
            }
            Err(e) => {
                tracing::debug!(connection = %connection_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Disconnect cleanup is atomic for this connection: the channel is
    // removed before presence/room teardown, so nothing is delivered to it
    // from here on
    state.gateway.on_disconnect(connection_id);
    writer_task.abort();
}
