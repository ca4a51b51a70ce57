use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use spotwatch_core::types::{ClientId, LotId};
use spotwatch_events::SubscriptionHub;

use crate::state::AppState;
use crate::ws::HEARTBEAT_INTERVAL_SECS;

/// Subscription commands a client may send over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Subscribe { lot_id: LotId },
    Unsubscribe { lot_id: LotId },
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with the subscription
/// hub and managed by two tasks (sender + receiver).
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, Arc::clone(&state.hub)))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers a fresh client id with the hub.
///   2. Spawns a sender task that forwards hub events and heartbeat pings.
///   3. Processes inbound subscribe/unsubscribe messages on this task.
///   4. Disconnects from the hub on any exit path, which releases every
///      subscription the client held.
async fn handle_socket(socket: WebSocket, hub: Arc<SubscriptionHub>) {
    let client_id: ClientId = uuid::Uuid::new_v4();
    tracing::info!(%client_id, "WebSocket connected");

    let mut rx = hub.register(client_id).await;
    let (mut sink, mut stream) = socket.split();

    // Sender task: forward hub events to the socket, pinging on an interval.
    let sender_client_id = client_id;
    let send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
        // The first tick completes immediately; consume it so the initial
        // ping lands one interval after connect.
        heartbeat.tick().await;

        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => {
                        let text = match serde_json::to_string(&event) {
                            Ok(text) => text,
                            Err(e) => {
                                tracing::error!(client_id = %sender_client_id, error = %e, "Failed to encode event");
                                continue;
                            }
                        };
                        if sink.send(Message::Text(text.into())).await.is_err() {
                            tracing::debug!(client_id = %sender_client_id, "WebSocket sink closed");
                            break;
                        }
                    }
                    // Hub dropped our channel (eviction or shutdown).
                    None => {
                        let _ = sink.send(Message::Close(None)).await;
                        break;
                    }
                },
                _ = heartbeat.tick() => {
                    if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Receiver loop: process inbound subscription commands.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_client_message(&hub, client_id, text.as_str()).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(%client_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(%client_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: a disconnect releases every subscription the client held.
    hub.disconnect(client_id).await;
    send_task.abort();
    tracing::info!(%client_id, "WebSocket disconnected");
}

/// Parse and apply one inbound client message.
///
/// Malformed messages are logged and ignored; the protocol has no error
/// frames and a bad message never drops the connection.
async fn handle_client_message(hub: &SubscriptionHub, client_id: ClientId, text: &str) {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(%client_id, error = %e, "Ignoring malformed client message");
            return;
        }
    };

    match message {
        ClientMessage::Subscribe { lot_id } => {
            hub.subscribe(client_id, lot_id).await;
            tracing::debug!(%client_id, %lot_id, "Subscribed");
        }
        ClientMessage::Unsubscribe { lot_id } => {
            hub.unsubscribe(client_id, lot_id).await;
            tracing::debug!(%client_id, %lot_id, "Unsubscribed");
        }
    }
}
