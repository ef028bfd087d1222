//! WebSocket sessions.
//!
//! Each connection gets one [`Subscriber`]. A writer task drains its
//! channel into the socket while the read loop turns `follow_stop` events
//! into tracker commands. Closing the socket detaches the subscriber from
//! every group it joined.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use crate::tracking::{ServerMessage, Subscriber, SubscriptionKey};

use super::dto::ClientEvent;
use super::state::AppState;

pub(super) async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| session(socket, state))
}

async fn session(socket: WebSocket, state: AppState) {
    let (subscriber, mut outbound) = Subscriber::channel();
    let id = subscriber.id();
    let (mut sink, mut inbound) = socket.split();
    info!(subscriber = %id, "client connected");

    let writer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    warn!(subscriber = %id, error = %e, "failed to encode message");
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = inbound.next().await {
        match frame {
            Ok(Message::Text(text)) => handle_text(&state, &subscriber, &text).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(subscriber = %id, error = %e, "socket read failed");
                break;
            }
        }
    }

    state.tracker.leave(id).await;
    writer.abort();
    info!(subscriber = %id, "client disconnected");
}

/// Handle one inbound text frame.
///
/// Frames that are not a known event are ignored.
async fn handle_text(state: &AppState, subscriber: &Subscriber, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            debug!(subscriber = %subscriber.id(), error = %e, "ignoring client frame");
            return;
        }
    };

    match event {
        ClientEvent::FollowStop { stop, route_id } => {
            let room = SubscriptionKey::new(route_id.clone(), stop.clone());
            match state
                .tracker
                .follow(route_id, stop, subscriber.clone())
                .await
            {
                Ok(_) => info!(subscriber = %subscriber.id(), %room, "following stop"),
                Err(e) => {
                    info!(subscriber = %subscriber.id(), %room, error = %e, "follow rejected");
                    subscriber.send(ServerMessage::Error {
                        message: e.to_string(),
                    });
                }
            }
        }
    }
}
