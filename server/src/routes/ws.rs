//! WebSocket handler — chat message relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID, joins the room, replays history, then
//! enters a `select!` loop:
//! - Incoming client text → decode + publish to the room
//! - Room broadcasts → forward to client
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → join room → send every history message in order
//! 2. Client sends a message → server stamps `time` → broadcast to all
//! 3. Undecodable frame, socket error, close, or eviction → part room

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use frames::{ChatMessage, CodecError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services;
use crate::state::AppState;

/// Per-client outbound queue depth.
const CLIENT_QUEUE: usize = 256;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();

    // Per-connection channel for receiving room broadcasts.
    let (client_tx, mut client_rx) = mpsc::channel::<ChatMessage>(CLIENT_QUEUE);

    let history = services::chat::join(&state, client_id, client_tx).await;
    info!(%client_id, replay = history.len(), "ws: client connected");

    let mut replayed = true;
    for message in &history {
        if send_message(&mut socket, message).await.is_err() {
            replayed = false;
            break;
        }
    }

    if replayed {
        loop {
            tokio::select! {
                msg = socket.recv() => {
                    let Some(msg) = msg else { break };
                    let msg = match msg {
                        Ok(msg) => msg,
                        Err(e) => {
                            warn!(%client_id, error = %e, "ws: recv failed");
                            break;
                        }
                    };
                    match msg {
                        Message::Text(text) => {
                            if let Err(e) = process_inbound_text(&state, client_id, text.as_str()).await {
                                warn!(%client_id, error = %e, "ws: invalid inbound message, closing");
                                break;
                            }
                        }
                        Message::Close(_) => break,
                        _ => {}
                    }
                }
                message = client_rx.recv() => {
                    // Sender gone: the room evicted this client.
                    let Some(message) = message else {
                        info!(%client_id, "ws: evicted from room");
                        break;
                    };
                    if send_message(&mut socket, &message).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    services::chat::part(&state, client_id).await;
    info!(%client_id, "ws: client disconnected");
}

/// Decode one inbound text frame and publish it to the room.
async fn process_inbound_text(state: &AppState, client_id: Uuid, text: &str) -> Result<(), CodecError> {
    let message = frames::decode_message(text)?;
    let stamped = services::chat::publish(state, message).await;
    debug!(%client_id, username = %stamped.username, time = ?stamped.time, "ws: recv message");
    Ok(())
}

async fn send_message(socket: &mut WebSocket, message: &ChatMessage) -> Result<(), ()> {
    let json = match frames::encode_message(message) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "ws: encode failed");
            return Err(());
        }
    };
    socket.send(Message::Text(json.into())).await.map_err(|e| {
        debug!(error = %e, "ws: send failed");
    })
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod ws_test;
