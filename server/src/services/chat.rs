//! Chat room service: membership, history, and broadcast.
//!
//! DESIGN
//! ======
//! Every mutation takes the room write lock, so joins and publishes are
//! totally ordered. A joining client is registered and handed the history
//! snapshot under the same lock, which means it sees each message exactly
//! once: either in the replay or on its channel, never both.
//!
//! A client that cannot take a broadcast is dropped from the room, whether
//! its channel is closed or full. Dropping the sender ends that client's
//! session, so a slow client is disconnected rather than left with a gap.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use frames::ChatMessage;
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::AppState;

/// Register a client and return the history it should replay, oldest first.
pub async fn join(state: &AppState, client_id: Uuid, tx: mpsc::Sender<ChatMessage>) -> Vec<ChatMessage> {
    let mut room = state.room.write().await;
    room.clients.insert(client_id, tx);
    info!(%client_id, clients = room.clients.len(), history = room.history.len(), "client joined room");
    room.history.clone()
}

/// Remove a client. Unknown IDs are ignored.
pub async fn part(state: &AppState, client_id: Uuid) {
    let mut room = state.room.write().await;
    if room.clients.remove(&client_id).is_some() {
        info!(%client_id, remaining = room.clients.len(), "client left room");
    }
}

/// Stamp a message with the current time, record it, and broadcast it to
/// every connected client, the sender included. Returns the stamped message.
pub async fn publish(state: &AppState, message: ChatMessage) -> ChatMessage {
    publish_at(state, message, OffsetDateTime::now_utc()).await
}

/// [`publish`] with an explicit receive time.
pub async fn publish_at(state: &AppState, message: ChatMessage, at: OffsetDateTime) -> ChatMessage {
    let message = message.stamped(at);

    let mut room = state.room.write().await;
    room.history.push(message.clone());

    let mut gone = Vec::new();
    for (client_id, tx) in &room.clients {
        match tx.try_send(message.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(%client_id, "client queue full, evicting");
                gone.push(*client_id);
            }
            Err(TrySendError::Closed(_)) => gone.push(*client_id),
        }
    }
    for client_id in gone {
        room.clients.remove(&client_id);
        debug!(%client_id, "dropped client");
    }

    debug!(username = %message.username, recipients = room.clients.len(), "message broadcast");
    message
}
