//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the single chat room: the connected clients and the in-memory
//! message history replayed to every new connection. History lives only as
//! long as the process.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::collections::HashMap;
use std::sync::Arc;

use frames::ChatMessage;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

// =============================================================================
// ROOM STATE
// =============================================================================

/// Live chat room state.
pub struct RoomState {
    /// Connected clients: `client_id` -> sender for outgoing messages.
    pub clients: HashMap<Uuid, mpsc::Sender<ChatMessage>>,
    /// Every accepted message, in broadcast order.
    pub history: Vec<ChatMessage>,
}

impl RoomState {
    #[must_use]
    pub fn new() -> Self {
        Self { clients: HashMap::new(), history: Vec::new() }
    }
}

impl Default for RoomState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub room: Arc<RwLock<RoomState>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self { room: Arc::new(RwLock::new(RoomState::new())) }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
