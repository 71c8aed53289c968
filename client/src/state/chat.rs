//! Chat view state: one connection, the received message list, and the
//! input buffer.
//!
//! DESIGN
//! ======
//! `ChatView` is an owned struct scoped to one view instance. Its `on_*`
//! handlers are called by the dispatch loop one at a time and each runs to
//! completion, so the view needs no locking.
//!
//! LIFECYCLE
//! =========
//! 1. `on_mount` opens the single connection to [`ENDPOINT`]
//! 2. inbound frames append to the message list in arrival order
//! 3. `on_send_clicked` sends the input buffer when the connection is open
//! 4. `on_unmount` closes the connection; later frames are ignored

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use frames::{ChatMessage, CodecError};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::net::{Connection, Connector, ReadyState};

/// Fixed chat server endpoint.
pub const ENDPOINT: &str = "ws://localhost:8080/ws";

/// Error returned by [`ChatView::on_inbound_frame`].
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// The frame was not valid JSON and was not appended.
    #[error("malformed inbound frame: {0}")]
    MalformedFrame(#[from] CodecError),
}

/// What `on_send_clicked` did with the input buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was empty after trimming; nothing changed.
    Ignored,
    /// One frame was handed to the connection.
    Sent,
    /// The connection was not open; the message was discarded.
    Dropped,
}

// =============================================================================
// RECEIVED MESSAGE
// =============================================================================

/// A message exactly as received from the network. No shape is enforced:
/// any JSON document is kept, including objects missing `username` or
/// `text`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceivedMessage(Value);

impl ReceivedMessage {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Raw JSON value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Display form of the `username` field.
    #[must_use]
    pub fn username(&self) -> String {
        field_text(&self.0, "username")
    }

    /// Display form of the `text` field.
    #[must_use]
    pub fn text(&self) -> String {
        field_text(&self.0, "text")
    }
}

/// Strings render bare, missing or null fields render empty, anything else
/// renders as its JSON text.
fn field_text(value: &Value, key: &str) -> String {
    match value.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// =============================================================================
// CHAT VIEW
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Unmounted,
    Mounted,
    Torn,
}

/// State for the chat view.
pub struct ChatView<C> {
    connection: Option<C>,
    messages: Vec<ReceivedMessage>,
    input: String,
    lifecycle: Lifecycle,
}

impl<C: Connection> ChatView<C> {
    #[must_use]
    pub fn new() -> Self {
        Self { connection: None, messages: Vec::new(), input: String::new(), lifecycle: Lifecycle::Unmounted }
    }

    /// Open the view's connection. Only the first call on a fresh view does
    /// anything; there is never more than one connection per view.
    pub fn on_mount<K>(&mut self, connector: &mut K)
    where
        K: Connector<Connection = C>,
    {
        if self.lifecycle != Lifecycle::Unmounted {
            debug!(lifecycle = ?self.lifecycle, "chat: mount ignored");
            return;
        }
        self.connection = Some(connector.open(ENDPOINT));
        self.lifecycle = Lifecycle::Mounted;
        info!(endpoint = ENDPOINT, "chat: mounted");
    }

    /// Parse one inbound frame and append it unchanged.
    ///
    /// Frames arriving before mount or after unmount are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::MalformedFrame`] when `raw` is not valid JSON.
    /// The message list is left unchanged in that case.
    pub fn on_inbound_frame(&mut self, raw: &str) -> Result<(), ViewError> {
        if self.lifecycle != Lifecycle::Mounted {
            debug!("chat: frame ignored, view not mounted");
            return Ok(());
        }
        let value = frames::decode_value(raw)?;
        self.messages.push(ReceivedMessage::new(value));
        Ok(())
    }

    /// Replace the input buffer verbatim.
    pub fn on_input_change(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Send the input buffer as the local user.
    ///
    /// Whitespace-only input is ignored and left in place. Otherwise the
    /// untrimmed text is sent if the connection is open, silently dropped if
    /// not, and the buffer is cleared either way.
    pub fn on_send_clicked(&mut self) -> SendOutcome {
        if self.input.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        let text = std::mem::take(&mut self.input);
        let open = self
            .connection
            .as_ref()
            .filter(|conn| conn.ready_state() == ReadyState::Open);
        let Some(conn) = open else {
            debug!("chat: send dropped, connection not open");
            return SendOutcome::Dropped;
        };

        match frames::encode_message(&ChatMessage::outgoing(text)) {
            Ok(json) => {
                conn.send_text(json);
                SendOutcome::Sent
            }
            Err(e) => {
                warn!(error = %e, "chat: outbound encode failed");
                SendOutcome::Dropped
            }
        }
    }

    /// Close the connection. Runs once; later calls do nothing.
    pub fn on_unmount(&mut self) {
        if self.lifecycle != Lifecycle::Mounted {
            return;
        }
        if let Some(conn) = self.connection.as_mut() {
            conn.close();
        }
        self.lifecycle = Lifecycle::Torn;
        info!(messages = self.messages.len(), "chat: unmounted");
    }

    /// Received messages in arrival order.
    #[must_use]
    pub fn messages(&self) -> &[ReceivedMessage] {
        &self.messages
    }

    /// Current input buffer.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// State of the view's connection, if one was opened.
    #[must_use]
    pub fn connection_state(&self) -> Option<ReadyState> {
        self.connection.as_ref().map(Connection::ready_state)
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }
}

impl<C: Connection> Default for ChatView<C> {
    fn default() -> Self {
        Self::new()
    }
}
