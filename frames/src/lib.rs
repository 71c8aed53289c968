//! Shared chat message model and JSON codec for realtime WS transport.
//!
//! This crate owns the wire representation used by both `server` and
//! `client`. Every WebSocket text frame carries exactly one message object
//! encoded as UTF-8 JSON; there is no envelope, version field, or batching.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// Username stamped on every message composed by the chat view.
pub const LOCAL_USERNAME: &str = "User";

/// Error returned by the decode functions.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The frame text is not valid JSON, or not a message-shaped object.
    #[error("invalid json frame: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single chat message on the realtime wire protocol.
///
/// Missing `username`/`text` decode as empty strings. `time` is set by the
/// server when it accepts the message and is omitted from the JSON when
/// absent, so locally composed messages encode as exactly
/// `{"username":..,"text":..}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub text: String,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<OffsetDateTime>,
}

impl ChatMessage {
    /// Build an outbound message from the local user. `text` is kept verbatim.
    #[must_use]
    pub fn outgoing(text: impl Into<String>) -> Self {
        Self { username: LOCAL_USERNAME.to_owned(), text: text.into(), time: None }
    }

    /// Return the message with its receive time set to `at`.
    #[must_use]
    pub fn stamped(mut self, at: OffsetDateTime) -> Self {
        self.time = Some(at);
        self
    }
}

/// Encode a message as a JSON text frame.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails, which only happens
/// for timestamps outside the RFC 3339 year range.
pub fn encode_message(message: &ChatMessage) -> Result<String, CodecError> {
    Ok(serde_json::to_string(message)?)
}

/// Decode a JSON text frame into a typed message.
///
/// # Errors
///
/// Returns [`CodecError::Json`] when the text is not JSON or is not an
/// object with string-compatible fields.
pub fn decode_message(raw: &str) -> Result<ChatMessage, CodecError> {
    Ok(serde_json::from_str(raw)?)
}

/// Decode a JSON text frame without checking its shape.
///
/// Any valid JSON document is accepted as-is; this is what the chat view
/// stores, since received payloads are trusted unchanged.
///
/// # Errors
///
/// Returns [`CodecError::Json`] only when the text is not valid JSON.
pub fn decode_value(raw: &str) -> Result<Value, CodecError> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
