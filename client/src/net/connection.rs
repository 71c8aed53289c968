//! Connection seams used by the chat view.

#[cfg(test)]
#[path = "connection_test.rs"]
mod connection_test;

/// Lifecycle state of a duplex connection. Mirrors the browser
/// `WebSocket.readyState` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadyState {
    Connecting,
    Open,
    Closing,
    Closed,
}

impl ReadyState {
    /// Numeric form used for atomic storage.
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Connecting => 0,
            Self::Open => 1,
            Self::Closing => 2,
            Self::Closed => 3,
        }
    }

    /// Parse the numeric form. Unknown values collapse to `Closed`.
    #[must_use]
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::Open,
            2 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

/// A message-oriented duplex connection owned by exactly one view.
pub trait Connection {
    /// Current lifecycle state.
    fn ready_state(&self) -> ReadyState;

    /// Queue a text frame for transmission. Fire-and-forget: delivery is not
    /// confirmed and failures are not reported.
    fn send_text(&self, text: String);

    /// Start the close handshake. Safe to call in any state.
    fn close(&mut self);
}

/// Opens connections to an endpoint.
pub trait Connector {
    type Connection: Connection;

    /// Begin opening a connection. Returns immediately; the handle may still
    /// be `Connecting`, or already `Closed` if the open failed.
    fn open(&mut self, endpoint: &str) -> Self::Connection;
}
