//! Networking modules for the websocket chat transport.
//!
//! SYSTEM CONTEXT
//! ==============
//! `connection` defines the seams the chat view depends on (ready state,
//! fire-and-forget send, close) and `socket` implements them over
//! `tokio-tungstenite`. The view never touches the socket directly, so tests
//! swap in an in-memory connection.

pub mod connection;
pub mod socket;

pub use connection::{Connection, Connector, ReadyState};
pub use socket::{SocketEvent, WsConnection, WsConnector};

#[cfg(test)]
pub mod test_helpers;
