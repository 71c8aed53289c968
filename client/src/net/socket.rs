//! WebSocket connection backed by `tokio-tungstenite`.
//!
//! DESIGN
//! ======
//! `WsConnector::open` returns a handle immediately in `Connecting` and
//! spawns one I/O task per connection. The task owns the socket: it performs
//! the handshake, forwards queued outbound text, and pushes inbound text
//! frames onto the connector's event channel. The handle only shares the
//! atomic ready state and the outbound queue with the task.
//!
//! There is no reconnect. A failed handshake or a remote close leaves the
//! handle `Closed` for good and later sends are dropped.
//!
//! Must be used from inside a Tokio runtime.

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use super::connection::{Connection, Connector, ReadyState};

// =============================================================================
// EVENTS
// =============================================================================

/// Event delivered from a connection's I/O task to the dispatch loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SocketEvent {
    /// Handshake completed; the connection is `Open`.
    Opened,
    /// One inbound text frame, untouched.
    Frame(String),
    /// The connection reached `Closed` (open failure, remote close, or local
    /// close finished).
    Closed,
}

enum Outbound {
    Text(String),
    Close,
}

// =============================================================================
// CONNECTOR
// =============================================================================

/// Opens [`WsConnection`]s that report into a shared event channel.
#[derive(Clone)]
pub struct WsConnector {
    events: mpsc::UnboundedSender<SocketEvent>,
}

impl WsConnector {
    #[must_use]
    pub fn new(events: mpsc::UnboundedSender<SocketEvent>) -> Self {
        Self { events }
    }
}

impl Connector for WsConnector {
    type Connection = WsConnection;

    fn open(&mut self, endpoint: &str) -> WsConnection {
        let (tx, rx) = mpsc::unbounded_channel::<Outbound>();
        let ready_state = Arc::new(AtomicU8::new(ReadyState::Connecting.as_u8()));

        tokio::spawn(run_socket(endpoint.to_owned(), Arc::clone(&ready_state), rx, self.events.clone()));

        WsConnection { outbound: tx, ready_state }
    }
}

// =============================================================================
// CONNECTION
// =============================================================================

/// Handle to one websocket connection.
pub struct WsConnection {
    outbound: mpsc::UnboundedSender<Outbound>,
    ready_state: Arc<AtomicU8>,
}

impl Connection for WsConnection {
    fn ready_state(&self) -> ReadyState {
        ReadyState::from_u8(self.ready_state.load(Ordering::SeqCst))
    }

    fn send_text(&self, text: String) {
        // Queue is gone once the I/O task has exited; the frame is dropped.
        let _ = self.outbound.send(Outbound::Text(text));
    }

    fn close(&mut self) {
        let current = self.ready_state();
        if matches!(current, ReadyState::Connecting | ReadyState::Open) {
            self.ready_state.store(ReadyState::Closing.as_u8(), Ordering::SeqCst);
        }
        let _ = self.outbound.send(Outbound::Close);
    }
}

// =============================================================================
// I/O TASK
// =============================================================================

async fn run_socket(
    endpoint: String,
    ready_state: Arc<AtomicU8>,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::UnboundedSender<SocketEvent>,
) {
    let stream = match connect_async(endpoint.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            warn!(%endpoint, error = %e, "ws: connect failed");
            ready_state.store(ReadyState::Closed.as_u8(), Ordering::SeqCst);
            let _ = events.send(SocketEvent::Closed);
            return;
        }
    };

    let (mut write, mut read) = stream.split();

    // close() may have been called while the handshake was in flight.
    let opened = ready_state
        .compare_exchange(
            ReadyState::Connecting.as_u8(),
            ReadyState::Open.as_u8(),
            Ordering::SeqCst,
            Ordering::SeqCst,
        )
        .is_ok();

    if opened {
        info!(%endpoint, "ws: connected");
        let _ = events.send(SocketEvent::Opened);

        loop {
            tokio::select! {
                cmd = outbound.recv() => match cmd {
                    Some(Outbound::Text(text)) => {
                        debug!(bytes = text.len(), "ws: send frame");
                        if let Err(e) = write.send(Message::Text(text.into())).await {
                            warn!(error = %e, "ws: send failed");
                            break;
                        }
                    }
                    Some(Outbound::Close) | None => {
                        ready_state.store(ReadyState::Closing.as_u8(), Ordering::SeqCst);
                        break;
                    }
                },
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        debug!(bytes = text.len(), "ws: recv frame");
                        let _ = events.send(SocketEvent::Frame(text.as_str().to_owned()));
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(%endpoint, "ws: closed by remote");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "ws: recv failed");
                        break;
                    }
                },
            }
        }
    }

    // Sends the close frame if the socket is still writable.
    let _ = write.close().await;
    ready_state.store(ReadyState::Closed.as_u8(), Ordering::SeqCst);
    info!(%endpoint, "ws: disconnected");
    let _ = events.send(SocketEvent::Closed);
}
