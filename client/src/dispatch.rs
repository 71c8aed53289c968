//! Single-threaded dispatch loop for the chat view.
//!
//! DESIGN
//! ======
//! UI intents and socket events arrive on two channels and are merged by one
//! `select!` loop. Each event is handled to completion before the next is
//! taken, so view handlers never run concurrently. The render callback runs
//! after every handled event that may have changed what is shown.

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::net::{Connector, ReadyState, SocketEvent};
use crate::state::chat::{ChatView, SendOutcome};

/// User intent delivered to the dispatch loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    /// Input field contents replaced.
    InputChanged(String),
    /// Send button pressed.
    SendClicked,
    /// View is going away.
    Unmount,
}

/// Mount a fresh view, run it until unmount, and return the final state.
///
/// The view unmounts on [`ViewEvent::Unmount`] or when every UI sender is
/// dropped.
pub async fn run_view<K, R>(
    mut connector: K,
    mut ui: mpsc::UnboundedReceiver<ViewEvent>,
    socket: &mut mpsc::UnboundedReceiver<SocketEvent>,
    mut render: R,
) -> ChatView<K::Connection>
where
    K: Connector,
    R: FnMut(&ChatView<K::Connection>),
{
    let mut view = ChatView::new();
    view.on_mount(&mut connector);
    render(&view);

    loop {
        tokio::select! {
            event = ui.recv() => {
                let Some(event) = event else {
                    debug!("chat: ui channel closed");
                    view.on_unmount();
                    render(&view);
                    break;
                };
                match event {
                    ViewEvent::InputChanged(value) => view.on_input_change(value),
                    ViewEvent::SendClicked => {
                        let outcome = view.on_send_clicked();
                        if outcome == SendOutcome::Dropped {
                            debug!(state = ?view.connection_state(), "chat: message not sent");
                        }
                    }
                    ViewEvent::Unmount => {
                        view.on_unmount();
                        render(&view);
                        break;
                    }
                }
                render(&view);
            }
            Some(event) = socket.recv() => match event {
                SocketEvent::Frame(raw) => match view.on_inbound_frame(&raw) {
                    Ok(()) => render(&view),
                    Err(e) => warn!(error = %e, "chat: dropped malformed frame"),
                },
                SocketEvent::Opened => info!("chat: connection open"),
                SocketEvent::Closed => info!("chat: connection closed"),
            },
        }
    }

    view
}

/// After unmount, wait up to `grace` for the connection to finish its close
/// handshake. Returns immediately if the connection never reached `Closing`.
pub async fn await_closed<C>(
    view: &ChatView<C>,
    socket: &mut mpsc::UnboundedReceiver<SocketEvent>,
    grace: Duration,
) where
    C: crate::net::Connection,
{
    if view.connection_state() != Some(ReadyState::Closing) {
        return;
    }
    let drained = tokio::time::timeout(grace, async {
        while let Some(event) = socket.recv().await {
            if event == SocketEvent::Closed {
                break;
            }
        }
    })
    .await;
    if drained.is_err() {
        warn!(?grace, "chat: close handshake did not finish");
    }
}
