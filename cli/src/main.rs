//! Terminal front-end for the chat view.
//!
//! Each line read from stdin is typed into the input field and the send
//! button is pressed. Newly received messages are printed to stdout as
//! `"<username>: <text>"`; logs go to stderr. EOF or Ctrl-C unmounts the
//! view, which closes the connection.


use std::io::{self, BufRead};
use std::thread;
use std::time::Duration;

use clap::Parser;
use client::dispatch::{ViewEvent, await_closed, run_view};
use client::net::WsConnector;
use client::view::Transcript;
use tokio::sync::mpsc;

/// How long to wait for the close handshake after unmount.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("terminal write failed: {0}")]
    Terminal(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "chat", version, about = "Terminal chat view for the chatroom server")]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let _cli = Cli::parse();

    let (socket_tx, mut socket_rx) = mpsc::unbounded_channel();
    let (ui_tx, ui_rx) = mpsc::unbounded_channel();

    // Blocking stdin reads stay off the runtime so shutdown never waits on them.
    let stdin_tx = ui_tx.clone();
    thread::spawn(move || read_stdin(&stdin_tx));
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = ui_tx.send(ViewEvent::Unmount);
        }
    });

    let mut stdout = io::stdout();
    let mut transcript = Transcript::new();

    // The render callback cannot return errors; keep the first one.
    let mut write_error: Option<io::Error> = None;
    let view = run_view(WsConnector::new(socket_tx), ui_rx, &mut socket_rx, |view| {
        if write_error.is_none() {
            if let Err(e) = transcript.write_new(view, &mut stdout) {
                write_error = Some(e);
            }
        }
    })
    .await;

    await_closed(&view, &mut socket_rx, CLOSE_GRACE).await;

    match write_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Forward stdin lines as input + send. Sends `Unmount` at EOF.
fn read_stdin(ui: &mpsc::UnboundedSender<ViewEvent>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                break;
            }
        };
        for event in line_events(line) {
            if ui.send(event).is_err() {
                return;
            }
        }
    }
    let _ = ui.send(ViewEvent::Unmount);
}

/// A submitted line is an input change followed by a send click.
fn line_events(line: String) -> [ViewEvent; 2] {
    [ViewEvent::InputChanged(line), ViewEvent::SendClicked]
}
