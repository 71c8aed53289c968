//! Text rendering of the chat view.
//!
//! The rendered surface is a heading, the message list (one
//! `"<username>: <text>"` line per message), the input line with its
//! placeholder, and the send button label.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::fmt;
use std::io::{self, Write};

use crate::net::Connection;
use crate::state::chat::{ChatView, ReceivedMessage};

pub const HEADING: &str = "Chat App";
pub const PLACEHOLDER: &str = "Type your message...";
pub const SEND_LABEL: &str = "Send";

/// One rendered message line.
#[must_use]
pub fn message_line(message: &ReceivedMessage) -> String {
    format!("{}: {}", message.username(), message.text())
}

/// Snapshot of everything the view shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    pub heading: &'static str,
    pub lines: Vec<String>,
    pub input: String,
    pub placeholder: &'static str,
    pub send_label: &'static str,
}

/// Render the full view.
#[must_use]
pub fn render<C: Connection>(view: &ChatView<C>) -> Rendered {
    Rendered {
        heading: HEADING,
        lines: view.messages().iter().map(message_line).collect(),
        input: view.input().to_owned(),
        placeholder: PLACEHOLDER,
        send_label: SEND_LABEL,
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        let input = if self.input.is_empty() { self.placeholder } else { self.input.as_str() };
        write!(f, "> {input} [{}]", self.send_label)
    }
}

// =============================================================================
// TRANSCRIPT
// =============================================================================

/// Incremental writer for append-only terminals. The first call prints the
/// full [`render`] output; each later call prints only the messages appended
/// since the previous call.
#[derive(Debug, Default)]
pub struct Transcript {
    started: bool,
    shown: usize,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write what changed since the last call. Returns how many message
    /// lines were written.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn write_new<C: Connection, W: Write>(&mut self, view: &ChatView<C>, out: &mut W) -> io::Result<usize> {
        if !self.started {
            let rendered = render(view);
            writeln!(out, "{rendered}")?;
            self.started = true;
            self.shown = rendered.lines.len();
            out.flush()?;
            return Ok(self.shown);
        }

        let fresh = view.messages().get(self.shown..).unwrap_or_default();
        for message in fresh {
            writeln!(out, "{}", message_line(message))?;
        }
        self.shown += fresh.len();
        out.flush()?;
        Ok(fresh.len())
    }
}
