//! # client
//!
//! Chat view for the chatroom server: view state, the websocket
//! connection, text rendering, and the single-threaded dispatch loop that
//! ties them together. The terminal front-end lives in the `cli` crate.

pub mod dispatch;
pub mod net;
pub mod state;
pub mod view;
