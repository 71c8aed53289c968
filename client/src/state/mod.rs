//! Client-side view state.
//!
//! DESIGN
//! ======
//! The chat view is the only stateful component. It is generic over the
//! connection type so the same state machine drives the websocket client
//! and in-memory test connections.

pub mod chat;
