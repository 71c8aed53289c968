//! Domain services used by websocket routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own room membership and broadcast so the route handler
//! can stay focused on protocol translation.

pub mod chat;
