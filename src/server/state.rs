// src/server/state.rs

//! Application state for the backend server.
//!
//! Holds the room registry actor address, shared with every WebSocket handler.

use actix::Addr;
use crate::server::registry::server::RoomRegistry;

/// Shared application state, injected into WebSocket handlers.
pub struct AppState {
    /// Address of the room registry actor (rooms, membership, match routing).
    pub registry_addr: Addr<RoomRegistry>,
}

impl AppState {
    /// Create a new AppState with the given actor address.
    pub fn new(registry_addr: Addr<RoomRegistry>) -> Self {
        AppState { registry_addr }
    }
}
