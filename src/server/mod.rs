// src/server/mod.rs

//! Server layer root module.
//!
//! This module organizes the main backend server components, including:
//! - Application state management
//! - HTTP/WebSocket routing
//! - The room registry (rooms, membership, disconnect grace timers)
//! - Per-room match sessions (intent buffering, delivery resolution)

pub mod state;
pub mod router;
pub mod events;
pub mod session;
pub mod registry;
pub mod match_session;
pub mod ws_error;
