//! Main entry point for the backend server.
//!
//! Initializes the actor system, configures application state, and launches
//! the HTTP server with the WebSocket endpoint for rooms and matches.

use std::sync::Arc;

use actix::Actor;
use actix_web::{web, App, HttpServer};

use crate::game::stats::LogRecorder;
use crate::server::registry::server::RoomRegistry;

pub mod config;
mod server;
mod game;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::init();

    // Start the room registry actor (rooms, membership, match routing).
    let registry_addr = RoomRegistry::new(Arc::new(LogRecorder)).start();

    // Shared application state for WebSocket handlers.
    let state = web::Data::new(server::state::AppState::new(registry_addr));

    // Start the HTTP server with the WebSocket endpoint.
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*")),
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
