//! HEXCHESS Server - HTTP and WebSocket transport for game sessions
//!
//! This crate provides the web backend:
//! - REST API for creating and inspecting games
//! - WebSocket channel for joining, moving and forfeiting
//! - Registry of active games backed by a record store
//! - Static file serving for the frontend

mod routes;
mod state;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use hexchess_core::JsonFileStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use routes::socket::{ClientMessage, SocketConnection};
pub use state::{lock_game, ServerState, SharedGame};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    /// Directory holding one JSON record per game
    pub data_dir: PathBuf,
    /// Id of a game to create at startup, for local development
    pub seeded_game: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            static_dir: "frontend/dist".to_string(),
            data_dir: PathBuf::from("games"),
            seeded_game: None,
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Board geometry and starting position
        .route("/api/board", get(routes::board::get_board))
        // Game API
        .route(
            "/api/game/new",
            post(routes::game::new_game).get(routes::game::new_game),
        )
        .route("/api/game/:id", get(routes::game::get_game))
        .route("/api/game/:id/ws", get(routes::socket::game_socket))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let store = Arc::new(JsonFileStore::new(&config.data_dir));
    let state = Arc::new(ServerState::new(store));

    if let Some(id) = &config.seeded_game {
        state.seed_game(id);
        tracing::info!("Seeded game available at /api/game/{}", id);
    }

    let router = create_router(&config, state);

    tracing::info!("HEXCHESS Server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);
    tracing::info!("Game records stored in: {}", config.data_dir.display());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router).await.context("server error")?;

    Ok(())
}
